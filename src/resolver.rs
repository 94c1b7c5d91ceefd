use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{cache::CacheManager, error::AppResult, models::Location, providers::Geocoder};

/// Outcome of resolving search text to a location.
pub enum Resolution {
    /// Stored row, id included.
    Cached(Location),
    /// Fresh geocode. The insert runs detached and `location` never learns the
    /// generated id; `persist` resolves to it (or `None` if the insert was
    /// ignored or failed).
    Geocoded { location: Location, persist: JoinHandle<Option<i32>> },
}

impl Resolution {
    pub fn location(&self) -> &Location {
        match self {
            Self::Cached(location) | Self::Geocoded { location, .. } => location,
        }
    }

    /// Drops the persistence handle; the insert keeps running on its own.
    pub fn into_location(self) -> Location {
        match self {
            Self::Cached(location) | Self::Geocoded { location, .. } => location,
        }
    }
}

pub async fn resolve_location(
    cache: &CacheManager,
    geocoder: &dyn Geocoder,
    query: &str,
) -> AppResult<Resolution> {
    if let Some(location) = cache.find_location(query).await? {
        debug!(query, id = ?location.id, "location cache hit");
        return Ok(Resolution::Cached(location));
    }

    debug!(query, "location cache miss, geocoding");
    let location = geocoder.geocode(query).await?;

    // responding does not wait on this insert, and its errors stop here
    let persist = {
        let cache = cache.clone();
        let candidate = location.clone();
        tokio::spawn(async move {
            match cache.insert_location(&candidate).await {
                Ok(Some(id)) => {
                    info!(query = %candidate.search_query, id, "location stored");
                    Some(id)
                },
                Ok(None) => {
                    debug!(query = %candidate.search_query, "location already stored");
                    None
                },
                Err(err) => {
                    let query = &candidate.search_query;
                    warn!(query = %query, error = %err, "failed to store location");
                    None
                },
            }
        })
    };

    Ok(Resolution::Geocoded { location, persist })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::{cache::tests::memory_cache, error::ProviderError};

    #[derive(Default)]
    struct FakeGeocoder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Geocoder for FakeGeocoder {
        async fn geocode(&self, query: &str) -> Result<Location, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Location::new(query, "Seattle, WA, USA", 47.6062, -122.3321))
        }
    }

    #[tokio::test]
    async fn miss_geocodes_and_answers_before_the_id_exists() {
        let cache = memory_cache().await;
        let geocoder = FakeGeocoder::default();

        let resolution = resolve_location(&cache, &geocoder, "Seattle").await.unwrap();
        assert_eq!(resolution.location().id, None);
        assert_eq!(resolution.location().formatted_query, "Seattle, WA, USA");

        let Resolution::Geocoded { persist, .. } = resolution else {
            panic!("expected a geocoded resolution");
        };
        let id = persist.await.unwrap();
        assert!(id.is_some());
        assert_eq!(cache.find_location("Seattle").await.unwrap().unwrap().id, id);
    }

    #[tokio::test]
    async fn second_request_is_a_cache_hit() {
        let cache = memory_cache().await;
        let geocoder = FakeGeocoder::default();

        if let Resolution::Geocoded { persist, .. } =
            resolve_location(&cache, &geocoder, "Seattle").await.unwrap()
        {
            persist.await.unwrap();
        }

        let again = resolve_location(&cache, &geocoder, "Seattle").await.unwrap();
        assert!(matches!(again, Resolution::Cached(_)));
        assert!(again.location().id.is_some());
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn racing_misses_leave_one_row() {
        let cache = memory_cache().await;
        let geocoder = FakeGeocoder::default();

        let (a, b) = tokio::join!(
            resolve_location(&cache, &geocoder, "Seattle"),
            resolve_location(&cache, &geocoder, "Seattle")
        );
        let mut ids = Vec::new();
        for resolution in [a.unwrap(), b.unwrap()] {
            if let Resolution::Geocoded { persist, .. } = resolution {
                ids.push(persist.await.unwrap());
            }
        }

        // whichever insert lost the race was ignored, not raised
        assert_eq!(ids.iter().flatten().count(), 1);
        assert!(cache.find_location("Seattle").await.unwrap().is_some());
    }
}
