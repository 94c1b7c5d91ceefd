use tracing::{debug, warn};

use crate::{
    cache::{CacheManager, Resource},
    error::{AppError, AppResult},
    models::Location,
    providers::Fetcher,
};

/// Cache-then-fetch for one resource type.
///
/// Stored rows for the location are returned as they are, with no freshness
/// check. On a miss the provider is called once, every record is inserted,
/// and the fetched records are returned whether or not the inserts succeeded.
/// The probe and the inserts are not atomic: concurrent misses for the same
/// location each call the provider and each insert their rows.
pub async fn lookup<R, F>(
    cache: &CacheManager,
    location: &Location,
    fetcher: &F,
) -> AppResult<Vec<R>>
where
    R: Resource,
    F: Fetcher<R> + ?Sized,
{
    let location_id = location
        .id
        .ok_or_else(|| AppError::invalid_input("location has no id; resolve it via /location"))?;

    let cached = R::cached(cache, location_id).await?;
    if !cached.is_empty() {
        debug!(table = R::TABLE, location_id, rows = cached.len(), "cache hit");
        return Ok(cached);
    }

    debug!(table = R::TABLE, location_id, "cache miss, calling provider");
    let records = fetcher.fetch(location).await?;

    let stored = R::store(cache, location_id, &records).await;
    if stored < records.len() {
        let fetched = records.len();
        warn!(table = R::TABLE, location_id, stored, fetched, "partial cache write");
    }

    Ok(records)
}
