//! Third-party data providers.
//!
//! Each client issues a single GET per call and maps the JSON body into the
//! normalized record types. Clients never touch storage; persisting what they
//! return is the orchestrator's job.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    config::Config,
    error::ProviderError,
    models::{Event, Location, Movie, Weather},
};

mod events;
mod geocode;
mod movies;
mod weather;

pub use events::EventbriteClient;
pub use geocode::GoogleGeocoder;
pub use movies::TmdbClient;
pub use weather::DarkSkyClient;

/// Turns free search text into a location. The result has no id yet.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, query: &str) -> Result<Location, ProviderError>;
}

/// Fetches every record of one resource type for a location.
#[async_trait]
pub trait Fetcher<R>: Send + Sync {
    async fn fetch(&self, location: &Location) -> Result<Vec<R>, ProviderError>;
}

/// The full provider set the routes dispatch to.
#[derive(Clone)]
pub struct Providers {
    pub geocoder: Arc<dyn Geocoder>,
    pub weather: Arc<dyn Fetcher<Weather>>,
    pub events: Arc<dyn Fetcher<Event>>,
    pub movies: Arc<dyn Fetcher<Movie>>,
}

impl Providers {
    pub fn from_config(http: reqwest::Client, config: &Config) -> Self {
        Self {
            geocoder: Arc::new(GoogleGeocoder::new(
                http.clone(),
                config.geocode.api_key.clone(),
                config.geocode.base_url.clone(),
            )),
            weather: Arc::new(DarkSkyClient::new(
                http.clone(),
                config.weather.api_key.clone(),
                config.weather.base_url.clone(),
            )),
            events: Arc::new(EventbriteClient::new(
                http.clone(),
                config.events.api_key.clone(),
                config.events.base_url.clone(),
            )),
            movies: Arc::new(TmdbClient::new(
                http,
                config.movies.api_key.clone(),
                config.movies.base_url.clone(),
            )),
        }
    }
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}
