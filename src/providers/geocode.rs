use async_trait::async_trait;
use serde::Deserialize;

use super::{Geocoder, endpoint};
use crate::{
    error::{MappingError, ProviderError},
    models::Location,
};

const PROVIDER: &str = "geocode";

pub struct GoogleGeocoder {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GoogleGeocoder {
    pub fn new(client: reqwest::Client, api_key: String, base_url: String) -> Self {
        Self { client, api_key, base_url }
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, query: &str) -> Result<Location, ProviderError> {
        let resp: GeocodeResponse = self
            .client
            .get(endpoint(&self.base_url, "geocode/json"))
            .query(&[("address", query), ("key", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        tracing::info!(query, status = resp.status.as_deref().unwrap_or("-"), "geocode response");

        Ok(resp.into_location(query)?)
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: Option<String>,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: Option<String>,
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Option<LatLng>,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl GeocodeResponse {
    /// Builds the location from the first result only.
    fn into_location(self, query: &str) -> Result<Location, MappingError> {
        let first =
            self.results.into_iter().next().ok_or(MappingError::new(PROVIDER, "results[0]"))?;
        let formatted = first
            .formatted_address
            .ok_or(MappingError::new(PROVIDER, "results[0].formatted_address"))?;
        let point = first
            .geometry
            .and_then(|g| g.location)
            .ok_or(MappingError::new(PROVIDER, "results[0].geometry.location"))?;

        Ok(Location::new(query, formatted, point.lat, point.lng))
    }
}
