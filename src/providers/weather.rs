use async_trait::async_trait;
use serde::Deserialize;

use super::{Fetcher, endpoint};
use crate::{
    error::{MappingError, ProviderError},
    models::{Location, Weather, display_unix_date},
};

const PROVIDER: &str = "darksky";

pub struct DarkSkyClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl DarkSkyClient {
    pub fn new(client: reqwest::Client, api_key: String, base_url: String) -> Self {
        Self { client, api_key, base_url }
    }
}

#[async_trait]
impl Fetcher<Weather> for DarkSkyClient {
    async fn fetch(&self, location: &Location) -> Result<Vec<Weather>, ProviderError> {
        let url = endpoint(
            &self.base_url,
            &format!("forecast/{}/{},{}", self.api_key, location.latitude, location.longitude),
        );

        let resp: ForecastResponse =
            self.client.get(url).send().await?.error_for_status()?.json().await?;

        let daily = resp.daily.ok_or(MappingError::new(PROVIDER, "daily"))?;
        let days = daily
            .data
            .into_iter()
            .map(Weather::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(location_id = ?location.id, days = days.len(), "fetched forecast");
        Ok(days)
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    daily: Option<Daily>,
}

#[derive(Debug, Deserialize)]
struct Daily {
    #[serde(default)]
    data: Vec<DailyPoint>,
}

#[derive(Debug, Deserialize)]
struct DailyPoint {
    summary: Option<String>,
    time: Option<i64>,
}

impl TryFrom<DailyPoint> for Weather {
    type Error = MappingError;

    fn try_from(point: DailyPoint) -> Result<Self, Self::Error> {
        let forecast = point.summary.ok_or(MappingError::new(PROVIDER, "daily.data[].summary"))?;
        let time = point
            .time
            .and_then(display_unix_date)
            .ok_or(MappingError::new(PROVIDER, "daily.data[].time"))?;
        Ok(Self { forecast, time })
    }
}

#[cfg(test)]
mod tests {
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    use super::*;

    fn client(server: &MockServer) -> DarkSkyClient {
        DarkSkyClient::new(reqwest::Client::new(), "d-key".to_string(), server.uri())
    }

    fn seattle() -> Location {
        Location { id: Some(5), ..Location::new("seattle", "Seattle, WA, USA", 47.6, -122.3) }
    }

    #[tokio::test]
    async fn maps_daily_forecast() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast/d-key/47.6,-122.3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "daily": {
                    "data": [
                        { "summary": "Light rain in the morning.", "time": 1_792_279_800 },
                        { "summary": "Mostly cloudy.", "time": 1_792_366_200 }
                    ]
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let days = client(&server).fetch(&seattle()).await.unwrap();

        assert_eq!(
            days,
            vec![
                Weather {
                    forecast: "Light rain in the morning.".into(),
                    time: "Sat Oct 17 2026".into()
                },
                Weather { forecast: "Mostly cloudy.".into(), time: "Sun Oct 18 2026".into() },
            ]
        );
    }

    #[tokio::test]
    async fn empty_forecast_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "daily": { "data": [] } })),
            )
            .mount(&server)
            .await;

        assert!(client(&server).fetch(&seattle()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_daily_block_is_a_mapping_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "currently": { "summary": "Clear" }
            })))
            .mount(&server)
            .await;

        let err = client(&server).fetch(&seattle()).await.unwrap_err();
        assert!(
            matches!(err, ProviderError::Mapping(MappingError { field: "daily", .. })),
            "unexpected error: {err}"
        );
    }
}
