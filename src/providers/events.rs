use async_trait::async_trait;
use jiff::civil::DateTime;
use serde::Deserialize;

use super::{Fetcher, endpoint};
use crate::{
    error::{MappingError, ProviderError},
    models::{Event, Location, display_date},
};

const PROVIDER: &str = "eventbrite";

pub struct EventbriteClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl EventbriteClient {
    pub fn new(client: reqwest::Client, api_key: String, base_url: String) -> Self {
        Self { client, api_key, base_url }
    }
}

#[async_trait]
impl Fetcher<Event> for EventbriteClient {
    async fn fetch(&self, location: &Location) -> Result<Vec<Event>, ProviderError> {
        // only the first page is read
        let resp: SearchResponse = self
            .client
            .get(endpoint(&self.base_url, "events/search"))
            .bearer_auth(&self.api_key)
            .query(&[
                ("location.longitude", location.longitude),
                ("location.latitude", location.latitude),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let events = resp
            .events
            .ok_or(MappingError::new(PROVIDER, "events"))?
            .into_iter()
            .map(Event::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(location_id = ?location.id, events = events.len(), "fetched events");
        Ok(events)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    events: Option<Vec<EventItem>>,
}

#[derive(Debug, Deserialize)]
struct EventItem {
    url: Option<String>,
    name: Option<MultipartText>,
    start: Option<EventStart>,
    summary: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MultipartText {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EventStart {
    local: Option<String>,
}

impl TryFrom<EventItem> for Event {
    type Error = MappingError;

    fn try_from(item: EventItem) -> Result<Self, Self::Error> {
        let link = item.url.ok_or(MappingError::new(PROVIDER, "events[].url"))?;
        let name = item
            .name
            .and_then(|n| n.text)
            .ok_or(MappingError::new(PROVIDER, "events[].name.text"))?;
        let start: DateTime = item
            .start
            .and_then(|s| s.local)
            .and_then(|local| local.parse().ok())
            .ok_or(MappingError::new(PROVIDER, "events[].start.local"))?;

        Ok(Self { link, name, event_date: display_date(start.date()), summary: item.summary })
    }
}

#[cfg(test)]
mod tests {
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path, query_param},
    };

    use super::*;

    fn client(server: &MockServer) -> EventbriteClient {
        EventbriteClient::new(reqwest::Client::new(), "e-key".to_string(), server.uri())
    }

    fn seattle() -> Location {
        Location { id: Some(5), ..Location::new("seattle", "Seattle, WA, USA", 47.6, -122.3) }
    }

    #[tokio::test]
    async fn maps_events_with_bearer_auth() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/events/search"))
            .and(header("Authorization", "Bearer e-key"))
            .and(query_param("location.latitude", "47.6"))
            .and(query_param("location.longitude", "-122.3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "events": [
                    {
                        "url": "https://www.eventbrite.com/e/1",
                        "name": { "text": "Jazz at the Pier", "html": "Jazz at the Pier" },
                        "start": { "local": "2026-10-20T19:00:00", "timezone": "America/Los_Angeles" },
                        "summary": "Live jazz."
                    },
                    {
                        "url": "https://www.eventbrite.com/e/2",
                        "name": { "text": "Book swap" },
                        "start": { "local": "2026-10-24T10:30:00" },
                        "summary": null
                    }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let events = client(&server).fetch(&seattle()).await.unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].name, "Jazz at the Pier");
        assert_eq!(events[0].link, "https://www.eventbrite.com/e/1");
        assert_eq!(events[0].event_date, "Tue Oct 20 2026");
        assert_eq!(events[0].summary.as_deref(), Some("Live jazz."));
        assert_eq!(events[1].event_date, "Sat Oct 24 2026");
        assert_eq!(events[1].summary, None);
    }

    #[tokio::test]
    async fn event_without_name_is_a_mapping_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "events": [{
                    "url": "https://www.eventbrite.com/e/3",
                    "start": { "local": "2026-10-20T19:00:00" }
                }]
            })))
            .mount(&server)
            .await;

        let err = client(&server).fetch(&seattle()).await.unwrap_err();
        assert!(
            matches!(err, ProviderError::Mapping(MappingError { field: "events[].name.text", .. })),
            "unexpected error: {err}"
        );
    }

    #[tokio::test]
    async fn unauthorized_is_a_request_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = client(&server).fetch(&seattle()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Request(_)), "unexpected error: {err}");
    }
}
