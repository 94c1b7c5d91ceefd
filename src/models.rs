use jiff::{Timestamp, civil::Date, tz::TimeZone};
use serde::{Deserialize, Serialize};

use crate::entities::{event, location, movie, weather};

/// The anchor record every other resource is keyed against.
///
/// `id` is only present once the row has been read back from storage; a
/// freshly geocoded location is answered without one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(default)]
    pub search_query: String,
    #[serde(default)]
    pub formatted_query: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(
        search_query: impl Into<String>,
        formatted_query: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            id: None,
            search_query: search_query.into(),
            formatted_query: formatted_query.into(),
            latitude,
            longitude,
        }
    }

    /// City name for text-search providers: the raw search, else the leading
    /// part of the formatted address.
    pub fn city(&self) -> Option<&str> {
        let search = self.search_query.trim();
        if !search.is_empty() {
            return Some(search);
        }
        self.formatted_query.split(',').next().map(str::trim).filter(|s| !s.is_empty())
    }
}

impl From<location::Model> for Location {
    fn from(row: location::Model) -> Self {
        Self {
            id: Some(row.id),
            search_query: row.search_query,
            formatted_query: row.formatted_query,
            latitude: row.latitude,
            longitude: row.longitude,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Weather {
    pub forecast: String,
    pub time: String,
}

impl From<weather::Model> for Weather {
    fn from(row: weather::Model) -> Self {
        Self { forecast: row.forecast, time: row.weather_time }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Event {
    pub link: String,
    pub name: String,
    pub event_date: String,
    pub summary: Option<String>,
}

impl From<event::Model> for Event {
    fn from(row: event::Model) -> Self {
        Self { link: row.link, name: row.name, event_date: row.event_date, summary: row.summary }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Movie {
    pub title: String,
    pub overview: String,
    pub avg_votes: f64,
    pub total_votes: i32,
    pub image_url: Option<String>,
    pub popularity: f64,
    pub release_date: String,
}

impl From<movie::Model> for Movie {
    fn from(row: movie::Model) -> Self {
        Self {
            title: row.title,
            overview: row.overview,
            avg_votes: row.avg_votes,
            total_votes: row.total_votes,
            image_url: row.image_url,
            popularity: row.popularity,
            release_date: row.release_date,
        }
    }
}

const DISPLAY_DATE: &str = "%a %b %d %Y";

/// Renders a calendar date as `Tue Oct 17 2026`.
pub fn display_date(date: Date) -> String {
    date.strftime(DISPLAY_DATE).to_string()
}

/// Renders a Unix timestamp (seconds) as its UTC calendar date.
pub fn display_unix_date(seconds: i64) -> Option<String> {
    let ts = Timestamp::from_second(seconds).ok()?;
    Some(display_date(ts.to_zoned(TimeZone::UTC).date()))
}

pub fn now_sec() -> i64 {
    Timestamp::now().as_second()
}
