use async_trait::async_trait;
use serde::Deserialize;

use super::{Fetcher, endpoint};
use crate::{
    error::{MappingError, ProviderError},
    models::{Location, Movie},
};

const PROVIDER: &str = "tmdb";
const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

pub struct TmdbClient {
    client: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl TmdbClient {
    pub fn new(client: reqwest::Client, access_token: String, base_url: String) -> Self {
        Self { client, access_token, base_url }
    }
}

#[async_trait]
impl Fetcher<Movie> for TmdbClient {
    async fn fetch(&self, location: &Location) -> Result<Vec<Movie>, ProviderError> {
        let city = location.city().ok_or(ProviderError::MissingInput("search_query"))?;

        // first page of results only
        let resp: SearchResponse = self
            .client
            .get(endpoint(&self.base_url, "search/movie"))
            .bearer_auth(&self.access_token)
            .query(&[("query", city)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let movies = resp
            .results
            .ok_or(MappingError::new(PROVIDER, "results"))?
            .into_iter()
            .map(Movie::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(location_id = ?location.id, city, movies = movies.len(), "fetched movies");
        Ok(movies)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Option<Vec<SearchMovie>>,
}

#[derive(Debug, Deserialize)]
struct SearchMovie {
    title: Option<String>,
    overview: Option<String>,
    vote_average: Option<f64>,
    vote_count: Option<i32>,
    poster_path: Option<String>,
    popularity: Option<f64>,
    release_date: Option<String>,
}

impl TryFrom<SearchMovie> for Movie {
    type Error = MappingError;

    fn try_from(m: SearchMovie) -> Result<Self, Self::Error> {
        let title = m.title.ok_or(MappingError::new(PROVIDER, "results[].title"))?;
        let image_url = m
            .poster_path
            .filter(|p| !p.trim().is_empty())
            .map(|p| format!("{POSTER_BASE_URL}{p}"));

        Ok(Self {
            title,
            overview: m.overview.unwrap_or_default(),
            avg_votes: m.vote_average.unwrap_or_default(),
            total_votes: m.vote_count.unwrap_or_default(),
            image_url,
            popularity: m.popularity.unwrap_or_default(),
            release_date: m.release_date.unwrap_or_default(),
        })
    }
}
