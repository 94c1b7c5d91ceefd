use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, RawQuery, State, rejection::QueryRejection},
};
use serde::Deserialize;

use crate::{
    AppState,
    error::{AppError, AppResult},
    lookup::lookup,
    models::{Event, Location, Movie, Weather},
    resolver::resolve_location,
};

#[derive(Debug, Deserialize)]
pub struct DataQuery {
    data: Option<String>,
}

type DataParam = Result<Query<DataQuery>, QueryRejection>;

fn data_text(param: DataParam) -> AppResult<String> {
    let Query(q) = param.map_err(|e| AppError::invalid_input(e.body_text()))?;
    q.data.ok_or_else(|| AppError::invalid_input("missing `data` query parameter"))
}

/// Location fields sent bracket-style: `data[id]=5&data[latitude]=47.6&...`.
#[derive(Debug, Deserialize)]
struct LocationQuery {
    data: Location,
}

// non-strict so percent-encoded brackets (`data%5Bid%5D`) still nest
fn qs_config() -> serde_qs::Config {
    serde_qs::Config::new(5, false)
}

/// `data` on the resource routes is the location `/location` answered with,
/// either as bracketed fields or as one JSON-encoded value.
fn data_location(RawQuery(raw): RawQuery) -> AppResult<Location> {
    let raw = raw.unwrap_or_default();
    if let Ok(LocationQuery { data }) = qs_config().deserialize_str(&raw) {
        return Ok(data);
    }

    let DataQuery { data } = qs_config()
        .deserialize_str(&raw)
        .map_err(|e| AppError::invalid_input(format!("`data` is not a location: {e}")))?;
    let json = data.ok_or_else(|| AppError::invalid_input("missing `data` query parameter"))?;
    serde_json::from_str(&json)
        .map_err(|e| AppError::invalid_input(format!("`data` is not a location: {e}")))
}

pub async fn location(
    State(state): State<Arc<AppState>>,
    param: DataParam,
) -> AppResult<Json<Location>> {
    let query = data_text(param)?;
    let resolution =
        resolve_location(&state.cache, state.providers.geocoder.as_ref(), &query).await?;
    Ok(Json(resolution.into_location()))
}

pub async fn weather(
    State(state): State<Arc<AppState>>,
    query: RawQuery,
) -> AppResult<Json<Vec<Weather>>> {
    let location = data_location(query)?;
    Ok(Json(lookup(&state.cache, &location, state.providers.weather.as_ref()).await?))
}

pub async fn events(
    State(state): State<Arc<AppState>>,
    query: RawQuery,
) -> AppResult<Json<Vec<Event>>> {
    let location = data_location(query)?;
    Ok(Json(lookup(&state.cache, &location, state.providers.events.as_ref()).await?))
}

pub async fn movies(
    State(state): State<Arc<AppState>>,
    query: RawQuery,
) -> AppResult<Json<Vec<Movie>>> {
    let location = data_location(query)?;
    Ok(Json(lookup(&state.cache, &location, state.providers.movies.as_ref()).await?))
}
