pub mod cache;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod lookup;
pub mod models;
pub mod providers;
pub mod resolver;
pub mod routes;

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{cache::CacheManager, providers::Providers};

#[derive(Clone)]
pub struct AppState {
    pub cache: CacheManager,
    pub providers: Providers,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/location", get(routes::location))
        .route("/weather", get(routes::weather))
        .route("/events", get(routes::events))
        .route("/movies", get(routes::movies))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
