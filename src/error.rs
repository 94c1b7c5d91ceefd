use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Body returned for every failed request. The underlying error is only logged.
pub const ERROR_MESSAGE: &str = "Sorry, something went wrong";

/// A provider answered, but without a field the record needs.
#[derive(Debug, thiserror::Error)]
#[error("{provider} response is missing `{field}`")]
pub struct MappingError {
    pub provider: &'static str,
    pub field: &'static str,
}

impl MappingError {
    pub fn new(provider: &'static str, field: &'static str) -> Self {
        Self { provider, field }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error(transparent)]
    Mapping(#[from] MappingError),
    #[error("location has no `{0}` to query the provider with")]
    MissingInput(&'static str),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("storage error: {0}")]
    Storage(#[from] sea_orm::DbErr),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl AppError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

impl From<MappingError> for AppError {
    fn from(err: MappingError) -> Self {
        Self::Provider(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, ERROR_MESSAGE).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
