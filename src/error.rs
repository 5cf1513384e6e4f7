use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::models::CatalogKind;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("{catalog} {operation} failed with status {status}")]
    CatalogUnavailable {
        catalog: CatalogKind,
        operation: &'static str,
        status: u16,
    },

    #[error("{catalog} {operation} returned a malformed response: {reason}")]
    MalformedResponse {
        catalog: CatalogKind,
        operation: &'static str,
        reason: String,
    },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Catalog not configured: {0}")]
    NotConfigured(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to fetch {catalog} recommendations: {source}")]
    Fetch {
        catalog: CatalogKind,
        #[source]
        source: Box<AppError>,
    },

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Wraps a pipeline failure so the message names the catalog fetch that failed.
    pub fn fetch_failed(catalog: CatalogKind, source: AppError) -> Self {
        match source {
            already @ AppError::Fetch { .. } => already,
            source => AppError::Fetch {
                catalog,
                source: Box::new(source),
            },
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::CatalogUnavailable { .. }
            | AppError::MalformedResponse { .. }
            | AppError::HttpClient(_) => StatusCode::BAD_GATEWAY,
            AppError::Fetch { source, .. } => source.status_code(),
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AppError::InvalidInput(msg) => msg.clone(),
            _ => self.to_string(),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
