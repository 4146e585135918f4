use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Data format error: {0}")]
    DataFormat(String),

    #[error("Invalid filter input: {0}")]
    InvalidFilterInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Get a sanitized error message safe for logging
    pub fn log_safe(&self) -> String {
        match self {
            // Parser errors can echo whole rows of the dataset
            Error::Csv(_) => "CSV parsing failed".to_string(),
            Error::Json(_) => "JSON parsing failed".to_string(),
            Error::Io(_) => "File system operation failed".to_string(),

            Error::DataFormat(msg) => format!("Data format error: {msg}"),
            Error::InvalidFilterInput(msg) => format!("Invalid filter input: {msg}"),
            Error::NotFound(msg) => format!("Not found: {msg}"),
            Error::Config(msg) => format!("Configuration error: {msg}"),
            Error::Validation(msg) => format!("Validation error: {msg}"),
            Error::Internal(msg) => format!("Internal error: {msg}"),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!("Request error: {}", self.log_safe());

        let (status, error_message) = match &self {
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Error::InvalidFilterInput(msg) | Error::Validation(msg) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
