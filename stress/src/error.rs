//! Stress tooling error types

use std::time::Duration;
use stress_shared::SharedError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StressError {
    #[error("Share API call failed with HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("{resource} {id} not found")]
    NotFound { resource: String, id: String },

    #[error("{resource} {id} entered error status '{status}'")]
    ResourceError {
        resource: String,
        id: String,
        status: String,
    },

    #[error("{resource} {id} not '{expected}' after {timeout:?} (last status '{last_status}')")]
    Timeout {
        resource: String,
        id: String,
        expected: String,
        last_status: String,
        timeout: Duration,
    },

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid service URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {field}: {message}")]
    Config { field: String, message: String },

    #[error("Unknown stress action: {name}")]
    UnknownAction { name: String },

    #[error("Invalid action parameter '{key}': {message}")]
    InvalidParams { key: String, message: String },

    #[error("Runner {worker} has already been executed")]
    RunnerReused { worker: String },

    #[error("Worker task failed: {message}")]
    Join { message: String },

    #[error("Shared component error: {0}")]
    Shared(#[from] SharedError),
}

impl StressError {
    pub fn config<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        StressError::Config {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found<R: Into<String>, I: Into<String>>(resource: R, id: I) -> Self {
        StressError::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StressError::NotFound { .. })
    }
}

pub type StressResult<T> = Result<T, StressError>;
