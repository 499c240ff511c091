//! Error types for the Delivery API client.

use thiserror::Error;

/// Result type alias for Delivery API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Delivery API client.
#[derive(Error, Debug)]
pub enum Error {
    // ===== API Errors =====
    #[error("API error: {status} {status_text} - {message}")]
    Api {
        status: u16,
        status_text: String,
        message: String,
    },

    #[error("The resource could not be found: entity '{entity_id}' in space '{space}', environment '{environment}'")]
    NotFound {
        entity_id: String,
        space: String,
        environment: String,
    },

    // ===== Configuration Errors =====
    #[error("Configuration error: {0}")]
    Config(String),

    // ===== I/O Errors =====
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // ===== HTTP Errors =====
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    // ===== Internal Errors =====
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Timeout: operation timed out after {seconds} seconds")]
    Timeout { seconds: u64 },
}

impl Error {
    /// Create an API error from HTTP response details.
    pub fn api(status: u16, status_text: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            status_text: status_text.into(),
            message: message.into(),
        }
    }

    /// Create a NotFound error for a single-entity lookup that matched nothing.
    pub fn not_found(
        entity_id: impl Into<String>,
        space: impl Into<String>,
        environment: impl Into<String>,
    ) -> Self {
        Self::NotFound {
            entity_id: entity_id.into(),
            space: space.into(),
            environment: environment.into(),
        }
    }

    /// Check if this error is retriable (transient failures).
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::Api { status, .. } => {
                *status == 429 || *status == 499 || (*status >= 500 && *status < 600)
            }
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }
}
