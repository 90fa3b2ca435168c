use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Authentication failed (HTTP {status})")]
    Unauthorized { status: u16 },

    #[error("Resource not found: {path}")]
    NotFound { path: String },

    #[error("Validation failed: {}", format_field_errors(.errors))]
    Validation {
        errors: BTreeMap<String, Vec<String>>,
    },

    #[error("API returned error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Failed to serialize request: {0}")]
    SerializeError(String),

    #[error("{entity} must be created inside a {parent}, but no parent id was given")]
    MissingParent {
        entity: &'static str,
        parent: &'static str,
    },
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}

fn format_field_errors(errors: &BTreeMap<String, Vec<String>>) -> String {
    errors
        .iter()
        .map(|(field, messages)| format!("{} {}", field, messages.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}
