// src/error.rs

//! Unified error handling for the workload client.

use std::fmt;

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Required input fields were left empty
    #[error("Please fill in all fields: missing {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A record or identifier needed for an action is not available locally
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// The backend has no matching record
    #[error("{0}")]
    NotFound(String),

    /// The backend answered with a non-success status
    #[error("Request failed ({}): {message}", .status.map_or_else(|| "no status".to_string(), |s| s.to_string()))]
    Network {
        status: Option<u16>,
        message: String,
    },

    /// The same target already has a request in flight
    #[error("Request already in progress for {0}")]
    Busy(String),

    /// No session is active
    #[error("Not logged in")]
    Unauthenticated,

    /// The session's role may not open a view
    #[error("Not permitted: {0}")]
    Forbidden(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

impl AppError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a missing-field error from field names.
    pub fn missing<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MissingFields(fields.into_iter().map(Into::into).collect())
    }

    /// Create a lookup error.
    pub fn lookup(message: impl Into<String>) -> Self {
        Self::Lookup(message.into())
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a busy error for the given target.
    pub fn busy(target: impl fmt::Display) -> Self {
        Self::Busy(target.to_string())
    }

    /// Create a network error from a response status and backend detail.
    pub fn network(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Network {
            status,
            message: message.into(),
        }
    }

    /// Missing required input, detected before any request.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingFields(_) | Self::Validation(_))
    }

    /// A local record or identifier was unavailable.
    pub fn is_lookup(&self) -> bool {
        matches!(self, Self::Lookup(_))
    }

    /// The request failed in transit or came back unsuccessful.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Http(_))
    }

    /// The backend reported no matching record.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Backend-provided detail, falling back to the error's own message.
    pub fn detail(&self) -> String {
        match self {
            Self::Network { message, .. } if !message.is_empty() => message.clone(),
            Self::NotFound(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_message_lists_every_field() {
        let err = AppError::missing(["reference_number", "hours"]);
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Please fill in all fields: missing reference_number, hours"
        );
    }

    #[test]
    fn test_network_detail_prefers_backend_message() {
        let err = AppError::network(Some(400), "Activity does not exist");
        assert!(err.is_network());
        assert_eq!(err.detail(), "Activity does not exist");
        assert_eq!(
            err.to_string(),
            "Request failed (400): Activity does not exist"
        );
    }

    #[test]
    fn test_network_without_status_renders_placeholder() {
        let err = AppError::network(None, "");
        assert_eq!(err.to_string(), "Request failed (no status): ");
        assert_eq!(err.detail(), err.to_string());
    }

    #[test]
    fn test_classification_is_exclusive() {
        let err = AppError::lookup("Workload ID is missing.");
        assert!(err.is_lookup());
        assert!(!err.is_validation());
        assert!(!err.is_network());
        assert!(!err.is_not_found());
    }
}
