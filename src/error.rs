// src/error.rs
//! Application error types with structured error handling.
//!
//! Error types form the vocabulary for failure modes in the system.
//! Each variant is scoped to the unit of work it affects: a single
//! document, a single page fetch, or a single formatted date. None of
//! them is allowed to abort the rendering of an entire listing.

use thiserror::Error;

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    /// One document is unusable; callers skip it and keep going.
    #[error("Malformed document '{id}': {reason}")]
    MalformedDocument { id: String, reason: String },

    /// Transport-level failure talking to the content source. Safe to retry.
    #[error("Network failure: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The content source answered with a non-success HTTP status.
    #[error("Content source returned HTTP {status} for {url}")]
    SourceStatus {
        status: reqwest::StatusCode,
        url: String,
    },

    /// The page response does not have the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid timestamp: '{input}'")]
    InvalidTimestamp { input: String },

    #[error("Invalid date pattern '{pattern}': {reason}")]
    InvalidDatePattern { pattern: String, reason: String },

    #[error("Cursor was not issued by this source: {0}")]
    InvalidCursor(String),

    #[error("Pagination controller is already initialized")]
    AlreadyInitialized,

    #[error("Pagination controller has not been initialized")]
    NotInitialized,

    #[error("No post found with slug '{0}'")]
    PostNotFound(String),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template render error for template {name}: {message}")]
    TemplateRenderError { name: String, message: String },

    #[error("Output delivery failed: {}", failures.join(", "))]
    DeliveryFailed { failures: Vec<String> },

    #[error(transparent)]
    Validation(#[from] crate::types::ValidationError),
}

impl AppError {
    /// Shorthand for a document-scoped failure.
    pub fn malformed_document(id: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::MalformedDocument {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error is transient and worth retrying as-is.
    ///
    /// Malformed responses need an upstream fix, so they are not retryable
    /// even though the pagination controller stays usable after one.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Fetch(_) => true,
            AppError::SourceStatus { status, .. } => {
                status.as_u16() == 429 || status.is_server_error()
            }
            _ => false,
        }
    }

    /// Whether this error came from talking to the content source.
    pub fn is_source_failure(&self) -> bool {
        matches!(
            self,
            AppError::Fetch(_)
                | AppError::SourceStatus { .. }
                | AppError::MalformedResponse(_)
                | AppError::InvalidCursor(_)
        )
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

impl From<handlebars::RenderError> for AppError {
    fn from(err: handlebars::RenderError) -> Self {
        AppError::TemplateRenderError {
            name: err.template_name.clone().unwrap_or_default(),
            message: err.to_string(),
        }
    }
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;
