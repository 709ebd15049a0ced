use thiserror::Error;

mod domain_types;
mod ids;

pub use domain_types::*;
pub use ids::*;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid document ID: {0}")]
    InvalidId(String),

    #[error("Invalid slug: {slug} - {reason}")]
    InvalidSlug { slug: String, reason: String },

    #[error("Invalid document type: {0}")]
    InvalidDocumentType(String),

    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Empty required field: {0}")]
    EmptyField(&'static str),

    #[error("Value out of bounds: {value}, expected {min}..={max}")]
    OutOfBounds { value: u32, min: u32, max: u32 },

    #[error("Invalid access token: {reason}")]
    InvalidAccessToken { reason: String },

    #[error("Unsupported locale: {0}")]
    UnsupportedLocale(String),

    #[error("Invalid UTC offset: {0} minutes")]
    InvalidUtcOffset(i32),

    #[error("Unknown {option} '{value}', expected one of: {expected}")]
    UnknownOption {
        option: &'static str,
        value: String,
        expected: &'static str,
    },
}
