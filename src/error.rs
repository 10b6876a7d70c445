//! Crate-level error types and `Result` alias for stable, structured error handling.
//! `FilterError` is what the filter pipeline and the parameter parsers return;
//! `Error` wraps it together with decode, encode, I/O, storage and request failures.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure signalled by the filter pipeline.
///
/// `Validation` means the caller handed in a parameter outside its domain;
/// `Processing` means the pixel data itself could not be transformed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("Invalid parameter {field}={value}: {reason}")]
    Validation {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("Processing error: {0}")]
    Processing(String),
}

impl FilterError {
    pub fn validation(field: &'static str, value: impl ToString, reason: &'static str) -> Self {
        FilterError::Validation {
            field,
            value: value.to_string(),
            reason,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, FilterError::Validation { .. })
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("Decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("Invalid filename: {name:?}")]
    InvalidFilename { name: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    Request(String),

    #[error("Request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Not found: {0}")]
    NotFound(String),
}

impl Error {
    pub fn encode<E: std::fmt::Display>(e: E) -> Self {
        Error::Encode(e.to_string())
    }

    /// HTTP status the server answers with when a request fails with this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Filter(FilterError::Validation { .. })
            | Error::Decode(_)
            | Error::InvalidArgument { .. }
            | Error::InvalidFilename { .. }
            | Error::Request(_) => 400,
            Error::NotFound(_) => 404,
            Error::PayloadTooLarge { .. } => 413,
            Error::Filter(FilterError::Processing(_))
            | Error::Encode(_)
            | Error::Io(_)
            | Error::Config(_) => 500,
        }
    }
}
