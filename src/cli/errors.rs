use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Input file does not exist: {path}")]
    MissingInput { path: String },

    #[error("Invalid JPEG quality: {quality}. Must be within 1..=100")]
    InvalidQuality { quality: u8 },

    #[error(transparent)]
    Library(#[from] pixtweak::Error),
}
