use thiserror::Error;

use crate::analysis::AnalysisError;

/// Top-level error type for the bill splitter.
///
/// Subsystem crates define their own error types and implement
/// `From<SplitError>` so that the `?` operator works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SplitError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Receipt analysis failed: {0}")]
    Analysis(#[from] AnalysisError),
}

impl From<toml::de::Error> for SplitError {
    fn from(err: toml::de::Error) -> Self {
        SplitError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for SplitError {
    fn from(err: toml::ser::Error) -> Self {
        SplitError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for SplitError {
    fn from(err: serde_json::Error) -> Self {
        SplitError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for bill-splitting operations.
pub type Result<T> = std::result::Result<T, SplitError>;
