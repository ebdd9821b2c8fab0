use thiserror::Error;

/// Top-level error type for the Signa system.
///
/// Subsystem crates with richer failure modes define their own error types
/// and convert to and from `SignaError` so that `?` works across crate
/// boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SignaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid animation: {0}")]
    InvalidAnimation(String),

    #[error("Notation error: {0}")]
    Notation(String),

    #[error("Video error: {0}")]
    Video(String),

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for SignaError {
    fn from(err: toml::de::Error) -> Self {
        SignaError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for SignaError {
    fn from(err: toml::ser::Error) -> Self {
        SignaError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for SignaError {
    fn from(err: serde_json::Error) -> Self {
        SignaError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Signa operations.
pub type Result<T> = std::result::Result<T, SignaError>;
