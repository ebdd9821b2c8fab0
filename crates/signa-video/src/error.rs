//! Error types for video generation.

use signa_core::error::SignaError;

/// Errors from a video generation request.
#[derive(Debug, thiserror::Error)]
pub enum VideoError {
    #[error("no API key configured")]
    MissingCredential,
    #[error("prompt text cannot be empty")]
    EmptyPrompt,
    #[error("request failed: {0}")]
    Request(String),
    #[error("provider returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("generation failed with status {0}")]
    Failed(String),
    #[error("no video URL in response: {0}")]
    NoVideoUrl(String),
    #[error("generation timed out after {0} seconds")]
    Timeout(u64),
    #[error("credential error: {0}")]
    Credential(String),
    #[error(transparent)]
    Core(SignaError),
}

impl From<SignaError> for VideoError {
    fn from(err: SignaError) -> Self {
        match err {
            SignaError::Credential(msg) => VideoError::Credential(msg),
            other => VideoError::Core(other),
        }
    }
}

impl From<reqwest::Error> for VideoError {
    fn from(err: reqwest::Error) -> Self {
        VideoError::Request(err.to_string())
    }
}

impl From<VideoError> for SignaError {
    fn from(err: VideoError) -> Self {
        match err {
            VideoError::Core(inner) => inner,
            VideoError::Credential(msg) => SignaError::Credential(msg),
            other => SignaError::Video(other.to_string()),
        }
    }
}
