//! Video generation seam.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::VideoError;

/// Text to turn into a sign language video, optionally with its notation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoPrompt {
    text: String,
    notation: Option<String>,
}

impl VideoPrompt {
    /// Fails with `EmptyPrompt` if `text` is blank.
    pub fn new(text: impl Into<String>) -> Result<Self, VideoError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(VideoError::EmptyPrompt);
        }
        Ok(Self {
            text,
            notation: None,
        })
    }

    /// Attach the notation of the text. Empty notation is ignored.
    pub fn with_notation(mut self, notation: impl Into<String>) -> Self {
        let notation = notation.into();
        self.notation = (!notation.is_empty()).then_some(notation);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn notation(&self) -> Option<&str> {
        self.notation.as_deref()
    }

    /// The prompt sent to the provider.
    pub fn render(&self) -> String {
        let mut prompt = format!(
            "A person making the sign language gesture for: \"{}\"",
            self.text.trim()
        );
        if let Some(notation) = &self.notation {
            prompt.push_str(&format!(" (Hamburg notation: {})", notation));
        }
        prompt
    }
}

/// A finished video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoOutput {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// A provider that renders a prompt into a playable video URL.
#[async_trait]
pub trait VideoGenerator: Send + Sync {
    /// Short identifier for logs.
    fn name(&self) -> &'static str;

    async fn generate(&self, prompt: &VideoPrompt, api_key: &str)
        -> Result<VideoOutput, VideoError>;
}
