use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, SignaError};
use crate::types::RenderMode;

/// Top-level configuration for the Signa application.
///
/// Loaded from `~/.signa/config.toml` by default. Each section corresponds
/// to one crate of the workspace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignaConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub notation: NotationConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub video: VideoConfig,
    #[serde(default)]
    pub credentials: CredentialConfig,
}

impl SignaConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SignaConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| SignaError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Data directory for stored credentials.
    pub data_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.signa/data".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Notation lexicon configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotationConfig {
    /// Optional TOML file of `word = "token"` entries merged over the
    /// builtin lexicon at startup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lexicon_path: Option<String>,
}

/// Avatar playback configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Display refresh rate driving the per-frame tick.
    pub fps: u32,
    /// Pause between consecutive words, in seconds.
    pub word_gap_secs: f64,
    /// How signs are presented.
    pub render_mode: RenderMode,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            word_gap_secs: 0.25,
            render_mode: RenderMode::Avatar,
        }
    }
}

/// Third-party video generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Queue endpoint base URL.
    pub endpoint: String,
    /// Model identifier appended to the endpoint.
    pub model: String,
    /// Interval between status polls, in milliseconds.
    pub poll_interval_ms: u64,
    /// Overall deadline for one generation request, in seconds.
    pub timeout_secs: u64,
    /// Append the Hamburg notation of the text to the prompt.
    pub include_notation: bool,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://queue.fal.run".to_string(),
            model: "fal-ai/veo2".to_string(),
            poll_interval_ms: 1000,
            timeout_secs: 120,
            include_notation: false,
        }
    }
}

/// Credential storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialConfig {
    /// Fixed name the video API key is stored under.
    pub key_name: String,
    /// Backend: "file" or "memory".
    pub store: String,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            key_name: "fal_ai_api_key".to_string(),
            store: "file".to_string(),
        }
    }
}
