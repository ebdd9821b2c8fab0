//! CLI argument definitions for the `signa` binary.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use signa_core::types::RenderMode;

/// Signa: turn text into sign language notation and avatar animation.
#[derive(Parser, Debug)]
#[command(name = "signa", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Data directory for stored credentials.
    #[arg(short = 'd', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode text into gesture notation.
    Encode {
        text: Vec<String>,
        /// Print one line per word with its token.
        #[arg(long)]
        words: bool,
    },
    /// Split a notation string into gesture tokens.
    Parse { notation: String },
    /// Compile one gesture token into its animation spec (JSON).
    Compile {
        token: String,
        /// Include the hand shape, movement and head reading.
        #[arg(long)]
        describe: bool,
    },
    /// Play text on the avatar with a simulated frame loop.
    Play {
        text: Vec<String>,
        /// Frames per second, overriding the configured rate.
        #[arg(long)]
        fps: Option<u32>,
        /// Presentation mode.
        #[arg(long, value_enum)]
        mode: Option<PlayMode>,
        /// Print every Nth frame.
        #[arg(long, default_value_t = 10)]
        every: u64,
        /// Pace frames against the wall clock instead of running flat out.
        #[arg(long)]
        realtime: bool,
    },
    /// Generate a sign language video for text using the stored API key.
    Video {
        text: Vec<String>,
        /// Append the notation to the prompt.
        #[arg(long)]
        with_notation: bool,
    },
    /// Manage the video provider API key.
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Store the API key.
    Set { key: String },
    /// Show the stored key, masked.
    Show,
    /// Remove the stored key.
    Clear,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayMode {
    Avatar,
    Emoji,
}

impl From<PlayMode> for RenderMode {
    fn from(mode: PlayMode) -> Self {
        match mode {
            PlayMode::Avatar => RenderMode::Avatar,
            PlayMode::Emoji => RenderMode::Emoji,
        }
    }
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > SIGNA_CONFIG env var > ~/.signa/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("SIGNA_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Priority: --data-dir flag > config file value.
    pub fn resolve_data_dir(&self) -> Option<String> {
        self.data_dir
            .as_ref()
            .map(|p| p.to_string_lossy().to_string())
    }

    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self) -> Option<String> {
        self.log_level.clone()
    }
}

fn home_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    let home = std::env::var("USERPROFILE");
    #[cfg(not(target_os = "windows"))]
    let home = std::env::var("HOME");
    home.ok().map(PathBuf::from)
}

fn default_config_path() -> PathBuf {
    match home_dir() {
        Some(home) => home.join(".signa").join("config.toml"),
        None => PathBuf::from("config.toml"),
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        return home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(rest);
    }
    PathBuf::from(path)
}

/// Join positional words back into one utterance.
pub fn join_text(words: &[String]) -> String {
    words.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_encode() {
        let args = CliArgs::try_parse_from(["signa", "encode", "hello", "world"]).unwrap();
        match args.command {
            Command::Encode { text, words } => {
                assert_eq!(join_text(&text), "hello world");
                assert!(!words);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_play_options() {
        let args = CliArgs::try_parse_from([
            "signa", "play", "--fps", "30", "--mode", "emoji", "thank", "you",
        ])
        .unwrap();
        match args.command {
            Command::Play {
                text,
                fps,
                mode,
                every,
                realtime,
            } => {
                assert_eq!(text, vec!["thank", "you"]);
                assert_eq!(fps, Some(30));
                assert_eq!(mode, Some(PlayMode::Emoji));
                assert_eq!(every, 10);
                assert!(!realtime);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_key_actions() {
        let args = CliArgs::try_parse_from(["signa", "key", "set", "abc"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Key { action: KeyAction::Set { ref key } } if key == "abc"
        ));
        let args = CliArgs::try_parse_from(["signa", "key", "clear"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Key {
                action: KeyAction::Clear
            }
        ));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args =
            CliArgs::try_parse_from(["signa", "parse", "a | b", "-c", "/tmp/signa.toml"]).unwrap();
        assert_eq!(args.resolve_config_path(), PathBuf::from("/tmp/signa.toml"));
        assert!(args.resolve_log_level().is_none());
        assert!(args.resolve_data_dir().is_none());
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(CliArgs::try_parse_from(["signa", "play", "--mode", "video", "hi"]).is_err());
    }

    #[test]
    fn test_play_mode_into_render_mode() {
        assert_eq!(RenderMode::from(PlayMode::Avatar), RenderMode::Avatar);
        assert_eq!(RenderMode::from(PlayMode::Emoji), RenderMode::Emoji);
    }

    #[test]
    fn test_expand_home_absolute_untouched() {
        assert_eq!(expand_home("/var/signa"), PathBuf::from("/var/signa"));
        assert!(!expand_home("~/data").starts_with("~"));
    }
}
