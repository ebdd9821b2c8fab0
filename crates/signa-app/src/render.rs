//! Terminal renderers for avatar poses and the emoji word display.

use std::io::Write;

use signa_animation::PoseRenderer;
use signa_core::types::{GestureToken, Pose};
use signa_notation::{emoji_for, NotationEncoder};

/// Seconds each word stays on screen in emoji mode.
pub const EMOJI_WORD_SECS: f64 = 1.0;

/// One word of the emoji display and when it appears.
#[derive(Debug, Clone, PartialEq)]
pub struct EmojiCue {
    pub at: f64,
    pub glyph: &'static str,
    pub word: String,
    pub token: GestureToken,
}

/// Schedule one word per `EMOJI_WORD_SECS`, starting at zero.
pub fn emoji_timeline(encoder: &NotationEncoder, text: &str) -> Vec<EmojiCue> {
    encoder
        .encode_words(text)
        .into_iter()
        .enumerate()
        .map(|(i, word)| EmojiCue {
            at: i as f64 * EMOJI_WORD_SECS,
            glyph: emoji_for(&word.word),
            word: word.word,
            token: word.token,
        })
        .collect()
}

pub fn format_cue(cue: &EmojiCue) -> String {
    format!("t={:>6.3}s  {}  {:<16} {}", cue.at, cue.glyph, cue.word, cue.token)
}

/// Writes one line per sampled frame: time followed by each joint's
/// rotation in radians.
pub struct TextRenderer<W: Write> {
    out: W,
    every: u64,
}

impl<W: Write> TextRenderer<W> {
    /// Sample every `every` frames. 0 is treated as 1.
    pub fn new(out: W, every: u64) -> Self {
        Self {
            out,
            every: every.max(1),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

pub fn format_pose(now: f64, pose: &Pose) -> String {
    let joints: Vec<String> = pose
        .iter()
        .map(|(joint, r)| format!("{}=({:+.3},{:+.3},{:+.3})", joint, r.x, r.y, r.z))
        .collect();
    format!("t={:>6.3}s  {}", now, joints.join(" "))
}

impl<W: Write> PoseRenderer for TextRenderer<W> {
    fn render(&mut self, frame: u64, now: f64, pose: &Pose) {
        if frame % self.every != 0 {
            return;
        }
        if let Err(e) = writeln!(self.out, "{}", format_pose(now, pose)) {
            tracing::warn!(error = %e, "Failed to write frame");
        }
    }
}
