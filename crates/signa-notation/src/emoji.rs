//! Word to emoji glyph lookup for the emoji render mode.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Glyph shown for words with no entry.
pub const DEFAULT_EMOJI: &str = "🔄";

static EMOJI_SIGNS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("hello", "👋"),
        ("world", "🌎"),
        ("my", "👉"),
        ("name", "📛"),
        ("is", "🟰"),
        ("thank", "🙏"),
        ("you", "👉"),
        ("please", "🤲"),
        ("sorry", "🙇"),
        ("yes", "👍"),
        ("no", "👎"),
        ("help", "🆘"),
        ("want", "👐"),
        ("love", "❤️"),
        ("good", "👌"),
        ("bad", "👎"),
        ("how", "❓"),
        ("what", "❓"),
        ("where", "📍"),
        ("when", "⏰"),
        ("who", "👤"),
        ("why", "❓"),
    ])
});

/// Emoji for a normalized word.
pub fn emoji_for(word: &str) -> &'static str {
    EMOJI_SIGNS
        .get(word.to_lowercase().as_str())
        .copied()
        .unwrap_or(DEFAULT_EMOJI)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_words() {
        assert_eq!(emoji_for("hello"), "👋");
        assert_eq!(emoji_for("world"), "🌎");
        assert_eq!(emoji_for("love"), "❤️");
    }

    #[test]
    fn test_lookup_ignores_case() {
        assert_eq!(emoji_for("Thank"), "🙏");
    }

    #[test]
    fn test_unknown_word_uses_default() {
        assert_eq!(emoji_for("zebra"), DEFAULT_EMOJI);
        assert_eq!(emoji_for(""), DEFAULT_EMOJI);
    }
}
