//! Text to notation encoder.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::Serialize;

use signa_core::types::GestureToken;

use crate::lexicon::Lexicon;

/// Separator between per-word tokens in a notation string.
pub const SEPARATOR: &str = " | ";

// Word characters are ASCII only; accented letters are stripped like
// punctuation. Whitespace stays Unicode-aware.
static NON_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\s]").expect("Invalid punctuation regex"));

/// Lowercase `text`, strip everything that is not an ASCII word character
/// or whitespace, and split into words.
pub fn normalize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    NON_WORD_RE
        .replace_all(&lowered, "")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// A normalized word together with the token it encodes to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedWord {
    pub word: String,
    pub token: GestureToken,
    /// Whether the token came from the lexicon rather than the fallback.
    pub known: bool,
}

/// Encodes text into a notation string using a shared lexicon.
#[derive(Debug, Clone)]
pub struct NotationEncoder {
    lexicon: Arc<Lexicon>,
}

impl Default for NotationEncoder {
    fn default() -> Self {
        Self::new(Lexicon::builtin())
    }
}

impl NotationEncoder {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Encode every word of `text`, keeping the word alongside its token.
    pub fn encode_words(&self, text: &str) -> Vec<EncodedWord> {
        normalize(text)
            .into_iter()
            .map(|word| match self.lexicon.get(&word) {
                Some(token) => EncodedWord {
                    token: token.clone(),
                    word,
                    known: true,
                },
                None => {
                    tracing::trace!(word = %word, "Word not in lexicon, using fallback");
                    EncodedWord {
                        token: self.lexicon.fallback_token(&word),
                        word,
                        known: false,
                    }
                }
            })
            .collect()
    }

    /// Encode `text` into a `" | "`-separated notation string. Empty or
    /// punctuation-only input yields the empty string.
    pub fn encode(&self, text: &str) -> String {
        let words = self.encode_words(text);
        if words.is_empty() {
            return String::new();
        }
        words
            .iter()
            .map(|w| w.token.as_str())
            .collect::<Vec<_>>()
            .join(SEPARATOR)
    }
}

/// Encode `text` with the builtin lexicon.
pub fn encode(text: &str) -> String {
    NotationEncoder::default().encode(text)
}
