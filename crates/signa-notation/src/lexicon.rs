//! Word to gesture-token lexicon.
//!
//! The builtin table is constructed once on first use and shared through an
//! `Arc`. Custom lexicons are built at startup by layering overrides on top
//! of it; a `Lexicon` is never mutated after construction.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Arc, LazyLock};

use signa_core::error::{Result, SignaError};
use signa_core::types::GestureToken;

/// Key of the designated fallback entry.
pub const DEFAULT_KEY: &str = "default";

static BUILTIN_ENTRIES: &[(&str, &str)] = &[
    // Greetings and courtesy
    ("hello", "B-hands-chest-outward^smile"),
    ("hi", "B-hand-wave-palm-out"),
    ("goodbye", "B-hands-wave-outward"),
    ("thank", "B-hand-chin-forward"),
    ("thanks", "B-hand-chin-forward"),
    ("you", "G-hand-point-forward"),
    ("me", "G-hand-point-self"),
    ("please", "flat-hand-circular-chest"),
    ("sorry", "A-hand-circular-chest"),
    ("yes", "head-nod^fist-up-down"),
    ("no", "head-shake^index-wag"),
    // Questions
    ("what", "open5-hands-outward-questioning"),
    ("where", "open5-hands-outward-questioning"),
    ("when", "index-wrist-circular"),
    ("who", "G-hand-question-outward"),
    ("why", "G-hand-side-forehead-outward"),
    ("how", "flat-hands-upward-questioning"),
    // Nouns
    ("name", "H-hands-together-outward"),
    ("home", "flat-hand-chin-down-touch-flat"),
    ("work", "S-hands-alternating-downward"),
    ("school", "flat-hands-clap-twice"),
    ("family", "F-hands-circular-together"),
    ("friend", "hook-index-fingers-together-twice"),
    // Actions
    ("eat", "flat-hand-mouth-repeatedly"),
    ("drink", "C-hand-mouth-tilt"),
    ("sleep", "open-hand-face-down-tilt"),
    ("go", "G-hands-forward-movement"),
    ("come", "G-hands-beckoning-movement"),
    ("look", "V-hand-eyes-outward"),
    ("see", "V-hand-eyes-outward"),
    ("talk", "hand-mouth-opening-closing"),
    ("sign", "index-fingers-circling-forward"),
    // Time
    ("now", "B-hands-down-emphatic"),
    ("today", "A-thumb-chin-down"),
    ("tomorrow", "A-thumb-cheek-forward-arc"),
    ("yesterday", "A-thumb-cheek-backward-arc"),
    ("time", "index-wrist-tap-twice"),
    // Pronouns
    ("i", "G-hand-point-self"),
    ("we", "circular-G-hand-point-self-others"),
    ("they", "G-hand-point-outward-arc"),
    ("he", "G-hand-point-side"),
    ("she", "G-hand-point-side"),
    ("it", "G-hand-point-neutral"),
    (DEFAULT_KEY, "generic-signing-motion"),
];

static BUILTIN: LazyLock<Arc<Lexicon>> = LazyLock::new(|| {
    let entries = BUILTIN_ENTRIES
        .iter()
        .map(|(word, token)| (word.to_string(), GestureToken::from(*token)))
        .collect();
    Arc::new(Lexicon::from_map(entries).expect("builtin lexicon has a default entry"))
});

/// Read-only mapping from lowercase words to gesture tokens, with one
/// designated `default` entry used when no key matches.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexicon {
    entries: HashMap<String, GestureToken>,
    default_token: GestureToken,
}

impl Lexicon {
    /// The process-wide builtin lexicon.
    pub fn builtin() -> Arc<Lexicon> {
        Arc::clone(&BUILTIN)
    }

    /// Build a lexicon from `word -> token` pairs. Keys are lowercased.
    ///
    /// Fails if no `default` entry is present.
    pub fn from_entries<I, W, T>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (W, T)>,
        W: AsRef<str>,
        T: Into<GestureToken>,
    {
        let map = entries
            .into_iter()
            .map(|(word, token)| (word.as_ref().to_lowercase(), token.into()))
            .collect();
        Self::from_map(map)
    }

    fn from_map(entries: HashMap<String, GestureToken>) -> Result<Self> {
        let default_token = entries.get(DEFAULT_KEY).cloned().ok_or_else(|| {
            SignaError::Notation(format!("lexicon has no '{}' entry", DEFAULT_KEY))
        })?;
        Ok(Self {
            entries,
            default_token,
        })
    }

    /// A copy of this lexicon with `overrides` layered on top.
    pub fn with_overrides<I, W, T>(&self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (W, T)>,
        W: AsRef<str>,
        T: Into<GestureToken>,
    {
        let mut entries = self.entries.clone();
        for (word, token) in overrides {
            entries.insert(word.as_ref().to_lowercase(), token.into());
        }
        let default_token = entries
            .get(DEFAULT_KEY)
            .cloned()
            .unwrap_or_else(|| self.default_token.clone());
        Self {
            entries,
            default_token,
        }
    }

    /// Parse a TOML table of `word = "token"` pairs and layer it over the
    /// builtin lexicon.
    pub fn builtin_with_toml(content: &str) -> Result<Self> {
        let overrides: BTreeMap<String, String> = toml::from_str(content)?;
        Ok(Self::builtin().with_overrides(overrides))
    }

    /// Load overrides from a TOML file and layer them over the builtin
    /// lexicon.
    pub fn load_with_overrides(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let lexicon = Self::builtin_with_toml(&content)?;
        tracing::info!(
            path = %path.display(),
            entries = lexicon.len(),
            "Custom lexicon loaded"
        );
        Ok(lexicon)
    }

    pub fn get(&self, word: &str) -> Option<&GestureToken> {
        self.entries.get(word)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    pub fn default_token(&self) -> &GestureToken {
        &self.default_token
    }

    /// Synthesized token for a word with no entry: `"<word>(<default>)"`.
    pub fn fallback_token(&self, word: &str) -> GestureToken {
        GestureToken::new(format!("{}({})", word, self.default_token))
    }

    /// Token for `word`, falling back to the synthesized default.
    pub fn token_for(&self, word: &str) -> GestureToken {
        match self.get(word) {
            Some(token) => token.clone(),
            None => self.fallback_token(word),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
