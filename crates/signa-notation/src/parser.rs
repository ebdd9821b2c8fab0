//! Notation string to gesture token sequence.

use signa_core::types::GestureToken;

use crate::encoder::SEPARATOR;

/// Split a notation string into its gesture tokens, in order.
///
/// Empty segments (leading, trailing or doubled separators) are dropped.
pub fn parse(notation: &str) -> Vec<GestureToken> {
    notation
        .split(SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .map(GestureToken::from)
        .collect()
}
