//! Signa Notation crate - text to Hamburg-style gesture notation and back.
//!
//! Pipeline: raw text -> [`NotationEncoder`] (backed by a shared, read-only
//! [`Lexicon`]) -> notation string -> [`parse`] -> gesture tokens ->
//! [`compile`] -> per-joint [`signa_core::AnimationSpec`].

pub mod compiler;
pub mod emoji;
pub mod encoder;
pub mod lexicon;
pub mod parser;

pub use compiler::{compile, describe, GestureDescriptor, HeadMotion, Movement};
pub use emoji::{emoji_for, DEFAULT_EMOJI};
pub use encoder::{encode, normalize, EncodedWord, NotationEncoder, SEPARATOR};
pub use lexicon::Lexicon;
pub use parser::parse;
