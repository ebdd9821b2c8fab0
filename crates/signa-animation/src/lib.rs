//! Signa Animation crate - keyframe interpolation and avatar playback.
//!
//! The [`AnimationDriver`] runs one gesture through a small state machine
//! (Idle -> Playing -> Idle, restarting Playing for each repeat) and
//! produces a [`signa_core::Pose`] per display frame. The
//! [`SequencePlayer`] chains driver runs over the words of an utterance.
//! All computation is pure and single-threaded; rendering is delegated to a
//! [`PoseRenderer`].

pub mod driver;
pub mod interpolate;
pub mod render;
pub mod sequence;
pub mod state;

pub use driver::{AnimationDriver, PlaybackState};
pub use interpolate::{ease_in_out_cubic, interpolate, interpolate_rotation};
pub use render::{FrameClock, PoseRenderer};
pub use sequence::{SequenceItem, SequencePlayer};
pub use state::DriverState;
