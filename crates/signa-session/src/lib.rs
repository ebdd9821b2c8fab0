//! Signa Session crate - the live transcript that drives the avatar.
//!
//! A [`TranscriptSession`] owns the current text, its notation, and the
//! word sequence being played. Each new transcript replaces the previous
//! one wholesale and supersedes any in-flight video request; results that
//! arrive for a superseded request are discarded via [`RequestToken`]s.

pub mod request;
pub mod session;
pub mod state;

pub use request::{RequestToken, RequestTracker};
pub use session::{TranscriptSession, VideoCompletion, VideoJob, VideoState};
pub use state::{CaptureMachine, CaptureState};
