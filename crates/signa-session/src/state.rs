//! Speech capture state machine.
//!
//! Valid transitions:
//! - Idle -> Listening (capture started)
//! - Listening -> Idle (capture stopped)

use std::fmt;

use chrono::{DateTime, Utc};

use signa_core::error::{Result, SignaError};

/// Whether speech is being captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaptureState {
    /// No capture in progress.
    #[default]
    Idle,
    /// Transcripts are being produced from the microphone.
    Listening,
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureState::Idle => write!(f, "Idle"),
            CaptureState::Listening => write!(f, "Listening"),
        }
    }
}

impl CaptureState {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &CaptureState) -> bool {
        matches!(
            (self, target),
            (CaptureState::Idle, CaptureState::Listening)
                | (CaptureState::Listening, CaptureState::Idle)
        )
    }
}

/// Validating wrapper around [`CaptureState`].
#[derive(Debug, Clone, Default)]
pub struct CaptureMachine {
    state: CaptureState,
    since: Option<DateTime<Utc>>,
}

impl CaptureMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> CaptureState {
        self.state
    }

    /// When the current Listening period began.
    pub fn listening_since(&self) -> Option<DateTime<Utc>> {
        self.since
    }

    /// Attempt to transition to `target`.
    ///
    /// Returns `SignaError::Session` if the transition is not allowed.
    pub fn transition(&mut self, target: CaptureState) -> Result<()> {
        if !self.state.can_transition_to(&target) {
            return Err(SignaError::Session(format!(
                "Invalid capture transition: {} -> {}",
                self.state, target
            )));
        }
        tracing::debug!("Capture state: {} -> {}", self.state, target);
        self.state = target;
        self.since = match target {
            CaptureState::Listening => Some(Utc::now()),
            CaptureState::Idle => None,
        };
        Ok(())
    }
}
