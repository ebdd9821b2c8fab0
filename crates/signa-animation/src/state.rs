//! Playback state machine for the animation driver.
//!
//! Valid transitions:
//! - Idle -> Playing (gesture activated)
//! - Playing -> Playing (repeat restart, or a new gesture supersedes)
//! - Playing -> Idle (repeats exhausted, or deactivated externally)

use std::fmt;

use serde::Serialize;

/// Operational state of an [`AnimationDriver`](crate::AnimationDriver).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverState {
    /// Not ticking. The last computed pose is held.
    Idle,
    /// Advancing the active gesture every frame.
    Playing,
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverState::Idle => write!(f, "Idle"),
            DriverState::Playing => write!(f, "Playing"),
        }
    }
}

impl DriverState {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &DriverState) -> bool {
        matches!(
            (self, target),
            (DriverState::Idle, DriverState::Playing)
                | (DriverState::Playing, DriverState::Playing)
                | (DriverState::Playing, DriverState::Idle)
        )
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, DriverState::Playing)
    }
}
