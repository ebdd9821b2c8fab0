//! Per-avatar animation driver.
//!
//! The driver owns one [`PlaybackState`] per active gesture and never writes
//! into the shared [`AnimationSpec`] template. Time is supplied by the caller
//! as monotonic seconds (typically the display refresh clock), which keeps
//! `tick` pure with respect to wall-clock time.

use std::collections::BTreeMap;
use std::sync::Arc;

use signa_core::error::Result;
use signa_core::types::{AnimationSpec, JointName, Pose};

use crate::interpolate::interpolate_rotation;
use crate::state::DriverState;

/// Mutable playback bookkeeping for the active gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    start_time: f64,
    active: bool,
    remaining_repeats: BTreeMap<JointName, u32>,
}

impl PlaybackState {
    fn new(spec: &AnimationSpec, now: f64) -> Self {
        Self {
            start_time: now,
            active: true,
            remaining_repeats: spec.iter().map(|(joint, anim)| (joint, anim.repeat)).collect(),
        }
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Repeats left for `joint`, if it is animated.
    pub fn remaining_repeats(&self, joint: JointName) -> Option<u32> {
        self.remaining_repeats.get(&joint).copied()
    }

    /// The governing repeat budget: the largest per-joint counter.
    pub fn repeat_budget(&self) -> u32 {
        self.remaining_repeats.values().copied().max().unwrap_or(0)
    }

    fn restart(&mut self, now: f64) {
        self.start_time = now;
        for remaining in self.remaining_repeats.values_mut() {
            *remaining = remaining.saturating_sub(1);
        }
    }
}

/// Drives one avatar through a gesture, one tick per displayed frame.
#[derive(Debug, Clone)]
pub struct AnimationDriver {
    state: DriverState,
    spec: Option<Arc<AnimationSpec>>,
    playback: Option<PlaybackState>,
    max_duration: f64,
    playthroughs: u32,
    pose: Pose,
}

impl Default for AnimationDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationDriver {
    /// Create an idle driver with a neutral pose.
    pub fn new() -> Self {
        Self {
            state: DriverState::Idle,
            spec: None,
            playback: None,
            max_duration: 0.0,
            playthroughs: 0,
            pose: Pose::new(),
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn spec(&self) -> Option<&AnimationSpec> {
        self.spec.as_deref()
    }

    pub fn playback(&self) -> Option<&PlaybackState> {
        self.playback.as_ref()
    }

    /// Completed cycles since the last activation.
    pub fn playthroughs(&self) -> u32 {
        self.playthroughs
    }

    /// Start playing `spec` from progress 0 at time `now`.
    ///
    /// The spec is validated first; an invalid spec leaves the driver
    /// untouched and returns `SignaError::InvalidAnimation`. Activating while
    /// already playing supersedes the current gesture.
    pub fn activate(&mut self, spec: Arc<AnimationSpec>, now: f64) -> Result<()> {
        if let Err(e) = spec.validate() {
            tracing::warn!(error = %e, "Rejected animation spec");
            return Err(e);
        }

        self.max_duration = spec.max_duration();
        self.playback = Some(PlaybackState::new(&spec, now));
        self.playthroughs = 0;
        self.pose.clear();
        for (joint, animation) in spec.iter() {
            self.pose.set(joint, animation.initial_rotation);
        }
        tracing::debug!(
            joints = spec.len(),
            cycle_secs = self.max_duration,
            repeats = spec.max_repeat(),
            "Gesture activated"
        );
        self.spec = Some(spec);
        self.transition(DriverState::Playing);
        Ok(())
    }

    /// Stop ticking without resetting the pose.
    pub fn deactivate(&mut self) {
        if let Some(playback) = self.playback.as_mut() {
            playback.active = false;
        }
        if self.state.is_playing() {
            self.transition(DriverState::Idle);
        }
    }

    /// Normalized progress through the current cycle at `now`.
    pub fn progress(&self, now: f64) -> f64 {
        match &self.playback {
            Some(playback) if self.max_duration > 0.0 => {
                ((now - playback.start_time).max(0.0) / self.max_duration).min(1.0)
            }
            _ => 0.0,
        }
    }

    /// Advance to `now` and return the pose to render.
    ///
    /// O(joints), allocation-free, and infallible. While idle the held pose
    /// is returned unchanged.
    pub fn tick(&mut self, now: f64) -> &Pose {
        if !self.state.is_playing() {
            return &self.pose;
        }
        let (Some(spec), Some(playback)) = (self.spec.as_ref(), self.playback.as_mut()) else {
            return &self.pose;
        };

        let elapsed = (now - playback.start_time).max(0.0);
        let progress = if self.max_duration > 0.0 {
            (elapsed / self.max_duration).min(1.0)
        } else {
            1.0
        };

        for (joint, animation) in spec.iter() {
            // Shorter joints saturate early and hold their last keyframe.
            let joint_progress = (elapsed / animation.duration).min(1.0);
            self.pose.set(
                joint,
                interpolate_rotation(joint_progress, &animation.timings, &animation.keyframes),
            );
        }

        if progress >= 1.0 {
            self.playthroughs += 1;
            if playback.repeat_budget() > 0 {
                playback.restart(now);
                tracing::trace!(
                    playthroughs = self.playthroughs,
                    remaining = playback.repeat_budget(),
                    "Gesture repeating"
                );
            } else {
                playback.active = false;
                self.transition(DriverState::Idle);
            }
        }

        &self.pose
    }

    fn transition(&mut self, target: DriverState) {
        if self.state.can_transition_to(&target) {
            tracing::debug!("Driver state: {} -> {}", self.state, target);
            self.state = target;
        } else {
            tracing::warn!("Ignored driver transition: {} -> {}", self.state, target);
        }
    }
}
