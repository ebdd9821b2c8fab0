use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SignaError};

// =============================================================================
// Enums
// =============================================================================

/// An animatable body part of the avatar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JointName {
    Head,
    RightArm,
    LeftArm,
    RightHand,
    LeftHand,
}

impl JointName {
    /// All joints, in rendering order.
    pub const ALL: [JointName; 5] = [
        JointName::Head,
        JointName::RightArm,
        JointName::LeftArm,
        JointName::RightHand,
        JointName::LeftHand,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JointName::Head => "head",
            JointName::RightArm => "rightArm",
            JointName::LeftArm => "leftArm",
            JointName::RightHand => "rightHand",
            JointName::LeftHand => "leftHand",
        }
    }
}

impl fmt::Display for JointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How recognised text is presented to the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// One emoji glyph per word.
    Emoji,
    /// Procedurally animated 3D avatar (default).
    #[default]
    Avatar,
    /// Third-party generated video.
    Video,
}

// =============================================================================
// Rotation
// =============================================================================

/// Euler rotation triple in radians. Serialized as `[x, y, z]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Rotation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Rotation {
    pub const ZERO: Rotation = Rotation {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The same rotation reflected across the body's vertical midline
    /// (horizontal axis negated).
    pub fn mirrored(&self) -> Self {
        Self {
            x: self.x,
            y: -self.y,
            z: self.z,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f64; 3]> for Rotation {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Rotation> for [f64; 3] {
    fn from(r: Rotation) -> Self {
        [r.x, r.y, r.z]
    }
}

// =============================================================================
// Gesture tokens
// =============================================================================

/// One signed concept in Hamburg-style notation, e.g.
/// `"B-hands-chest-outward^smile"`. Consumed only by substring matching.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GestureToken(String);

impl GestureToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn contains(&self, marker: &str) -> bool {
        self.0.contains(marker)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for GestureToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GestureToken {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for GestureToken {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for GestureToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Animation specs
// =============================================================================

/// Keyframed rotation track for a single joint.
///
/// `keyframes` and `timings` are parallel arrays: `timings[i]` is the
/// normalized point in the cycle at which the joint reaches `keyframes[i]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JointAnimation {
    pub initial_rotation: Rotation,
    pub keyframes: Vec<Rotation>,
    pub timings: Vec<f64>,
    /// Cycle length in seconds.
    pub duration: f64,
    /// Extra playthroughs after the first.
    pub repeat: u32,
}

impl JointAnimation {
    /// Create a track starting from the neutral rotation.
    pub fn new(keyframes: Vec<Rotation>, timings: Vec<f64>, duration: f64, repeat: u32) -> Self {
        Self {
            initial_rotation: Rotation::ZERO,
            keyframes,
            timings,
            duration,
            repeat,
        }
    }

    /// The same track with every rotation mirrored.
    pub fn mirrored(&self) -> Self {
        Self {
            initial_rotation: self.initial_rotation.mirrored(),
            keyframes: self.keyframes.iter().map(Rotation::mirrored).collect(),
            timings: self.timings.clone(),
            duration: self.duration,
            repeat: self.repeat,
        }
    }

    /// Check the track can be played without dividing by zero or
    /// indexing out of bounds.
    pub fn validate(&self) -> Result<()> {
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(SignaError::InvalidAnimation(format!(
                "duration must be positive, got {}",
                self.duration
            )));
        }
        if self.keyframes.len() != self.timings.len() {
            return Err(SignaError::InvalidAnimation(format!(
                "{} keyframes but {} timings",
                self.keyframes.len(),
                self.timings.len()
            )));
        }
        if self.keyframes.len() < 2 {
            return Err(SignaError::InvalidAnimation(format!(
                "at least 2 keyframes required, got {}",
                self.keyframes.len()
            )));
        }
        if !self.initial_rotation.is_finite() || !self.keyframes.iter().all(Rotation::is_finite) {
            return Err(SignaError::InvalidAnimation(
                "rotations must be finite".to_string(),
            ));
        }
        if self.timings.iter().any(|t| !(0.0..=1.0).contains(t)) {
            return Err(SignaError::InvalidAnimation(
                "timings must lie in [0, 1]".to_string(),
            ));
        }
        if self.timings.windows(2).any(|w| w[1] < w[0]) {
            return Err(SignaError::InvalidAnimation(
                "timings must be non-decreasing".to_string(),
            ));
        }
        let first = self.timings[0];
        let last = self.timings[self.timings.len() - 1];
        if first != 0.0 || last != 1.0 {
            return Err(SignaError::InvalidAnimation(format!(
                "timings must start at 0 and end at 1, got {} .. {}",
                first, last
            )));
        }
        Ok(())
    }
}

/// Per-joint animation tracks for one gesture.
///
/// Immutable template: playback keeps its own counters and never writes
/// back into the spec, so one spec can drive many avatars.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimationSpec {
    joints: BTreeMap<JointName, JointAnimation>,
}

impl AnimationSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the track for `joint`.
    pub fn insert(&mut self, joint: JointName, animation: JointAnimation) {
        self.joints.insert(joint, animation);
    }

    pub fn with(mut self, joint: JointName, animation: JointAnimation) -> Self {
        self.insert(joint, animation);
        self
    }

    pub fn get(&self, joint: JointName) -> Option<&JointAnimation> {
        self.joints.get(&joint)
    }

    pub fn contains(&self, joint: JointName) -> bool {
        self.joints.contains_key(&joint)
    }

    pub fn iter(&self) -> impl Iterator<Item = (JointName, &JointAnimation)> {
        self.joints.iter().map(|(name, anim)| (*name, anim))
    }

    pub fn joint_names(&self) -> Vec<JointName> {
        self.joints.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Longest joint duration; governs the cycle length.
    pub fn max_duration(&self) -> f64 {
        self.joints
            .values()
            .map(|a| a.duration)
            .fold(0.0, f64::max)
    }

    /// Largest repeat count; governs the repeat budget.
    pub fn max_repeat(&self) -> u32 {
        self.joints.values().map(|a| a.repeat).max().unwrap_or(0)
    }

    /// Validate every track. A spec without joints is rejected.
    pub fn validate(&self) -> Result<()> {
        if self.joints.is_empty() {
            return Err(SignaError::InvalidAnimation(
                "animation spec has no joints".to_string(),
            ));
        }
        for (name, animation) in &self.joints {
            animation
                .validate()
                .map_err(|e| SignaError::InvalidAnimation(format!("{}: {}", name, e)))?;
        }
        Ok(())
    }
}

// =============================================================================
// Pose
// =============================================================================

/// Joint rotations computed for one displayed frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pose {
    rotations: BTreeMap<JointName, Rotation>,
}

impl Pose {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, joint: JointName, rotation: Rotation) {
        self.rotations.insert(joint, rotation);
    }

    /// Rotation of `joint`, neutral if it was never animated.
    pub fn get(&self, joint: JointName) -> Rotation {
        self.rotations.get(&joint).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (JointName, Rotation)> + '_ {
        self.rotations.iter().map(|(name, rot)| (*name, *rot))
    }

    pub fn is_empty(&self) -> bool {
        self.rotations.is_empty()
    }

    pub fn clear(&mut self) {
        self.rotations.clear();
    }
}
