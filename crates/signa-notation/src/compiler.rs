//! Gesture token to animation compiler.
//!
//! A token is first classified into a [`GestureDescriptor`] by substring
//! markers, then the descriptor is turned into per-joint keyframe tracks.
//!
//! Movement markers are checked in a fixed total order and exactly one
//! movement applies:
//!
//! 1. `-outward` or `-forward`
//! 2. `-chest-`
//! 3. `-circular-`
//! 4. `-wave-`
//! 5. `-point-`
//!
//! Tokens with no movement marker (including the empty token) keep the
//! neutral right-arm baseline.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use signa_core::types::{AnimationSpec, GestureToken, JointAnimation, JointName, Rotation};

const ARM_DURATION: f64 = 1.5;
const HEAD_DURATION: f64 = 1.2;
const DEFAULT_REPEAT: u32 = 1;

const THREE_BEAT: [f64; 3] = [0.0, 0.5, 1.0];
const FOUR_BEAT: [f64; 4] = [0.0, 0.3, 0.7, 1.0];

static HAND_SHAPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([A-Z0-9]+-hand|flat-hand|open-hand|hook-index|open5-hands|[A-Z]-hands)")
        .expect("Invalid hand shape regex")
});

/// Primary arm movement of a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Movement {
    /// No movement marker; arm stays neutral.
    Neutral,
    /// Larger combined-axis push away from the body.
    Outward,
    /// Small forward tilt at chest height.
    Chest,
    /// Circular path.
    Circular,
    /// Side-to-side wave.
    Wave,
    /// Pointing.
    Point,
}

impl Movement {
    /// Classify by marker, in priority order.
    pub fn from_token(token: &str) -> Self {
        if token.contains("-outward") || token.contains("-forward") {
            Movement::Outward
        } else if token.contains("-chest-") {
            Movement::Chest
        } else if token.contains("-circular-") {
            Movement::Circular
        } else if token.contains("-wave-") {
            Movement::Wave
        } else if token.contains("-point-") {
            Movement::Point
        } else {
            Movement::Neutral
        }
    }

    fn keyframes(&self) -> Vec<Rotation> {
        let path: &[[f64; 3]] = match self {
            Movement::Neutral => &[[0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]],
            Movement::Outward => &[[0.0, 0.0, 0.0], [0.3, 0.3, 0.0], [0.0, 0.0, 0.0]],
            Movement::Chest => &[[0.0, 0.0, 0.0], [0.3, 0.0, 0.0], [0.0, 0.0, 0.0]],
            Movement::Circular => &[
                [0.0, 0.0, 0.0],
                [0.3, 0.2, 0.2],
                [0.0, 0.0, 0.2],
                [0.0, 0.0, 0.0],
            ],
            Movement::Wave => &[
                [0.0, 0.0, 0.0],
                [0.2, 0.0, 0.2],
                [0.2, 0.0, -0.2],
                [0.0, 0.0, 0.0],
            ],
            Movement::Point => &[[0.0, 0.0, 0.0], [0.0, 0.4, 0.2], [0.0, 0.0, 0.0]],
        };
        path.iter().copied().map(Rotation::from).collect()
    }

    fn timings(&self) -> Vec<f64> {
        match self {
            Movement::Circular | Movement::Wave => FOUR_BEAT.to_vec(),
            _ => THREE_BEAT.to_vec(),
        }
    }

    /// Right-arm track for this movement.
    pub fn arm_track(&self) -> JointAnimation {
        JointAnimation::new(self.keyframes(), self.timings(), ARM_DURATION, DEFAULT_REPEAT)
    }
}

/// Non-manual head component of a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadMotion {
    Nod,
    Shake,
}

impl HeadMotion {
    /// `head-nod` and `^smile` both nod; nodding wins over `head-shake`.
    pub fn from_token(token: &str) -> Option<Self> {
        if token.contains("head-nod") || token.contains("^smile") {
            Some(HeadMotion::Nod)
        } else if token.contains("head-shake") {
            Some(HeadMotion::Shake)
        } else {
            None
        }
    }

    pub fn head_track(&self) -> JointAnimation {
        match self {
            HeadMotion::Nod => JointAnimation::new(
                vec![
                    Rotation::ZERO,
                    Rotation::new(0.2, 0.0, 0.0),
                    Rotation::ZERO,
                ],
                THREE_BEAT.to_vec(),
                HEAD_DURATION,
                DEFAULT_REPEAT,
            ),
            HeadMotion::Shake => JointAnimation::new(
                vec![
                    Rotation::ZERO,
                    Rotation::new(0.0, 0.2, 0.0),
                    Rotation::new(0.0, -0.2, 0.0),
                    Rotation::ZERO,
                ],
                FOUR_BEAT.to_vec(),
                HEAD_DURATION,
                DEFAULT_REPEAT,
            ),
        }
    }
}

/// Structured reading of a gesture token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GestureDescriptor {
    /// Leading hand-shape segment, e.g. `B-hand`, `hook-index`. The
    /// singular form wins, so `B-hands-...` reads as `B-hand`.
    pub hand_shape: Option<String>,
    pub movement: Movement,
    pub head: Option<HeadMotion>,
    /// Both hands sign (`-hands-` marker).
    pub bimanual: bool,
}

impl GestureDescriptor {
    pub fn to_spec(&self) -> AnimationSpec {
        let right_arm = self.movement.arm_track();
        let mut spec = AnimationSpec::new();

        if self.bimanual {
            spec.insert(JointName::LeftArm, right_arm.mirrored());
        }
        if let Some(head) = self.head {
            spec.insert(JointName::Head, head.head_track());
        }
        spec.insert(JointName::RightArm, right_arm);
        spec
    }
}

/// Classify a gesture token.
pub fn describe(token: &GestureToken) -> GestureDescriptor {
    let raw = token.as_str();
    GestureDescriptor {
        hand_shape: HAND_SHAPE_RE.find(raw).map(|m| m.as_str().to_string()),
        movement: Movement::from_token(raw),
        head: HeadMotion::from_token(raw),
        bimanual: raw.contains("-hands-"),
    }
}

/// Compile a gesture token into per-joint animation tracks.
///
/// Never fails: tokens without markers (including the empty token) yield
/// the neutral right-arm baseline.
pub fn compile(token: &GestureToken) -> AnimationSpec {
    let descriptor = describe(token);
    tracing::trace!(
        token = %token,
        movement = ?descriptor.movement,
        head = ?descriptor.head,
        bimanual = descriptor.bimanual,
        "Gesture compiled"
    );
    descriptor.to_spec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rot(x: f64, y: f64, z: f64) -> Rotation {
        Rotation::new(x, y, z)
    }

    #[test]
    fn test_compile_empty_token_is_baseline() {
        let spec = compile(&GestureToken::default());
        assert_eq!(spec.len(), 1);
        let arm = spec.get(JointName::RightArm).unwrap();
        assert_eq!(arm.keyframes, vec![Rotation::ZERO; 3]);
        assert_eq!(arm.timings, vec![0.0, 0.5, 1.0]);
        assert_eq!(arm.duration, 1.5);
        assert_eq!(arm.repeat, 1);
        assert_eq!(arm.initial_rotation, Rotation::ZERO);
    }

    #[test]
    fn test_compile_hello() {
        let spec = compile(&GestureToken::from("B-hands-chest-outward^smile"));
        assert!(spec.contains(JointName::RightArm));
        assert!(spec.contains(JointName::LeftArm));
        assert!(spec.contains(JointName::Head));
        assert_eq!(spec.len(), 3);

        let arm = spec.get(JointName::RightArm).unwrap();
        assert_eq!(arm.keyframes[1], rot(0.3, 0.3, 0.0));

        let left = spec.get(JointName::LeftArm).unwrap();
        assert_eq!(left.keyframes[1], rot(0.3, -0.3, 0.0));
        assert_eq!(left.duration, 1.5);
        assert_eq!(left.repeat, 1);

        let head = spec.get(JointName::Head).unwrap();
        assert_eq!(head.keyframes[1], rot(0.2, 0.0, 0.0));
        assert_eq!(head.duration, 1.2);
        assert_eq!(head.repeat, 1);
    }

    #[test]
    fn test_movement_priority_order() {
        assert_eq!(Movement::from_token("x-chest-outward"), Movement::Outward);
        assert_eq!(Movement::from_token("x-chest-forward"), Movement::Outward);
        assert_eq!(Movement::from_token("x-chest-circular-y"), Movement::Chest);
        assert_eq!(Movement::from_token("x-circular-wave-y"), Movement::Circular);
        assert_eq!(Movement::from_token("x-wave-point-y"), Movement::Wave);
        assert_eq!(Movement::from_token("G-hand-point-self"), Movement::Point);
        assert_eq!(Movement::from_token("G-hand-point-forward"), Movement::Outward);
        assert_eq!(Movement::from_token("index-wrist-circular"), Movement::Neutral);
    }

    #[test]
    fn test_compile_circular_uses_four_beats() {
        let spec = compile(&GestureToken::from("flat-hand-circular-chest"));
        let arm = spec.get(JointName::RightArm).unwrap();
        assert_eq!(arm.timings, vec![0.0, 0.3, 0.7, 1.0]);
        assert_eq!(arm.keyframes[1], rot(0.3, 0.2, 0.2));
        assert_eq!(arm.keyframes[2], rot(0.0, 0.0, 0.2));
        assert_eq!(spec.len(), 1);
    }

    #[test]
    fn test_compile_wave() {
        let spec = compile(&GestureToken::from("B-hand-wave-palm-out"));
        let arm = spec.get(JointName::RightArm).unwrap();
        assert_eq!(arm.keyframes.len(), 4);
        assert_eq!(arm.keyframes[1], rot(0.2, 0.0, 0.2));
        assert_eq!(arm.keyframes[2], rot(0.2, 0.0, -0.2));
    }

    #[test]
    fn test_compile_point() {
        let spec = compile(&GestureToken::from("G-hand-point-self"));
        let arm = spec.get(JointName::RightArm).unwrap();
        assert_eq!(arm.keyframes[1], rot(0.0, 0.4, 0.2));
    }

    #[test]
    fn test_compile_head_shake() {
        let spec = compile(&GestureToken::from("head-shake^index-wag"));
        let head = spec.get(JointName::Head).unwrap();
        assert_eq!(head.timings, vec![0.0, 0.3, 0.7, 1.0]);
        assert_eq!(head.keyframes[1], rot(0.0, 0.2, 0.0));
        assert_eq!(head.keyframes[2], rot(0.0, -0.2, 0.0));
        assert_eq!(head.duration, 1.2);
        assert!(!spec.contains(JointName::LeftArm));
    }

    #[test]
    fn test_nod_wins_over_shake() {
        assert_eq!(
            HeadMotion::from_token("head-shake^smile"),
            Some(HeadMotion::Nod)
        );
    }

    #[test]
    fn test_fallback_token_compiles_to_baseline() {
        let spec = compile(&GestureToken::from("world(generic-signing-motion)"));
        assert_eq!(spec, compile(&GestureToken::default()));
    }

    #[test]
    fn test_compile_is_deterministic() {
        let token = GestureToken::from("F-hands-circular-together");
        assert_eq!(compile(&token), compile(&token));
    }

    #[test]
    fn test_bimanual_neutral_mirrors_neutral() {
        let spec = compile(&GestureToken::from("S-hands-alternating-downward"));
        let left = spec.get(JointName::LeftArm).unwrap();
        assert_eq!(left.keyframes, vec![Rotation::ZERO; 3]);
    }

    #[test]
    fn test_compiled_specs_are_valid() {
        for token in [
            "",
            "B-hands-chest-outward^smile",
            "flat-hand-circular-chest",
            "B-hand-wave-palm-out",
            "head-shake^index-wag",
            "G-hand-point-self",
        ] {
            assert!(compile(&GestureToken::from(token)).validate().is_ok(), "{}", token);
        }
    }

    #[test]
    fn test_describe_hand_shape() {
        let cases = [
            ("B-hands-chest-outward^smile", Some("B-hand")),
            ("open5-hands-outward-questioning", Some("open5-hand")),
            ("V-hands-circular-globe", Some("V-hand")),
            ("G-hand-point-self", Some("G-hand")),
            ("flat-hand-mouth-repeatedly", Some("flat-hand")),
            ("hook-index-fingers-together-twice", Some("hook-index")),
            ("head-nod^fist-up-down", None),
            ("", None),
        ];
        for (token, expected) in cases {
            let d = describe(&GestureToken::from(token));
            assert_eq!(d.hand_shape.as_deref(), expected, "{}", token);
        }
    }

    #[test]
    fn test_descriptor_serializes() {
        let d = describe(&GestureToken::from("head-nod^fist-up-down"));
        let value = serde_json::to_value(&d).unwrap();
        assert_eq!(value["movement"], "neutral");
        assert_eq!(value["head"], "nod");
        assert_eq!(value["bimanual"], false);
    }
}
