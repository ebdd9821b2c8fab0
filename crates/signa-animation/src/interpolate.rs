//! Piecewise keyframe interpolation with cubic easing.
//!
//! Progress outside `[timings[0], timings[last]]` clamps to the end values;
//! nothing is extrapolated. Functions here allocate nothing and never panic,
//! so they are safe to call from the per-frame tick.

use signa_core::types::Rotation;

/// Cubic ease-in-out on `t` in `[0, 1]`.
pub fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Where `progress` falls on a timing track.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Segment {
    /// Exactly on (or clamped to) keyframe `i`.
    At(usize),
    /// Between keyframes `i` and `i + 1`, with the eased local fraction.
    Between(usize, f64),
}

fn locate(progress: f64, timings: &[f64], len: usize) -> Segment {
    let last = len - 1;
    // NaN progress also lands here.
    if !(progress > timings[0]) {
        return Segment::At(0);
    }
    if progress >= timings[last] {
        return Segment::At(last);
    }
    for i in 0..last {
        let (start, end) = (timings[i], timings[i + 1]);
        if progress <= end {
            let span = end - start;
            if span <= 0.0 {
                return Segment::At(i + 1);
            }
            let local = (progress - start) / span;
            return Segment::Between(i, ease_in_out_cubic(local));
        }
    }
    Segment::At(last)
}

/// Interpolate a scalar track at `progress`.
///
/// `timings` must be sorted ascending. If the slices differ in length only
/// the common prefix is used; an empty track yields `0.0`.
pub fn interpolate(progress: f64, timings: &[f64], values: &[f64]) -> f64 {
    let len = timings.len().min(values.len());
    if len == 0 {
        return 0.0;
    }
    match locate(progress, timings, len) {
        Segment::At(i) => values[i],
        Segment::Between(i, eased) => values[i] + (values[i + 1] - values[i]) * eased,
    }
}

/// Interpolate a rotation track at `progress`, each axis independently.
pub fn interpolate_rotation(progress: f64, timings: &[f64], keyframes: &[Rotation]) -> Rotation {
    let len = timings.len().min(keyframes.len());
    if len == 0 {
        return Rotation::ZERO;
    }
    match locate(progress, timings, len) {
        Segment::At(i) => keyframes[i],
        Segment::Between(i, eased) => {
            let (a, b) = (keyframes[i], keyframes[i + 1]);
            Rotation::new(
                a.x + (b.x - a.x) * eased,
                a.y + (b.y - a.y) * eased,
                a.z + (b.z - a.z) * eased,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_easing_endpoints_and_midpoint() {
        assert!((ease_in_out_cubic(0.0)).abs() < EPS);
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < EPS);
        assert!((ease_in_out_cubic(1.0) - 1.0).abs() < EPS);
        assert!((ease_in_out_cubic(0.25) - 0.0625).abs() < EPS);
        assert!((ease_in_out_cubic(0.75) - 0.9375).abs() < EPS);
    }

    #[test]
    fn test_easing_is_monotonic() {
        let mut prev = ease_in_out_cubic(0.0);
        for step in 1..=100 {
            let next = ease_in_out_cubic(step as f64 / 100.0);
            assert!(next >= prev);
            prev = next;
        }
    }

    #[test]
    fn test_endpoints_return_end_values() {
        let timings = [0.0, 0.3, 0.7, 1.0];
        let values = [2.0, 5.0, -1.0, 4.0];
        assert_eq!(interpolate(0.0, &timings, &values), 2.0);
        assert_eq!(interpolate(1.0, &timings, &values), 4.0);
    }

    #[test]
    fn test_out_of_range_progress_clamps() {
        let timings = [0.0, 0.5, 1.0];
        let values = [1.0, 3.0, 2.0];
        assert_eq!(interpolate(-0.5, &timings, &values), 1.0);
        assert_eq!(interpolate(7.0, &timings, &values), 2.0);
        assert_eq!(interpolate(f64::NAN, &timings, &values), 1.0);
    }

    #[test]
    fn test_peak_and_symmetry() {
        let timings = [0.0, 0.5, 1.0];
        let values = [0.0, 1.0, 0.0];
        assert!((interpolate(0.5, &timings, &values) - 1.0).abs() < EPS);

        let quarter = interpolate(0.25, &timings, &values);
        let three_quarter = interpolate(0.75, &timings, &values);
        assert!(quarter < 1.0);
        assert!((quarter - three_quarter).abs() < EPS);
        assert!((quarter - 0.5).abs() < EPS);
    }

    #[test]
    fn test_eased_not_linear() {
        let timings = [0.0, 1.0];
        let values = [0.0, 10.0];
        // local fraction 0.25 eases to 0.0625
        assert!((interpolate(0.25, &timings, &values) - 0.625).abs() < EPS);
    }

    #[test]
    fn test_interior_keyframe_hit_exactly() {
        let timings = [0.0, 0.3, 0.7, 1.0];
        let values = [0.0, 0.2, -0.2, 0.0];
        assert!((interpolate(0.3, &timings, &values) - 0.2).abs() < EPS);
        assert!((interpolate(0.7, &timings, &values) + 0.2).abs() < EPS);
    }

    #[test]
    fn test_zero_width_segment_does_not_divide_by_zero() {
        let timings = [0.0, 0.5, 0.5, 1.0];
        let values = [0.0, 1.0, 3.0, 0.0];
        let v = interpolate(0.5, &timings, &values);
        assert!(v.is_finite());
        assert!((v - 1.0).abs() < EPS);
    }

    #[test]
    fn test_single_and_empty_tracks() {
        assert_eq!(interpolate(0.4, &[0.0], &[9.0]), 9.0);
        assert_eq!(interpolate(0.4, &[], &[]), 0.0);
    }

    #[test]
    fn test_rotation_axes_are_independent() {
        let timings = [0.0, 0.5, 1.0];
        let keyframes = [
            Rotation::ZERO,
            Rotation::new(0.3, -0.3, 0.1),
            Rotation::ZERO,
        ];
        let r = interpolate_rotation(0.25, &timings, &keyframes);
        assert!((r.x - 0.15).abs() < EPS);
        assert!((r.y + 0.15).abs() < EPS);
        assert!((r.z - 0.05).abs() < EPS);

        let xs: Vec<f64> = keyframes.iter().map(|k| k.x).collect();
        let scalar = interpolate(0.6, &timings, &xs);
        let rotation = interpolate_rotation(0.6, &timings, &keyframes);
        assert!((scalar - rotation.x).abs() < EPS);
    }

    #[test]
    fn test_rotation_clamps() {
        let timings = [0.0, 1.0];
        let keyframes = [Rotation::new(1.0, 2.0, 3.0), Rotation::new(4.0, 5.0, 6.0)];
        assert_eq!(interpolate_rotation(2.0, &timings, &keyframes), keyframes[1]);
        assert_eq!(interpolate_rotation(-1.0, &timings, &keyframes), keyframes[0]);
        assert_eq!(interpolate_rotation(0.5, &[], &keyframes), Rotation::ZERO);
    }
}
