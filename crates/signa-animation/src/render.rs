//! Rendering seam and frame clock.

use signa_core::types::Pose;

/// Receives the computed pose once per displayed frame.
///
/// Implementations own whatever scene-graph or terminal handles they need;
/// the driver never sees them.
pub trait PoseRenderer {
    fn render(&mut self, frame: u64, now: f64, pose: &Pose);
}

/// Fixed-rate synthetic clock for headless playback.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameClock {
    fps: u32,
    frame: u64,
    origin: f64,
}

impl FrameClock {
    /// A clock starting at `origin` seconds. `fps` of 0 is treated as 1.
    pub fn new(fps: u32, origin: f64) -> Self {
        Self {
            fps: fps.max(1),
            frame: 0,
            origin,
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Seconds per frame.
    pub fn frame_secs(&self) -> f64 {
        1.0 / f64::from(self.fps)
    }

    /// Current time in seconds.
    pub fn now(&self) -> f64 {
        self.origin + self.frame as f64 * self.frame_secs()
    }

    /// Advance one frame and return the new time.
    pub fn advance(&mut self) -> f64 {
        self.frame += 1;
        self.now()
    }
}
