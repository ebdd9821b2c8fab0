//! Word-by-word playback of an utterance.
//!
//! Each word's gesture runs on the driver until it goes idle; after an
//! optional gap the next word is activated. Words whose spec fails
//! validation are skipped with a warning so the frame loop never stalls.

use std::sync::Arc;

use signa_core::types::{AnimationSpec, GestureToken, Pose};

use crate::driver::AnimationDriver;

/// One word of an utterance with its gesture and compiled animation.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceItem {
    pub word: String,
    pub token: GestureToken,
    pub spec: Arc<AnimationSpec>,
}

impl SequenceItem {
    pub fn new(word: impl Into<String>, token: GestureToken, spec: AnimationSpec) -> Self {
        Self {
            word: word.into(),
            token,
            spec: Arc::new(spec),
        }
    }
}

/// Plays a sequence of gestures through a single driver.
#[derive(Debug, Clone)]
pub struct SequencePlayer {
    items: Vec<SequenceItem>,
    driver: AnimationDriver,
    word_gap_secs: f64,
    current: Option<usize>,
    gap_until: Option<f64>,
    active: bool,
    finished: bool,
}

impl SequencePlayer {
    /// Negative or non-finite gaps are treated as no gap.
    pub fn new(items: Vec<SequenceItem>, word_gap_secs: f64) -> Self {
        let word_gap_secs = if word_gap_secs.is_finite() {
            word_gap_secs.max(0.0)
        } else {
            0.0
        };
        Self {
            items,
            driver: AnimationDriver::new(),
            word_gap_secs,
            current: None,
            gap_until: None,
            active: false,
            finished: false,
        }
    }

    pub fn items(&self) -> &[SequenceItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn driver(&self) -> &AnimationDriver {
        &self.driver
    }

    /// Index of the word currently shown.
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_item(&self) -> Option<&SequenceItem> {
        self.current.and_then(|i| self.items.get(i))
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// True once the last word has completed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// True while waiting between two words.
    pub fn in_gap(&self) -> bool {
        self.gap_until.is_some()
    }

    /// Begin (or restart) playback from the first word at `now`.
    pub fn start(&mut self, now: f64) {
        self.current = None;
        self.gap_until = None;
        self.finished = false;
        self.active = true;
        tracing::debug!(words = self.items.len(), "Sequence started");
        self.begin(0, now);
    }

    /// Withdraw the active signal. The pose is held; `start` restarts.
    pub fn stop(&mut self) {
        if self.active {
            tracing::debug!(index = ?self.current, "Sequence stopped");
        }
        self.active = false;
        self.gap_until = None;
        self.driver.deactivate();
    }

    /// Advance to `now` and return the pose to render.
    pub fn tick(&mut self, now: f64) -> &Pose {
        if !self.active {
            return self.driver.pose();
        }

        if let Some(until) = self.gap_until {
            if now >= until {
                self.gap_until = None;
                self.begin(self.next_index(), now);
            }
            return self.driver.pose();
        }

        self.driver.tick(now);
        if !self.driver.is_playing() {
            let next = self.next_index();
            if self.word_gap_secs > 0.0 && next < self.items.len() {
                self.gap_until = Some(now + self.word_gap_secs);
            } else {
                self.begin(next, now);
            }
        }
        self.driver.pose()
    }

    fn next_index(&self) -> usize {
        self.current.map_or(0, |i| i + 1)
    }

    fn begin(&mut self, from: usize, now: f64) {
        for index in from..self.items.len() {
            let item = &self.items[index];
            match self.driver.activate(Arc::clone(&item.spec), now) {
                Ok(()) => {
                    tracing::debug!(index, word = %item.word, token = %item.token, "Word active");
                    self.current = Some(index);
                    return;
                }
                Err(e) => {
                    tracing::warn!(index, word = %item.word, error = %e, "Skipping word");
                }
            }
        }
        self.finished = true;
        self.active = false;
        tracing::debug!("Sequence finished");
    }
}
