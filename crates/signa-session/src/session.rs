//! Transcript session: the current text and everything derived from it.
//!
//! The session is single-owner. Video generation runs outside it: the
//! caller takes a [`VideoJob`], awaits it on any task, and hands the
//! [`VideoCompletion`] back through
//! [`apply_video_result`](TranscriptSession::apply_video_result), which
//! drops results whose request has since been superseded.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use signa_animation::{SequenceItem, SequencePlayer};
use signa_core::error::{Result, SignaError};
use signa_core::types::Pose;
use signa_notation::{compile, EncodedWord, NotationEncoder, SEPARATOR};
use signa_video::{VideoError, VideoGenerator, VideoOutput, VideoPrompt};

use crate::request::{RequestToken, RequestTracker};
use crate::state::{CaptureMachine, CaptureState};

/// Progress of the video for the current text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VideoState {
    #[default]
    Idle,
    Pending(RequestToken),
    Ready(VideoOutput),
    Failed(String),
}

/// A video request detached from the session so it can be awaited freely.
#[derive(Debug, Clone)]
pub struct VideoJob {
    pub token: RequestToken,
    pub prompt: VideoPrompt,
}

impl VideoJob {
    pub async fn run(self, generator: &dyn VideoGenerator, api_key: &str) -> VideoCompletion {
        tracing::debug!(token = %self.token, provider = generator.name(), "Video job running");
        let result = generator.generate(&self.prompt, api_key).await;
        VideoCompletion {
            token: self.token,
            result,
        }
    }
}

/// The outcome of a [`VideoJob`].
#[derive(Debug)]
pub struct VideoCompletion {
    pub token: RequestToken,
    pub result: std::result::Result<VideoOutput, VideoError>,
}

/// Holds the latest transcript, its notation and the word sequence.
#[derive(Debug)]
pub struct TranscriptSession {
    id: Uuid,
    created_at: DateTime<Utc>,
    capture: CaptureMachine,
    encoder: NotationEncoder,
    word_gap_secs: f64,
    text: String,
    words: Vec<EncodedWord>,
    notation: String,
    player: SequencePlayer,
    requests: RequestTracker,
    video: VideoState,
}

impl TranscriptSession {
    pub fn new(encoder: NotationEncoder, word_gap_secs: f64) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            capture: CaptureMachine::new(),
            encoder,
            word_gap_secs,
            text: String::new(),
            words: Vec::new(),
            notation: String::new(),
            player: SequencePlayer::new(Vec::new(), word_gap_secs),
            requests: RequestTracker::new(),
            video: VideoState::Idle,
        };
        tracing::info!(session_id = %session.id, "Transcript session created");
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn capture_state(&self) -> CaptureState {
        self.capture.current()
    }

    /// Idle -> Listening. Fails if already listening.
    pub fn start_listening(&mut self) -> Result<()> {
        self.capture.transition(CaptureState::Listening)?;
        tracing::info!(session_id = %self.id, "Listening started");
        Ok(())
    }

    /// Listening -> Idle. Fails if not listening.
    pub fn stop_listening(&mut self) -> Result<()> {
        self.capture.transition(CaptureState::Idle)?;
        tracing::info!(session_id = %self.id, "Listening stopped");
        Ok(())
    }

    /// Replace the current text with `text` and restart playback at `now`.
    ///
    /// Any pending video request is superseded. Returns the new notation.
    pub fn on_transcript(&mut self, text: &str, now: f64) -> &str {
        self.text = text.to_string();
        self.words = self.encoder.encode_words(text);
        self.notation = self
            .words
            .iter()
            .map(|w| w.token.as_str())
            .collect::<Vec<_>>()
            .join(SEPARATOR);

        let items = self
            .words
            .iter()
            .map(|w| SequenceItem::new(w.word.clone(), w.token.clone(), compile(&w.token)))
            .collect();
        self.player = SequencePlayer::new(items, self.word_gap_secs);
        if !self.player.is_empty() {
            self.player.start(now);
        }

        if let VideoState::Pending(token) = self.video {
            tracing::debug!(token = %token, "Pending video superseded by new transcript");
        }
        self.requests.invalidate();
        self.video = VideoState::Idle;

        tracing::info!(
            session_id = %self.id,
            words = self.words.len(),
            unknown = self.words.iter().filter(|w| !w.known).count(),
            "Transcript updated"
        );
        &self.notation
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn notation(&self) -> &str {
        &self.notation
    }

    pub fn words(&self) -> &[EncodedWord] {
        &self.words
    }

    pub fn sequence(&self) -> &SequencePlayer {
        &self.player
    }

    /// Advance playback to `now` and return the pose to render.
    pub fn tick(&mut self, now: f64) -> &Pose {
        self.player.tick(now)
    }

    pub fn video_state(&self) -> &VideoState {
        &self.video
    }

    /// Issue a video request for the current text.
    ///
    /// Fails with `SignaError::Session` if there is no text yet. Any earlier
    /// request becomes stale.
    pub fn begin_video_request(&mut self, include_notation: bool) -> Result<VideoJob> {
        let mut prompt =
            VideoPrompt::new(self.text.clone()).map_err(|e| SignaError::Session(e.to_string()))?;
        if include_notation {
            prompt = prompt.with_notation(self.notation.clone());
        }
        let token = self.requests.issue();
        self.video = VideoState::Pending(token);
        tracing::info!(session_id = %self.id, token = %token, "Video requested");
        Ok(VideoJob { token, prompt })
    }

    /// Apply a finished video request.
    ///
    /// Returns `false` and leaves the session untouched when the request has
    /// been superseded.
    pub fn apply_video_result(&mut self, completion: VideoCompletion) -> bool {
        if !self.requests.is_current(completion.token) {
            tracing::debug!(token = %completion.token, "Discarding stale video result");
            return false;
        }
        self.requests.invalidate();
        self.video = match completion.result {
            Ok(output) => {
                tracing::info!(token = %completion.token, url = %output.url, "Video ready");
                VideoState::Ready(output)
            }
            Err(e) => {
                tracing::warn!(token = %completion.token, error = %e, "Video generation failed");
                VideoState::Failed(e.to_string())
            }
        };
        true
    }
}
