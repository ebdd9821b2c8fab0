//! Signa Video crate - third-party sign video generation and credentials.
//!
//! The core only supplies a prompt and reacts to success or failure; the
//! [`VideoGenerator`] trait is the seam, with [`FalVideoClient`] talking to
//! the fal.ai queue API. API keys live behind a [`CredentialStore`].

pub mod credentials;
pub mod error;
pub mod fal;
pub mod generator;

pub use credentials::{
    mask_key, open_store, CredentialStore, FileCredentialStore, MemoryCredentialStore,
};
pub use error::VideoError;
pub use fal::{extract_video_url, FalVideoClient};
pub use generator::{VideoGenerator, VideoOutput, VideoPrompt};
