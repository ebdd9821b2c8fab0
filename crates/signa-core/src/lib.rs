pub mod config;
pub mod error;
pub mod types;

pub use config::SignaConfig;
pub use error::{Result, SignaError};
pub use types::*;
