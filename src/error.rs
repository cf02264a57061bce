//! Error types for the collaborator and configuration boundaries.
//!
//! The simulation itself never fails; these only describe what can go wrong
//! outside it.

use thiserror::Error;

use crate::animation::SpriteKey;

/// Failure reported by a render or audio backend.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("backend error: {0}")]
    Backend(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing sprite {0:?}")]
    MissingAsset(SpriteKey),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}
