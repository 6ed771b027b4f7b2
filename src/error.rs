//! Error types shared across the player.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while querying the media index.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// The library root does not exist or cannot be read.
    #[error("library root {0:?} is not readable")]
    Unreadable(PathBuf),

    /// Walking the library tree failed.
    #[error("failed to walk library: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Errors raised by a decoder resource.
#[derive(Debug, Error)]
pub enum DecoderError {
    /// No source has been bound to the decoder yet.
    #[error("no source set")]
    NoSource,

    /// The source could not be opened.
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The source was opened but could not be decoded.
    #[error("failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },

    /// Seeking within the current source failed.
    #[error("seek failed: {0}")]
    Seek(String),
}

/// Top-level error surfaced by the runtime.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("audio output unavailable: {0}")]
    Output(String),

    #[error("failed to initialise logging: {0}")]
    Logging(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for decoder operations.
pub type DecoderResult<T> = std::result::Result<T, DecoderError>;
