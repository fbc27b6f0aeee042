//! Error kinds for the three fallible subsystems.
//!
//! Metadata errors never leave the library module (they ride inside
//! `Metadata::Unreadable`), playback errors abort a load and leave the
//! session idle, and sync errors turn into a failed sync report.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("failed to read tags: {0}")]
    Tags(#[from] lofty::error::LoftyError),
}

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("failed to open {path}: {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("audio output unavailable: {0}")]
    Device(String),

    #[error("no track loaded")]
    NoTrack,

    #[error("no playable tracks left in {0}")]
    EmptyContext(PathBuf),
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("no drive labeled '{0}' is mounted")]
    VolumeNotFound(String),

    #[error("volume detection failed: {0}")]
    Detection(String),

    #[error("i/o error at {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("sync cancelled")]
    Cancelled,
}

impl SyncError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
