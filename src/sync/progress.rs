use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::SyncError;

use super::reconcile::SyncReport;

/// Shared cancellation flag, checked between file copies.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Messages sent from the sync worker to the main loop.
#[derive(Debug)]
pub enum SyncEvent {
    /// A file was copied; `copied` counts every copy so far.
    Copied { path: PathBuf, copied: usize },
    Finished(Result<SyncReport, SyncError>),
}
