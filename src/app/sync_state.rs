use std::path::PathBuf;

use crate::config::{LibrarySettings, SyncSettings};
use crate::error::SyncError;
use crate::sync::{SyncJob, SyncPoll, SyncReport};

#[derive(Debug)]
pub enum SyncStatus {
    Idle,
    Running { copied: usize, last: Option<PathBuf> },
    Done(Result<SyncReport, SyncError>),
}

/// Sync screen state. Each entry into the screen starts one attempt; a sync
/// already running (from startup) is adopted instead of starting another.
pub struct SyncState {
    settings: SyncSettings,
    library: LibrarySettings,
    local_root: PathBuf,
    attempted: bool,
    status: SyncStatus,
    job: Option<SyncJob>,
}

impl SyncState {
    pub fn new(settings: SyncSettings, library: LibrarySettings, local_root: PathBuf) -> Self {
        Self {
            settings,
            library,
            local_root,
            attempted: false,
            status: SyncStatus::Idle,
            job: None,
        }
    }

    pub fn status(&self) -> &SyncStatus {
        &self.status
    }

    pub fn attempted(&self) -> bool {
        self.attempted
    }

    pub fn is_running(&self) -> bool {
        self.job.is_some()
    }

    /// Start a background sync unless one is already running.
    pub fn start(&mut self) {
        if self.job.is_some() {
            return;
        }
        match SyncJob::spawn(
            self.settings.clone(),
            self.library.clone(),
            self.local_root.clone(),
        ) {
            Ok(job) => {
                self.job = Some(job);
                self.status = SyncStatus::Running {
                    copied: 0,
                    last: None,
                };
            }
            Err(e) => {
                log::error!("could not start sync worker: {e}");
                self.status = SyncStatus::Done(Err(SyncError::io(&self.local_root, e)));
            }
        }
    }

    /// Called when the sync screen is shown.
    pub fn enter(&mut self) {
        if self.job.is_none() {
            self.status = SyncStatus::Idle;
        }
        self.start();
        self.attempted = true;
    }

    /// Called when the sync screen is left; a running copy is cancelled.
    pub fn leave(&mut self) {
        self.attempted = false;
        if let Some(job) = &self.job {
            log::info!("cancelling sync");
            job.cancel();
        }
    }

    /// Pull progress from the worker. Returns `true` on the tick a sync
    /// finishes, so listings can be refreshed.
    pub fn poll(&mut self) -> bool {
        let Some(job) = self.job.as_mut() else {
            return false;
        };
        match job.poll() {
            SyncPoll::Running { copied, last } => {
                self.status = SyncStatus::Running { copied, last };
                false
            }
            SyncPoll::Finished(result) => {
                match &result {
                    Ok(report) => log::info!("sync finished: {report:?}"),
                    Err(SyncError::VolumeNotFound(label)) => log::info!("no {label} drive found"),
                    Err(e) => log::warn!("sync failed: {e}"),
                }
                self.job = None;
                self.status = SyncStatus::Done(result);
                true
            }
        }
    }

    /// One-line summary for the sync screen.
    pub fn message(&self) -> String {
        match &self.status {
            SyncStatus::Idle => "Waiting to sync".to_string(),
            SyncStatus::Running { copied: 0, .. } => "Syncing...".to_string(),
            SyncStatus::Running { copied, .. } => format!("Syncing... {copied} files copied"),
            SyncStatus::Done(Ok(_)) => "Transfer Complete".to_string(),
            SyncStatus::Done(Err(SyncError::VolumeNotFound(label))) => {
                format!("No {label} drive found")
            }
            SyncStatus::Done(Err(SyncError::Cancelled)) => "Sync cancelled".to_string(),
            SyncStatus::Done(Err(_)) => "Sync failed".to_string(),
        }
    }

    /// Extra detail under the summary, when there is any.
    pub fn detail(&self) -> Option<String> {
        match &self.status {
            SyncStatus::Running { last: Some(path), .. } => Some(path.display().to_string()),
            SyncStatus::Done(Ok(SyncReport::Bootstrapped { .. })) => {
                Some("New drive: music folders created".to_string())
            }
            SyncStatus::Done(Ok(SyncReport::Merged {
                files_copied,
                skipped,
                ..
            })) => {
                let mut text = format!("{files_copied} new files");
                if !skipped.is_empty() {
                    text.push_str(&format!(", missing on drive: {}", skipped.join(", ")));
                }
                Some(text)
            }
            SyncStatus::Done(Err(e @ (SyncError::Io { .. } | SyncError::Detection(_)))) => {
                Some(e.to_string())
            }
            _ => None,
        }
    }
}
