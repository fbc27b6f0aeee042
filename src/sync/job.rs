use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use crate::config::{LibrarySettings, SyncSettings};
use crate::error::SyncError;

use super::progress::{CancelToken, SyncEvent};
use super::reconcile::{SyncReport, reconcile};
use super::volume::find_volume;

/// Find the drive and reconcile it with `local_root`.
pub fn detect_and_sync(
    settings: &SyncSettings,
    library: &LibrarySettings,
    local_root: &Path,
    cancel: &CancelToken,
    progress: Option<&Sender<SyncEvent>>,
) -> Result<SyncReport, SyncError> {
    let drive = find_volume(settings)?;
    reconcile(
        &drive,
        &settings.drive_music_dir,
        local_root,
        library,
        cancel,
        progress,
    )
}

/// State of a background sync as seen by the main loop.
#[derive(Debug)]
pub enum SyncPoll {
    Running { copied: usize, last: Option<PathBuf> },
    Finished(Result<SyncReport, SyncError>),
}

/// A sync running on its own thread. Only progress messages cross back.
pub struct SyncJob {
    rx: Receiver<SyncEvent>,
    cancel: CancelToken,
    handle: Option<JoinHandle<()>>,
    copied: usize,
    last: Option<PathBuf>,
}

impl SyncJob {
    pub fn spawn(
        settings: SyncSettings,
        library: LibrarySettings,
        local_root: PathBuf,
    ) -> io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let cancel = CancelToken::new();
        let worker_cancel = cancel.clone();

        let handle = thread::Builder::new()
            .name("pipod-sync".into())
            .spawn(move || {
                let result =
                    detect_and_sync(&settings, &library, &local_root, &worker_cancel, Some(&tx));
                let _ = tx.send(SyncEvent::Finished(result));
            })?;

        log::debug!("sync worker started");
        Ok(Self {
            rx,
            cancel,
            handle: Some(handle),
            copied: 0,
            last: None,
        })
    }

    /// Ask the worker to stop before its next copy.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Drain pending events without blocking.
    pub fn poll(&mut self) -> SyncPoll {
        loop {
            match self.rx.try_recv() {
                Ok(SyncEvent::Copied { path, copied }) => {
                    self.copied = copied;
                    self.last = Some(path);
                }
                Ok(SyncEvent::Finished(result)) => {
                    self.join();
                    return SyncPoll::Finished(result);
                }
                Err(TryRecvError::Empty) => {
                    return SyncPoll::Running {
                        copied: self.copied,
                        last: self.last.clone(),
                    };
                }
                Err(TryRecvError::Disconnected) => {
                    self.join();
                    return SyncPoll::Finished(Err(SyncError::Detection(
                        "sync worker exited unexpectedly".into(),
                    )));
                }
            }
        }
    }

    fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("sync worker panicked");
            }
        }
    }
}

impl Drop for SyncJob {
    fn drop(&mut self) {
        self.cancel();
    }
}
