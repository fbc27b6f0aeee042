use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::error::SyncError;
use crate::library::{self, RESERVED_FOLDERS};

use super::progress::{CancelToken, SyncEvent};

/// What a successful reconciliation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncReport {
    /// The drive had no music folder; the canonical layout was created on it.
    Bootstrapped { drive: PathBuf },
    /// Drive content was merged into the local library.
    Merged {
        drive: PathBuf,
        files_copied: usize,
        dirs_created: usize,
        /// Canonical folders missing on the drive.
        skipped: Vec<String>,
    },
}

/// Bootstrap or merge the drive mounted at `drive` into `local_root`.
///
/// `music_dir` names the drive's music folder. Existing local files are
/// never overwritten, even when their content differs.
pub fn reconcile(
    drive: &Path,
    music_dir: &str,
    local_root: &Path,
    library: &LibrarySettings,
    cancel: &CancelToken,
    progress: Option<&Sender<SyncEvent>>,
) -> Result<SyncReport, SyncError> {
    let drive_music = drive.join(music_dir);

    if !drive_music.exists() {
        log::info!("setting up new drive at {}", drive.display());
        library::ensure_layout(&drive_music).map_err(|e| {
            log::error!("failed to create folders on {}: {e}", drive_music.display());
            SyncError::io(&drive_music, e)
        })?;
        return Ok(SyncReport::Bootstrapped {
            drive: drive.to_path_buf(),
        });
    }

    log::info!("syncing {} into {}", drive_music.display(), local_root.display());
    let mut merge = Merge {
        library,
        cancel,
        progress,
        files_copied: 0,
        dirs_created: 0,
    };
    let mut skipped = Vec::new();

    for folder in RESERVED_FOLDERS {
        let src = drive_music.join(folder);
        if !src.is_dir() {
            log::warn!("{folder} folder not found on drive, skipping");
            skipped.push(folder.to_string());
            continue;
        }
        merge.folder(&src, &local_root.join(folder)).inspect_err(|e| {
            log::error!("sync of {folder} stopped: {e}");
        })?;
    }

    log::info!(
        "sync completed: {} files copied, {} folders created",
        merge.files_copied,
        merge.dirs_created
    );
    Ok(SyncReport::Merged {
        drive: drive.to_path_buf(),
        files_copied: merge.files_copied,
        dirs_created: merge.dirs_created,
        skipped,
    })
}

struct Merge<'a> {
    library: &'a LibrarySettings,
    cancel: &'a CancelToken,
    progress: Option<&'a Sender<SyncEvent>>,
    files_copied: usize,
    dirs_created: usize,
}

impl Merge<'_> {
    fn folder(&mut self, src: &Path, dest: &Path) -> Result<(), SyncError> {
        self.create_dir(dest)?;

        for entry in WalkDir::new(src).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(src).to_path_buf();
                SyncError::io(path, io::Error::from(e))
            })?;

            let Ok(rel) = entry.path().strip_prefix(src) else {
                continue;
            };
            let target = dest.join(rel);

            if entry.file_type().is_dir() {
                self.create_dir(&target)?;
            } else if library::is_audio_file(entry.path(), self.library) && !target.exists() {
                if self.cancel.is_cancelled() {
                    log::info!("sync cancelled after {} files", self.files_copied);
                    return Err(SyncError::Cancelled);
                }
                copy_file(entry.path(), &target)?;
                self.files_copied += 1;
                log::debug!("copied {}", rel.display());
                if let Some(tx) = self.progress {
                    // The receiver may be gone when the UI stopped listening.
                    let _ = tx.send(SyncEvent::Copied {
                        path: rel.to_path_buf(),
                        copied: self.files_copied,
                    });
                }
            }
        }
        Ok(())
    }

    fn create_dir(&mut self, dir: &Path) -> Result<(), SyncError> {
        if dir.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(dir).map_err(|e| SyncError::io(dir, e))?;
        self.dirs_created += 1;
        Ok(())
    }
}

/// Copy content and modification time.
fn copy_file(src: &Path, dest: &Path) -> Result<(), SyncError> {
    fs::copy(src, dest).map_err(|e| SyncError::io(dest, e))?;

    let modified = fs::metadata(src).and_then(|m| m.modified());
    let applied = modified.and_then(|t| File::options().write(true).open(dest)?.set_modified(t));
    if let Err(e) = applied {
        log::debug!("could not keep mtime of {}: {e}", dest.display());
    }
    Ok(())
}
