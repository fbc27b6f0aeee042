//! Index arithmetic over a playback context.
//!
//! A manual skip always wraps around; a track ending on its own only wraps
//! when repeat is enabled.

use std::path::{Path, PathBuf};

/// Where `current` sits in a freshly scanned `tracks`. Falls back to the
/// stored index clamped into range when the file is gone.
pub(crate) fn relocate(tracks: &[PathBuf], current: Option<&Path>, stored: usize) -> Option<usize> {
    if tracks.is_empty() {
        return None;
    }
    current
        .and_then(|path| tracks.iter().position(|t| t == path))
        .or(Some(stored.min(tracks.len() - 1)))
}

/// Next index for the "next" key.
pub(crate) fn next_on_skip(index: usize, len: usize) -> Option<usize> {
    if len == 0 {
        None
    } else if index + 1 < len {
        Some(index + 1)
    } else {
        Some(0)
    }
}

/// Next index once the current track has finished by itself. `None` means
/// playback is over.
pub(crate) fn next_on_finish(index: usize, len: usize, repeat: bool) -> Option<usize> {
    if index + 1 < len {
        Some(index + 1)
    } else if repeat && len > 0 {
        Some(0)
    } else {
        None
    }
}

/// Previous index, or `None` when already at the first track.
pub(crate) fn previous(index: usize) -> Option<usize> {
    index.checked_sub(1)
}
