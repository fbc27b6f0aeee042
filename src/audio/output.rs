use std::path::Path;
use std::time::Duration;

use crate::error::PlaybackError;

/// Transport operations on the audio device.
///
/// There is one output per process and only `PlaybackController` holds it.
pub trait AudioOutput {
    /// Stop whatever is playing and start `path` from the beginning.
    fn play_file(&mut self, path: &Path) -> Result<(), PlaybackError>;

    /// Start the current file over from position zero.
    fn restart(&mut self) -> Result<(), PlaybackError>;

    fn pause(&mut self);

    fn resume(&mut self);

    /// True while audio is actually coming out: loaded, not paused, not finished.
    fn is_busy(&self) -> bool;

    /// Play position within the current file.
    fn position(&self) -> Duration;

    /// Volume in `0.0..=1.0`.
    fn set_volume(&mut self, volume: f32);
}
