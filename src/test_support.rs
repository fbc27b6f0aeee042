//! Fixture helpers shared by the unit tests.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use crate::audio::AudioOutput;
use crate::error::PlaybackError;

/// Write a tiny but well-formed MP3: an ID3v2.3 tag followed by a few
/// silent MPEG-1 Layer III frames (128 kbps, 44.1 kHz).
pub fn write_mp3(path: &Path, title: Option<&str>, artist: Option<&str>, track: Option<&str>) {
    let mut frames = Vec::new();
    for (id, value) in [("TIT2", title), ("TPE1", artist), ("TRCK", track)] {
        if let Some(value) = value {
            let mut body = vec![0u8]; // ISO-8859-1
            body.extend_from_slice(value.as_bytes());
            frames.extend_from_slice(id.as_bytes());
            frames.extend_from_slice(&(body.len() as u32).to_be_bytes());
            frames.extend_from_slice(&[0, 0]);
            frames.extend_from_slice(&body);
        }
    }

    let mut bytes = Vec::new();
    if !frames.is_empty() {
        let size = frames.len() as u32;
        bytes.extend_from_slice(b"ID3");
        bytes.extend_from_slice(&[3, 0, 0]);
        // Synchsafe size: 7 bits per byte.
        bytes.extend_from_slice(&[
            ((size >> 21) & 0x7f) as u8,
            ((size >> 14) & 0x7f) as u8,
            ((size >> 7) & 0x7f) as u8,
            (size & 0x7f) as u8,
        ]);
        bytes.extend_from_slice(&frames);
    }

    for _ in 0..8 {
        let mut frame = vec![0u8; 417];
        frame[..4].copy_from_slice(&[0xFF, 0xFB, 0x90, 0x00]);
        bytes.extend_from_slice(&frame);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, bytes).unwrap();
}

/// An `.mp3` whose content no tag reader accepts.
pub fn write_junk(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[derive(Default)]
struct FakeState {
    played: Vec<PathBuf>,
    busy: bool,
    position: Duration,
    restarts: usize,
    failing: Vec<PathBuf>,
    volume: f32,
}

/// In-memory `AudioOutput`. Clones share state, so a test keeps one handle
/// while the controller owns the other.
#[derive(Clone, Default)]
pub struct FakeOutput(Rc<RefCell<FakeState>>);

impl FakeOutput {
    /// Behave as if the current track played to its end.
    pub fn finish_track(&self) {
        self.0.borrow_mut().busy = false;
    }

    pub fn set_position(&self, secs: u64) {
        self.0.borrow_mut().position = Duration::from_secs(secs);
    }

    /// Make `play_file` fail for `path`.
    pub fn fail_on(&self, path: &Path) {
        self.0.borrow_mut().failing.push(path.to_path_buf());
    }

    /// Whether audio would currently be heard.
    pub fn audible(&self) -> bool {
        self.0.borrow().busy
    }

    pub fn restarts(&self) -> usize {
        self.0.borrow().restarts
    }

    pub fn volume(&self) -> f32 {
        self.0.borrow().volume
    }

    /// File names passed to `play_file`, in order.
    pub fn played(&self) -> Vec<String> {
        self.0
            .borrow()
            .played
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }
}

impl AudioOutput for FakeOutput {
    fn play_file(&mut self, path: &Path) -> Result<(), PlaybackError> {
        let mut s = self.0.borrow_mut();
        if s.failing.iter().any(|p| p == path) {
            return Err(PlaybackError::Decode {
                path: path.to_path_buf(),
                reason: "unsupported".into(),
            });
        }
        s.played.push(path.to_path_buf());
        s.busy = true;
        s.position = Duration::ZERO;
        Ok(())
    }

    fn restart(&mut self) -> Result<(), PlaybackError> {
        let mut s = self.0.borrow_mut();
        s.restarts += 1;
        s.busy = true;
        s.position = Duration::ZERO;
        Ok(())
    }

    fn pause(&mut self) {
        self.0.borrow_mut().busy = false;
    }

    fn resume(&mut self) {
        self.0.borrow_mut().busy = true;
    }

    fn is_busy(&self) -> bool {
        self.0.borrow().busy
    }

    fn position(&self) -> Duration {
        self.0.borrow().position
    }

    fn set_volume(&mut self, volume: f32) {
        self.0.borrow_mut().volume = volume;
    }
}
