//! `rodio`-backed audio output.
//!
//! Each played file gets a fresh `Sink`, swapped in only once the file has
//! opened and decoded. Restarting seeks the sink back to zero and rebuilds
//! it when the decoder cannot seek.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};

use crate::error::PlaybackError;

use super::output::AudioOutput;

pub struct RodioOutput {
    stream: OutputStream,
    sink: Option<Sink>,
    current: Option<PathBuf>,
    volume: f32,
}

impl RodioOutput {
    /// Open the default output device.
    pub fn open(volume: f32) -> Result<Self, PlaybackError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| PlaybackError::Device(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped, which would land
        // on top of the TUI.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            sink: None,
            current: None,
            volume,
        })
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
    }
}

/// Create a playing `Sink` for the file at `path`.
fn create_sink(stream: &OutputStream, path: &Path, volume: f32) -> Result<Sink, PlaybackError> {
    let file = File::open(path).map_err(|source| PlaybackError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let source = Decoder::new(BufReader::new(file)).map_err(|e| PlaybackError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(volume);
    sink.append(source);
    sink.play();
    Ok(sink)
}

impl AudioOutput for RodioOutput {
    fn play_file(&mut self, path: &Path) -> Result<(), PlaybackError> {
        // The old sink keeps playing until the new file has opened.
        let sink = create_sink(&self.stream, path, self.volume)?;
        self.stop();
        self.sink = Some(sink);
        self.current = Some(path.to_path_buf());
        Ok(())
    }

    fn restart(&mut self) -> Result<(), PlaybackError> {
        let Some(path) = self.current.clone() else {
            return Err(PlaybackError::NoTrack);
        };

        if let Some(s) = self.sink.as_ref() {
            if !s.empty() && s.try_seek(Duration::ZERO).is_ok() {
                s.play();
                return Ok(());
            }
        }

        log::debug!("rebuilding sink to restart {}", path.display());
        self.play_file(&path)
    }

    fn pause(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.pause();
        }
    }

    fn resume(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.play();
        }
    }

    fn is_busy(&self) -> bool {
        self.sink
            .as_ref()
            .map(|s| !s.is_paused() && !s.empty())
            .unwrap_or(false)
    }

    fn position(&self) -> Duration {
        self.sink
            .as_ref()
            .map(|s| s.get_pos())
            .unwrap_or(Duration::ZERO)
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(s) = self.sink.as_ref() {
            s.set_volume(volume);
        }
    }
}
