use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{LibrarySettings, PlaybackSettings};
use crate::error::PlaybackError;
use crate::library::{self, Metadata, Track};

use super::output::AudioOutput;
use super::queue::{next_on_finish, next_on_skip, previous, relocate};
use super::types::{NowPlaying, PlaybackContext, PlaybackSession};

/// Owns the playback session and the audio output.
///
/// The context's track order is re-scanned on every skip and auto-advance
/// instead of being cached, so files added or removed in between (for
/// example by a sync) are picked up without any invalidation.
pub struct PlaybackController {
    output: Box<dyn AudioOutput>,
    session: PlaybackSession,
    library: LibrarySettings,
    repeat_playlist: bool,
    restart_threshold: Duration,
    volume: f32,
}

impl PlaybackController {
    pub fn new(
        mut output: Box<dyn AudioOutput>,
        library: LibrarySettings,
        playback: &PlaybackSettings,
    ) -> Self {
        let volume = playback.initial_volume.clamp(0.0, 1.0);
        output.set_volume(volume);
        Self {
            output,
            session: PlaybackSession::default(),
            library,
            repeat_playlist: playback.repeat_playlist,
            restart_threshold: Duration::from_secs(playback.restart_threshold_secs),
            volume,
        }
    }

    #[cfg(test)]
    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn repeat_playlist(&self) -> bool {
        self.repeat_playlist
    }

    pub fn set_repeat_playlist(&mut self, on: bool) {
        self.repeat_playlist = on;
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Set the output volume, clamped to `0.0..=1.0`.
    pub fn set_volume(&mut self, volume: f32) {
        // Round to avoid 0.30000000000000004-style drift from repeated steps.
        self.volume = ((volume.clamp(0.0, 1.0)) * 100.0).round() / 100.0;
        self.output.set_volume(self.volume);
        log::debug!("volume set to {:.2}", self.volume);
    }

    pub fn volume_up(&mut self, step: f32) {
        self.set_volume(self.volume + step);
    }

    pub fn volume_down(&mut self, step: f32) {
        self.set_volume(self.volume - step);
    }

    pub fn now_playing(&self) -> Option<NowPlaying> {
        let track = self.session.current.as_ref()?;
        Some(NowPlaying {
            title: track.info.title.clone(),
            artist: track.info.artist.clone(),
            elapsed: self.output.position(),
            duration: track.info.duration,
            playing: self.session.is_playing,
        })
    }

    /// Play `track`, remembering `context` for next/previous.
    ///
    /// On failure the previous session is kept but marked as not playing.
    pub fn load_and_play(
        &mut self,
        track: &Path,
        context: PlaybackContext,
    ) -> Result<(), PlaybackError> {
        let (context, tracks) = match self.scan(&context) {
            Ok(tracks) if tracks.iter().any(|t| t == track) => (context, tracks),
            _ => {
                let fallback = PlaybackContext::folder_of(track);
                match self.scan(&fallback) {
                    Ok(tracks) => (fallback, tracks),
                    Err(e) => {
                        self.session.is_playing = false;
                        log::warn!("failed to list {}: {e}", fallback.dir().display());
                        return Err(e);
                    }
                }
            }
        };

        let Some(index) = tracks.iter().position(|t| t == track) else {
            self.session.is_playing = false;
            return Err(PlaybackError::Open {
                path: track.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        };

        self.start(track, context, index)
    }

    /// Pause when audio is coming out, resume otherwise. Does nothing
    /// without a loaded track.
    pub fn toggle_pause_resume(&mut self) {
        if self.session.current.is_none() {
            return;
        }
        if self.output.is_busy() {
            self.output.pause();
            self.session.is_playing = false;
            log::info!("paused");
        } else {
            self.output.resume();
            self.session.is_playing = true;
            log::info!("resumed");
        }
    }

    /// Advance to the next track, wrapping to the first one after the last
    /// regardless of the repeat setting.
    pub fn skip_next(&mut self) -> Result<(), PlaybackError> {
        let Some((context, tracks, index)) = self.refresh()? else {
            log::debug!("next: nothing loaded");
            return Ok(());
        };
        let Some(next) = next_on_skip(index, tracks.len()) else {
            return Err(self.empty_context(&context));
        };
        self.start(&tracks[next], context, next)
    }

    /// Restart the current track when it has played past the threshold,
    /// otherwise go back one track. At the first track, restart instead.
    pub fn skip_previous_or_restart(&mut self) -> Result<(), PlaybackError> {
        if self.session.current.is_none() {
            log::debug!("previous: nothing loaded");
            return Ok(());
        }

        if self.output.position() > self.restart_threshold {
            return self.restart();
        }

        let Some((context, tracks, index)) = self.refresh()? else {
            return Ok(());
        };
        match previous(index) {
            Some(prev) => self.start(&tracks[prev], context, prev),
            None => self.restart(),
        }
    }

    /// Once per frame: move on when the current track has finished.
    pub fn tick(&mut self) -> Result<(), PlaybackError> {
        if !self.session.is_playing || self.session.context.is_none() || self.output.is_busy() {
            return Ok(());
        }

        let Some((context, tracks, index)) = self.refresh()? else {
            return Ok(());
        };
        match next_on_finish(index, tracks.len(), self.repeat_playlist) {
            Some(next) => {
                if next == 0 {
                    log::info!("restarting playlist in {}", context.dir().display());
                }
                self.start(&tracks[next], context, next)
            }
            None => {
                self.session.is_playing = false;
                log::info!("playback complete, no more songs");
                Ok(())
            }
        }
    }

    fn restart(&mut self) -> Result<(), PlaybackError> {
        match self.output.restart() {
            Ok(()) => {
                self.session.is_playing = true;
                log::info!("restarting current song");
                Ok(())
            }
            Err(e) => {
                self.session.is_playing = false;
                log::warn!("restart failed: {e}");
                Err(e)
            }
        }
    }

    fn scan(&self, context: &PlaybackContext) -> Result<Vec<PathBuf>, PlaybackError> {
        context
            .tracks(&self.library)
            .map_err(|source| PlaybackError::Open {
                path: context.dir().to_path_buf(),
                source,
            })
    }

    /// Re-scan the session's context and re-locate the current track in it.
    /// `None` when nothing is loaded.
    fn refresh(&mut self) -> Result<Option<(PlaybackContext, Vec<PathBuf>, usize)>, PlaybackError> {
        let (Some(context), Some(stored)) = (self.session.context.clone(), self.session.index)
        else {
            return Ok(None);
        };

        let tracks = match self.scan(&context) {
            Ok(tracks) => tracks,
            Err(e) => {
                self.session.is_playing = false;
                log::warn!("failed to re-scan {}: {e}", context.dir().display());
                return Err(e);
            }
        };

        let current = self.session.current.as_ref().map(|t| t.path.as_path());
        let Some(index) = relocate(&tracks, current, stored) else {
            return Err(self.empty_context(&context));
        };
        self.session.index = Some(index);
        Ok(Some((context, tracks, index)))
    }

    fn empty_context(&mut self, context: &PlaybackContext) -> PlaybackError {
        self.session.is_playing = false;
        log::warn!("no tracks left in {}", context.dir().display());
        PlaybackError::EmptyContext(context.dir().to_path_buf())
    }

    fn start(
        &mut self,
        track: &Path,
        context: PlaybackContext,
        index: usize,
    ) -> Result<(), PlaybackError> {
        if let Err(e) = self.output.play_file(track) {
            self.session.is_playing = false;
            log::warn!("failed to play {}: {e}", track.display());
            return Err(e);
        }

        let info = match library::read(track) {
            Metadata::Unreadable { info, error } => {
                log::warn!("{}: {error}, showing defaults", track.display());
                info
            }
            meta => meta.into_info(),
        };
        log::info!("now playing: {} from {}", info.title, track.display());

        self.session.current = Some(Track {
            path: track.to_path_buf(),
            info,
        });
        self.session.context = Some(context);
        self.session.index = Some(index);
        self.session.is_playing = true;
        Ok(())
    }
}
