//! Audio playback: the output device seam, its `rodio` implementation and
//! the controller that owns the "now playing" session.

mod output;
mod player;
mod queue;
mod sink;
mod types;

pub use player::PlaybackController;
pub use sink::RodioOutput;
pub use types::{NowPlaying, PlaybackContext};

#[cfg(test)]
pub(crate) use output::AudioOutput;
