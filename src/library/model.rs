use std::path::PathBuf;
use std::time::Duration;

/// Ordering key given to tracks without a usable track number.
pub const SENTINEL_TRACK_NUMBER: u32 = 999;

pub const UNKNOWN_TITLE: &str = "Unknown Song";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Folders every library root (and every paired drive) carries.
pub const RESERVED_FOLDERS: [&str; 3] = ["Albums", "Artists", "Playlists"];

/// Name of the synthetic entry listing every track in the library.
pub const ALL_SONGS: &str = "All Songs";

/// Tag-derived attributes of one audio file.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackInfo {
    pub title: String,
    pub artist: String,
    pub duration: Duration,
    pub track_number: u32,
}

impl Default for TrackInfo {
    fn default() -> Self {
        Self {
            title: UNKNOWN_TITLE.to_string(),
            artist: UNKNOWN_ARTIST.to_string(),
            duration: Duration::ZERO,
            track_number: SENTINEL_TRACK_NUMBER,
        }
    }
}

/// A track keyed by its absolute path.
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    pub path: PathBuf,
    pub info: TrackInfo,
}

/// One row of a folder listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entry {
    /// The flattened view of every track under the library root.
    AllSongs,
    Folder(String),
    Track(String),
}

impl Entry {
    pub fn label(&self) -> &str {
        match self {
            Entry::AllSongs => ALL_SONGS,
            Entry::Folder(name) | Entry::Track(name) => name,
        }
    }
}
