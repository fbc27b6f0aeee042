//! Library access: tag reading, folder listings and the flattened
//! "All Songs" view.
//!
//! Listings are recomputed on every call; nothing is cached.

mod display;
mod metadata;
mod model;
mod scan;

pub use display::*;
pub use metadata::{Metadata, read};
pub use model::*;
pub use scan::{ensure_layout, folder_tracks, list_all, list_folder};

pub(crate) use scan::is_audio_file;
