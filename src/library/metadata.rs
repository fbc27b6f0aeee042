//! Tag reading.
//!
//! Reading never fails from the caller's point of view: every path yields a
//! `Metadata` value whose variant says how much of it came from the file.

use std::path::Path;

use lofty::prelude::{AudioFile, ItemKey, TaggedFileExt};

use crate::error::MetadataError;

use super::model::{SENTINEL_TRACK_NUMBER, TrackInfo};

#[derive(Debug)]
pub enum Metadata {
    /// Title, artist and track number were all present.
    Tagged(TrackInfo),
    /// The file parsed but some fields fell back to defaults.
    Defaulted(TrackInfo),
    /// The file could not be parsed at all; `info` holds the defaults.
    Unreadable {
        info: TrackInfo,
        error: MetadataError,
    },
}

impl Metadata {
    pub fn info(&self) -> &TrackInfo {
        match self {
            Metadata::Tagged(info) | Metadata::Defaulted(info) => info,
            Metadata::Unreadable { info, .. } => info,
        }
    }

    pub fn into_info(self) -> TrackInfo {
        match self {
            Metadata::Tagged(info) | Metadata::Defaulted(info) => info,
            Metadata::Unreadable { info, .. } => info,
        }
    }
}

/// Parse a track-number tag value such as `"3"` or `"3/12"`.
pub fn parse_track_number(raw: &str) -> Option<u32> {
    raw.split('/').next()?.trim().parse().ok()
}

pub fn read(path: &Path) -> Metadata {
    let tagged = match lofty::read_from_path(path) {
        Ok(tagged) => tagged,
        Err(e) => {
            log::debug!("unreadable tags in {}: {e}", path.display());
            return Metadata::Unreadable {
                info: TrackInfo::default(),
                error: MetadataError::from(e),
            };
        }
    };

    let mut info = TrackInfo {
        duration: tagged.properties().duration(),
        ..TrackInfo::default()
    };
    let mut complete = false;

    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        let title = tag
            .get_string(&ItemKey::TrackTitle)
            .map(str::trim)
            .filter(|v| !v.is_empty());
        let artist = tag
            .get_string(&ItemKey::TrackArtist)
            .map(str::trim)
            .filter(|v| !v.is_empty());
        let track_number = tag
            .get_string(&ItemKey::TrackNumber)
            .and_then(parse_track_number);

        complete = title.is_some() && artist.is_some() && track_number.is_some();

        if let Some(v) = title {
            info.title = v.to_string();
        }
        if let Some(v) = artist {
            info.artist = v.to_string();
        }
        info.track_number = track_number.unwrap_or(SENTINEL_TRACK_NUMBER);
    }

    if complete {
        Metadata::Tagged(info)
    } else {
        log::debug!("incomplete tags in {}, using defaults", path.display());
        Metadata::Defaulted(info)
    }
}

/// Ordering key for `path`: its track number, or the sentinel.
pub fn sort_key(path: &Path) -> u32 {
    read(path).info().track_number
}
