use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::metadata::sort_key;
use super::model::{Entry, RESERVED_FOLDERS};

pub(crate) fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            settings
                .extensions
                .iter()
                .map(|e| e.trim().trim_start_matches('.'))
                .filter(|e| !e.is_empty())
                .any(|e| e.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Stable-sort `paths` by track number. Callers pass paths already ordered
/// by name, so equal keys keep that order.
fn sort_by_track_number(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut keyed: Vec<(u32, PathBuf)> = paths.into_iter().map(|p| (sort_key(&p), p)).collect();
    keyed.sort_by_key(|(key, _)| *key);
    keyed.into_iter().map(|(_, p)| p).collect()
}

/// Direct children of `dir`, split into subfolders and audio files, each
/// ordered by name.
fn children(dir: &Path, settings: &LibrarySettings) -> io::Result<(Vec<String>, Vec<PathBuf>)> {
    let mut names: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| settings.include_hidden || !is_hidden(p))
        .collect();
    names.sort();

    let mut folders = Vec::new();
    let mut files = Vec::new();
    for path in names {
        if path.is_dir() {
            if let Some(name) = path.file_name() {
                folders.push(name.to_string_lossy().into_owned());
            }
        } else if path.is_file() && is_audio_file(&path, settings) {
            files.push(path);
        }
    }
    Ok((folders, files))
}

/// Audio files directly inside `dir`, in track order.
pub fn folder_tracks(dir: &Path, settings: &LibrarySettings) -> io::Result<Vec<PathBuf>> {
    let (_, files) = children(dir, settings)?;
    Ok(sort_by_track_number(files))
}

/// Browse listing of `dir`: "All Songs" (library root only), subfolders,
/// then tracks in track order.
pub fn list_folder(dir: &Path, root: &Path, settings: &LibrarySettings) -> io::Result<Vec<Entry>> {
    let (folders, files) = children(dir, settings)?;

    let mut entries = Vec::with_capacity(folders.len() + files.len() + 1);
    if dir == root {
        entries.push(Entry::AllSongs);
    }
    entries.extend(folders.into_iter().map(Entry::Folder));
    entries.extend(
        sort_by_track_number(files)
            .into_iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .map(Entry::Track),
    );

    log::debug!("listed {} entries in {}", entries.len(), dir.display());
    Ok(entries)
}

/// Every audio file under `root`, sorted by track number across folders.
pub fn list_all(root: &Path, settings: &LibrarySettings) -> Vec<PathBuf> {
    let files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(settings.follow_links)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_audio_file(p, settings))
        .collect();

    log::debug!("found {} tracks under {}", files.len(), root.display());
    sort_by_track_number(files)
}

/// Create the reserved folders under the library root.
pub fn ensure_layout(root: &Path) -> io::Result<()> {
    for folder in RESERVED_FOLDERS {
        fs::create_dir_all(root.join(folder))?;
    }
    Ok(())
}
