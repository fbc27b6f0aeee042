//! Folder browsing state: where we are, how we got here and what is listed.

use std::path::PathBuf;

use crate::audio::PlaybackContext;
use crate::config::LibrarySettings;
use crate::library::{self, Entry};

use super::navigation::step;

/// Shown in place of an empty listing.
pub const NO_FILES: &str = "No MP3 Files";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BrowseView {
    Folder(PathBuf),
    /// Flattened list of every track under the root.
    AllSongs,
}

/// What confirming the selected row leads to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Activation {
    /// A different listing is now shown.
    Entered,
    Play {
        track: PathBuf,
        context: PlaybackContext,
    },
    /// Placeholder row or nothing selected.
    Nothing,
}

#[derive(Debug)]
pub struct BrowseState {
    root: PathBuf,
    view: BrowseView,
    /// Views to return to on "back", with the selection they had.
    history: Vec<(BrowseView, usize)>,
    entries: Vec<Entry>,
    all_songs: Vec<PathBuf>,
    pub selected: usize,
}

impl BrowseState {
    pub fn new(root: PathBuf) -> Self {
        Self {
            view: BrowseView::Folder(root.clone()),
            root,
            history: Vec::new(),
            entries: Vec::new(),
            all_songs: Vec::new(),
            selected: 0,
        }
    }

    #[cfg(test)]
    pub fn view(&self) -> &BrowseView {
        &self.view
    }

    /// Start over at the library root.
    pub fn open_root(&mut self, settings: &LibrarySettings) {
        self.history.clear();
        self.view = BrowseView::Folder(self.root.clone());
        self.selected = 0;
        self.reload(settings);
    }

    /// Re-list the current view, keeping the selection in range.
    pub fn reload(&mut self, settings: &LibrarySettings) {
        match &self.view {
            BrowseView::Folder(dir) => {
                self.entries = library::list_folder(dir, &self.root, settings).unwrap_or_else(|e| {
                    log::warn!("failed to list {}: {e}", dir.display());
                    Vec::new()
                });
                self.all_songs.clear();
            }
            BrowseView::AllSongs => {
                self.all_songs = library::list_all(&self.root, settings);
                self.entries.clear();
                log::info!("showing all songs: {} found", self.all_songs.len());
            }
        }
        self.selected = self.selected.min(self.len().saturating_sub(1));
    }

    fn len(&self) -> usize {
        match self.view {
            BrowseView::Folder(_) => self.entries.len(),
            BrowseView::AllSongs => self.all_songs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row labels; a single placeholder when the listing is empty.
    pub fn labels(&self) -> Vec<String> {
        let labels: Vec<String> = match self.view {
            BrowseView::Folder(_) => self.entries.iter().map(|e| e.label().to_string()).collect(),
            BrowseView::AllSongs => self
                .all_songs
                .iter()
                .map(|p| {
                    p.file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default()
                })
                .collect(),
        };
        if labels.is_empty() {
            vec![NO_FILES.to_string()]
        } else {
            labels
        }
    }

    /// Title for the current view.
    pub fn title(&self) -> String {
        match &self.view {
            BrowseView::AllSongs => library::ALL_SONGS.to_string(),
            BrowseView::Folder(dir) if *dir == self.root => "Music".to_string(),
            BrowseView::Folder(dir) => dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }

    pub fn select_next(&mut self) {
        self.selected = step(self.selected, self.len(), true);
    }

    pub fn select_prev(&mut self) {
        self.selected = step(self.selected, self.len(), false);
    }

    /// Confirm the selected row.
    pub fn activate(&mut self, settings: &LibrarySettings) -> Activation {
        match &self.view {
            BrowseView::AllSongs => match self.all_songs.get(self.selected) {
                Some(track) => Activation::Play {
                    track: track.clone(),
                    context: PlaybackContext::AllSongs(self.root.clone()),
                },
                None => Activation::Nothing,
            },
            BrowseView::Folder(dir) => {
                let dir = dir.clone();
                match self.entries.get(self.selected).cloned() {
                    Some(Entry::AllSongs) => {
                        self.enter(BrowseView::AllSongs, settings);
                        Activation::Entered
                    }
                    Some(Entry::Folder(name)) => {
                        self.enter(BrowseView::Folder(dir.join(name)), settings);
                        Activation::Entered
                    }
                    Some(Entry::Track(name)) => Activation::Play {
                        track: dir.join(name),
                        context: PlaybackContext::Folder(dir),
                    },
                    None => Activation::Nothing,
                }
            }
        }
    }

    fn enter(&mut self, view: BrowseView, settings: &LibrarySettings) {
        let previous = std::mem::replace(&mut self.view, view);
        self.history.push((previous, self.selected));
        self.selected = 0;
        self.reload(settings);
    }

    /// Go back one level. Returns `false` when already at the first view,
    /// meaning the browser itself should be left.
    pub fn back(&mut self, settings: &LibrarySettings) -> bool {
        let Some((view, selected)) = self.history.pop() else {
            return false;
        };
        self.view = view;
        self.selected = selected;
        self.reload(settings);
        true
    }
}
