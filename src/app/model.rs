//! List cursor model: `App`.
//!
//! The `App` struct holds what the track list needs beyond the session:
//! the cursor position and whether it follows the playing track.

use crate::library::Catalog;

/// The list-side application model.
pub struct App {
    pub titles: Vec<String>,
    pub selected: usize,
    pub follow_playback: bool,
    pub info_window: bool,
}

impl App {
    /// Create a new `App` listing every title in `catalog`.
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            titles: catalog.titles().into_iter().map(str::to_string).collect(),
            selected: 0,
            follow_playback: true,
            info_window: false,
        }
    }

    /// Return true if the list contains any tracks.
    pub fn has_tracks(&self) -> bool {
        !self.titles.is_empty()
    }

    pub fn toggle_info_window(&mut self) {
        self.info_window = !self.info_window;
    }

    /// Enable following playback (cursor follows currently playing track).
    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
    }

    pub fn follow_playback_off(&mut self) {
        self.follow_playback = false;
    }

    /// Move the cursor to the playing track when following playback.
    pub fn sync_with_playing(&mut self, playing: Option<usize>) {
        if !self.follow_playback {
            return;
        }
        if let Some(i) = playing.filter(|&i| i < self.titles.len()) {
            self.selected = i;
        }
    }

    /// Set the cursor, clamped to the list.
    pub fn set_selected(&mut self, idx: usize) {
        self.selected = idx.min(self.titles.len().saturating_sub(1));
    }

    /// Move the cursor down, wrapping to the top.
    pub fn next(&mut self) {
        if self.has_tracks() {
            self.selected = (self.selected + 1) % self.titles.len();
        }
    }

    /// Move the cursor up, wrapping to the bottom.
    pub fn prev(&mut self) {
        if self.has_tracks() {
            self.selected = match self.selected {
                0 => self.titles.len() - 1,
                i => i - 1,
            };
        }
    }

    pub fn first(&mut self) {
        self.selected = 0;
    }

    pub fn last(&mut self) {
        self.set_selected(usize::MAX);
    }
}
