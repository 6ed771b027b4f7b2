use std::cell::RefCell;
use std::path::{Path, PathBuf};

use lofty::prelude::*;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::error::LibraryError;

use super::catalog::MediaIndex;
use super::model::{IndexRow, SourceLocator};

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Media index backed by a directory tree.
///
/// Row ids are positions in the path-sorted scan; the locator of a row is
/// its absolute path.
pub struct FsMediaIndex {
    root: PathBuf,
    settings: LibrarySettings,
    paths: RefCell<Vec<PathBuf>>,
}

impl FsMediaIndex {
    pub fn new(root: impl Into<PathBuf>, settings: LibrarySettings) -> Self {
        Self {
            root: root.into(),
            settings,
            paths: RefCell::new(Vec::new()),
        }
    }

    /// Walk the tree and return matching files in path order.
    ///
    /// Failing to read the root itself is an error; unreadable entries
    /// below it are skipped.
    fn collect_paths(&self) -> Result<Vec<PathBuf>, LibraryError> {
        let settings = &self.settings;
        let mut walker = WalkDir::new(&self.root).follow_links(settings.follow_links);

        // Non-recursive = only the root directory.
        let depth_cap = if settings.recursive {
            settings.max_depth
        } else {
            Some(1)
        };
        if let Some(d) = depth_cap {
            walker = walker.max_depth(d);
        }

        let mut paths = Vec::new();
        let entries = walker
            .into_iter()
            .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()));
        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(e) if e.depth() == 0 => return Err(LibraryError::Walk(e)),
                Err(e) => {
                    warn!("skipping unreadable entry: {e}");
                    continue;
                }
            };
            let path = entry.into_path();
            if path.is_file() && is_audio_file(&path, settings) {
                paths.push(path);
            }
        }

        paths.sort();
        Ok(paths)
    }
}

fn read_row(id: u64, path: &Path) -> IndexRow {
    let mut title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string);
    let mut artist: Option<String> = None;
    let mut duration_ms = 0;

    match lofty::read_from_path(path) {
        Ok(tagged) => {
            duration_ms = tagged.properties().duration().as_millis() as u64;

            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(v) = tag.title() {
                    if !v.trim().is_empty() {
                        title = Some(v.trim().to_string());
                    }
                }
                if let Some(v) = tag.artist() {
                    if !v.trim().is_empty() {
                        artist = Some(v.trim().to_string());
                    }
                }
            }
        }
        Err(e) => debug!(path = %path.display(), "no readable tags: {e}"),
    }

    IndexRow {
        id,
        title,
        artist,
        duration_ms,
    }
}

impl MediaIndex for FsMediaIndex {
    fn query(&self) -> Result<Vec<IndexRow>, LibraryError> {
        if self.root.exists() && !self.root.is_dir() {
            return Err(LibraryError::Unreadable(self.root.clone()));
        }

        let paths = self.collect_paths()?;
        let rows = paths
            .iter()
            .enumerate()
            .map(|(id, path)| read_row(id as u64, path))
            .collect();

        *self.paths.borrow_mut() = paths;
        Ok(rows)
    }

    fn locator(&self, id: u64) -> Option<SourceLocator> {
        let paths = self.paths.borrow();
        let path = paths.get(usize::try_from(id).ok()?)?;
        Some(SourceLocator::new(path.to_string_lossy().into_owned()))
    }
}
