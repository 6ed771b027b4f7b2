use tracing::{debug, info, warn};

use crate::config::LibrarySettings;
use crate::error::LibraryError;

use super::model::{IndexRow, SourceLocator, Track};

/// A queryable index of playable audio.
///
/// Rows come back in the index's natural order; `locator` turns a row id
/// into something a decoder can open.
pub trait MediaIndex {
    fn query(&self) -> Result<Vec<IndexRow>, LibraryError>;
    fn locator(&self, id: u64) -> Option<SourceLocator>;
}

/// The ordered, immutable set of tracks discovered at startup.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    /// Query `index` once and build the catalog in its return order.
    ///
    /// Index failures are not distinguished from an empty library: both
    /// produce an empty catalog.
    pub fn load(index: &dyn MediaIndex, settings: &LibrarySettings) -> Self {
        let rows = match index.query() {
            Ok(rows) => rows,
            Err(e) => {
                warn!("media index query failed, catalog is empty: {e}");
                return Self::default();
            }
        };

        let mut tracks = Vec::with_capacity(rows.len());
        for row in rows {
            let Some(source) = index.locator(row.id) else {
                debug!(id = row.id, "index row has no locator, skipping");
                continue;
            };
            tracks.push(track_from_row(row, source, settings));
        }

        info!(count = tracks.len(), "catalog loaded");
        Self { tracks }
    }

    pub fn from_tracks(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    pub fn get(&self, i: usize) -> Option<&Track> {
        self.tracks.get(i)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    /// List labels, index-aligned with the catalog.
    pub fn titles(&self) -> Vec<&str> {
        self.tracks.iter().map(|t| t.title.as_str()).collect()
    }
}

fn track_from_row(row: IndexRow, source: SourceLocator, settings: &LibrarySettings) -> Track {
    let title = row
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| settings.unknown_title.clone());
    let artist = row
        .artist
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| settings.unknown_artist.clone());

    Track {
        source,
        title,
        artist,
        duration_ms: row.duration_ms,
    }
}

/// In-memory index used by tests.
#[cfg(test)]
pub struct StaticIndex {
    pub base: String,
    pub rows: Vec<IndexRow>,
}

#[cfg(test)]
impl MediaIndex for StaticIndex {
    fn query(&self) -> Result<Vec<IndexRow>, LibraryError> {
        Ok(self.rows.clone())
    }

    fn locator(&self, id: u64) -> Option<SourceLocator> {
        Some(SourceLocator::new(format!("{}/{}", self.base, id)))
    }
}
