use std::fmt;

/// Opaque handle to playable media, as handed to a decoder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocator(String);

impl SourceLocator {
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One playable track in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub source: SourceLocator,
    pub title: String,
    pub artist: String,
    pub duration_ms: u64,
}

/// A row returned by a media index query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRow {
    pub id: u64,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub duration_ms: u64,
}
