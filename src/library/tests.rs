use super::*;
use crate::config::LibrarySettings;
use crate::error::LibraryError;

fn row(id: u64, title: Option<&str>, artist: Option<&str>, duration_ms: u64) -> IndexRow {
    IndexRow {
        id,
        title: title.map(str::to_string),
        artist: artist.map(str::to_string),
        duration_ms,
    }
}

struct FailingIndex;

impl MediaIndex for FailingIndex {
    fn query(&self) -> Result<Vec<IndexRow>, LibraryError> {
        Err(LibraryError::Unreadable("/denied".into()))
    }

    fn locator(&self, _id: u64) -> Option<SourceLocator> {
        None
    }
}

#[test]
fn load_keeps_index_order_and_builds_locators() {
    let index = StaticIndex {
        base: "content://media/audio".into(),
        rows: vec![
            row(42, Some("Zeta"), Some("Band"), 1000),
            row(7, Some("Alpha"), Some("Solo"), 2000),
        ],
    };

    let catalog = Catalog::load(&index, &LibrarySettings::default());

    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.titles(), vec!["Zeta", "Alpha"]);
    let first = catalog.get(0).unwrap();
    assert_eq!(first.source.as_str(), "content://media/audio/42");
    assert_eq!(first.artist, "Band");
    assert_eq!(first.duration_ms, 1000);
    assert!(catalog.get(2).is_none());
}

#[test]
fn missing_artist_uses_placeholder() {
    let index = StaticIndex {
        base: "mem".into(),
        rows: vec![row(1, Some("Song"), None, 0), row(2, Some("Other"), Some("  "), 0)],
    };
    let settings = LibrarySettings {
        unknown_artist: "Artista desconocido".into(),
        ..LibrarySettings::default()
    };

    let catalog = Catalog::load(&index, &settings);

    assert!(catalog.iter().all(|t| t.artist == "Artista desconocido"));
}

#[test]
fn missing_title_uses_placeholder() {
    let index = StaticIndex {
        base: "mem".into(),
        rows: vec![row(1, None, Some("A"), 0)],
    };

    let catalog = Catalog::load(&index, &LibrarySettings::default());

    assert_eq!(catalog.get(0).unwrap().title, "Unknown title");
}

#[test]
fn empty_index_gives_empty_catalog() {
    let index = StaticIndex {
        base: "mem".into(),
        rows: Vec::new(),
    };
    let catalog = Catalog::load(&index, &LibrarySettings::default());
    assert!(catalog.is_empty());
}

#[test]
fn index_failure_is_indistinguishable_from_empty() {
    let catalog = Catalog::load(&FailingIndex, &LibrarySettings::default());
    assert!(catalog.is_empty());
    assert_eq!(catalog.len(), 0);
}

#[test]
fn missing_library_root_yields_empty_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let index = FsMediaIndex::new(dir.path().join("missing"), LibrarySettings::default());
    let catalog = Catalog::load(&index, &LibrarySettings::default());
    assert!(catalog.is_empty());
}
