use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::LibrarySettings;

/// Pick the library root: command line, then config, then the working
/// directory.
pub fn resolve_library_root(arg: Option<String>, settings: &LibrarySettings) -> PathBuf {
    arg.map(PathBuf::from)
        .or_else(|| settings.root.clone())
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("Music"))
}

/// Probe read access to the library in the background.
///
/// Nothing waits on the outcome; a denied or missing root simply yields an
/// empty catalog and the result is logged.
pub fn request_library_access(root: &Path) {
    let root = root.to_path_buf();
    let spawned = std::thread::Builder::new()
        .name("library-access".into())
        .spawn(move || match std::fs::read_dir(&root) {
            Ok(_) => info!(root = %root.display(), "library readable"),
            Err(e) => warn!(root = %root.display(), "library not readable: {e}"),
        });
    if let Err(e) = spawned {
        warn!("failed to spawn library access probe: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_root_wins_over_config() {
        let settings = LibrarySettings {
            root: Some(PathBuf::from("/from/config")),
            ..LibrarySettings::default()
        };
        assert_eq!(
            resolve_library_root(Some("/from/args".into()), &settings),
            PathBuf::from("/from/args")
        );
        assert_eq!(
            resolve_library_root(None, &settings),
            PathBuf::from("/from/config")
        );
    }

    #[test]
    fn falls_back_to_working_directory() {
        let settings = LibrarySettings::default();
        let expected = std::env::current_dir().unwrap();
        assert_eq!(resolve_library_root(None, &settings), expected);
    }
}
