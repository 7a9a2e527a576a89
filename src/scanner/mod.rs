//! Source enumeration and the file-count pre-pass

use crate::types::{ModEntry, SyncError};
use std::fs;
use std::path::Path;

/// Discover mod directories directly under the source root
///
/// Only direct subdirectories are considered; loose files in the source root
/// are ignored. Entries are returned sorted by name so runs are
/// deterministic. File counts are left at zero here - the pre-pass counts
/// only non-excluded mods, after the plan stage has decided which those are.
///
/// # Errors
/// * A missing source root yields `SyncError::SourceMissing`
/// * An existing root that cannot be read yields `PermissionDenied` or `Io`
/// * Individual entries that cannot be inspected are reported and skipped
pub fn discover_mods(source_root: &Path) -> Result<Vec<ModEntry>, SyncError> {
    if !source_root.is_dir() {
        return Err(SyncError::SourceMissing {
            path: source_root.to_path_buf(),
        });
    }

    let reader = fs::read_dir(source_root).map_err(|e| map_root_error(source_root, e))?;

    let mut mods = Vec::new();
    for entry in reader {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                eprintln!(
                    "Warning: Error while listing {}: {}. Entry skipped.",
                    source_root.display(),
                    e
                );
                continue;
            }
        };

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                eprintln!(
                    "Warning: Failed to read metadata for {}: {}. Entry skipped.",
                    entry.path().display(),
                    e
                );
                continue;
            }
        };
        if !metadata.is_dir() {
            continue;
        }

        let mtime = match metadata.modified() {
            Ok(t) => t,
            Err(e) => {
                eprintln!(
                    "Warning: No modification time for {}: {}. Entry skipped.",
                    entry.path().display(),
                    e
                );
                continue;
            }
        };

        let name = entry.file_name().to_string_lossy().into_owned();
        mods.push(ModEntry::new(name, entry.path(), mtime, 0));
    }

    mods.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(mods)
}

/// Classify a failure to open the source root
///
/// Only a vanished root is the "missing workshop folder" precondition; an
/// existing root that cannot be read is a real error and must surface as one.
fn map_root_error(source_root: &Path, error: std::io::Error) -> SyncError {
    match error.kind() {
        std::io::ErrorKind::NotFound => SyncError::SourceMissing {
            path: source_root.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => SyncError::PermissionDenied {
            path: source_root.to_path_buf(),
        },
        _ => SyncError::Io(error),
    }
}

/// Count regular files under a directory, recursively
///
/// Used for the progress denominator and for per-mod accounting. Walk errors
/// (permission denied, path vanished mid-walk) are reported and the affected
/// subtree is skipped; the count continues with whatever remains reachable.
pub fn count_files(dir: &Path) -> u64 {
    let walker = ignore::WalkBuilder::new(dir)
        .standard_filters(false) // mod trees are not git trees
        .build();

    let mut count = 0u64;
    for result in walker {
        match result {
            Ok(entry) => {
                if entry.file_type().is_some_and(|ft| ft.is_file()) {
                    count += 1;
                }
            }
            Err(e) => {
                eprintln!(
                    "Warning: Error counting files under {}: {}. Subtree skipped.",
                    dir.display(),
                    e
                );
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discover_missing_root_is_precondition_error() {
        let temp = TempDir::new().expect("create temp dir");
        let missing = temp.path().join("does-not-exist");

        let err = discover_mods(&missing).unwrap_err();
        assert!(err.is_precondition());
    }

    #[test]
    fn test_root_error_mapping_by_kind() {
        use std::io::{Error, ErrorKind};

        let root = Path::new("/workshop");
        let err = map_root_error(root, Error::from(ErrorKind::NotFound));
        assert!(err.is_precondition());

        let err = map_root_error(root, Error::from(ErrorKind::PermissionDenied));
        assert!(err.is_permission_error());
        assert!(!err.is_precondition(), "an unreadable root is not a missing root");

        let err = map_root_error(root, Error::from(ErrorKind::TimedOut));
        assert!(matches!(err, SyncError::Io(_)));
    }

    #[test]
    fn test_discover_empty_root() {
        let temp = TempDir::new().expect("create temp dir");
        let mods = discover_mods(temp.path()).expect("discover should succeed");
        assert!(mods.is_empty());
    }

    #[test]
    fn test_discover_skips_loose_files_and_sorts() {
        let temp = TempDir::new().expect("create temp dir");
        fs::create_dir(temp.path().join("@Zulu")).expect("create @Zulu");
        fs::create_dir(temp.path().join("@Alpha")).expect("create @Alpha");
        fs::create_dir(temp.path().join("!Readme")).expect("create !Readme");
        fs::write(temp.path().join("@notadir.txt"), b"x").expect("write loose file");

        let mods = discover_mods(temp.path()).expect("discover should succeed");
        let names: Vec<&str> = mods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["!Readme", "@Alpha", "@Zulu"]);
    }

    #[test]
    fn test_discovered_entry_has_mtime_and_zero_count() {
        let temp = TempDir::new().expect("create temp dir");
        fs::create_dir(temp.path().join("@Mod")).expect("create mod dir");

        let mods = discover_mods(temp.path()).expect("discover should succeed");
        assert_eq!(mods.len(), 1);
        assert_eq!(mods[0].file_count, 0);
        assert_eq!(mods[0].source_path, temp.path().join("@Mod"));
    }

    #[test]
    fn test_count_files_recursive() {
        let temp = TempDir::new().expect("create temp dir");
        fs::create_dir_all(temp.path().join("addons/sub")).expect("create nested dirs");
        fs::write(temp.path().join("meta.cpp"), b"m").expect("write meta");
        fs::write(temp.path().join("addons/core.pbo"), b"p").expect("write pbo");
        fs::write(temp.path().join("addons/sub/data.bin"), b"d").expect("write data");

        assert_eq!(count_files(temp.path()), 3);
    }

    #[test]
    fn test_count_files_empty_dir_is_zero() {
        let temp = TempDir::new().expect("create temp dir");
        assert_eq!(count_files(temp.path()), 0);
    }

    #[test]
    fn test_count_files_missing_dir_is_zero() {
        let temp = TempDir::new().expect("create temp dir");
        assert_eq!(count_files(&temp.path().join("gone")), 0);
    }
}
