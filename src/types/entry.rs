//! ModEntry - Represents a single mod directory discovered in the source root

use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A mod directory found directly under the source (workshop) root
#[derive(Debug, Clone, PartialEq)]
pub struct ModEntry {
    /// Directory base name, e.g. `@CF`
    pub name: String,

    /// Absolute path of the mod directory under the source root
    pub source_path: PathBuf,

    /// Last modification time of the mod directory itself (not its contents)
    pub mtime: SystemTime,

    /// Number of regular files under the mod directory, recursively
    pub file_count: u64,
}

impl ModEntry {
    /// Create a new ModEntry with the given parameters
    pub fn new(name: String, source_path: PathBuf, mtime: SystemTime, file_count: u64) -> Self {
        Self {
            name,
            source_path,
            mtime,
            file_count,
        }
    }

    /// Destination path for this mod under the server mods root
    pub fn dest_path(&self, dest_root: &Path) -> PathBuf {
        dest_root.join(&self.name)
    }

    /// The nested `keys` directory of this mod (may not exist)
    pub fn keys_dir(&self) -> PathBuf {
        self.source_path.join("keys")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    fn entry(name: &str) -> ModEntry {
        ModEntry::new(
            name.to_string(),
            PathBuf::from("/workshop").join(name),
            UNIX_EPOCH + Duration::from_secs(1000),
            7,
        )
    }

    #[test]
    fn test_new_mod_entry() {
        let e = entry("@CF");

        assert_eq!(e.name, "@CF");
        assert_eq!(e.source_path, PathBuf::from("/workshop/@CF"));
        assert_eq!(e.mtime, UNIX_EPOCH + Duration::from_secs(1000));
        assert_eq!(e.file_count, 7);
    }

    #[test]
    fn test_dest_path_joins_base_name() {
        let e = entry("@Community Framework");
        assert_eq!(
            e.dest_path(Path::new("/server/mods")),
            PathBuf::from("/server/mods/@Community Framework")
        );
    }

    #[test]
    fn test_keys_dir_is_nested_under_source() {
        let e = entry("@CF");
        assert_eq!(e.keys_dir(), PathBuf::from("/workshop/@CF/keys"));
    }
}
