//! Key propagation
//!
//! Every non-excluded mod may carry a nested `keys` directory with signing
//! keys the server must trust. Those files are flattened into one shared
//! key directory, overwriting same-named files, regardless of whether the
//! owning mod itself needed copying.

use super::copy::copy_file_atomic;
use crate::types::SyncError;
use std::fs;
use std::path::Path;

/// Copy recognized key files from a mod's `keys` directory into `key_dest`
///
/// A missing `keys` directory is normal and yields zero copies. The
/// extension comparison is ASCII case-insensitive (`.bikey` and `.BIKEY`
/// both match). Per-file failures are reported and skipped.
///
/// `on_key` is invoked once per successfully copied key file.
pub fn propagate_keys(
    keys_dir: &Path,
    key_dest: &Path,
    extension: &str,
    on_key: &mut dyn FnMut(),
) -> Result<u64, SyncError> {
    if !keys_dir.is_dir() {
        return Ok(0);
    }

    fs::create_dir_all(key_dest)?;

    let mut copied = 0u64;
    for entry in fs::read_dir(keys_dir)? {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                eprintln!(
                    "Warning: Error listing {}: {}. Entry skipped.",
                    keys_dir.display(),
                    e
                );
                continue;
            }
        };

        let path = entry.path();
        if !path.is_file() || !has_extension(&path, extension) {
            continue;
        }

        let dest = key_dest.join(entry.file_name());
        match copy_file_atomic(&path, &dest) {
            Ok(_) => {
                copied += 1;
                on_key();
            }
            Err(e) => {
                eprintln!(
                    "Warning: Failed to copy key {} -> {}: {}",
                    path.display(),
                    dest.display(),
                    e
                );
            }
        }
    }

    Ok(copied)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}
