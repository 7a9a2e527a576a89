//! File and directory copy primitives

use crate::types::SyncError;
use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

/// Outcome of one recursive mod copy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    /// Files copied successfully
    pub files_copied: u64,
    /// Files that hit an error and were skipped
    pub failed_files: u64,
}

/// Copy a file atomically using the write-then-rename strategy
///
/// 1. Stream into a temporary `.part` file next to the destination
/// 2. Flush and sync to disk
/// 3. Preserve source permissions and mtime
/// 4. Atomic rename to the final destination (overwrites any existing file)
///
/// # Returns
/// * `Ok(u64)` - Number of bytes copied
/// * `Err(SyncError)` - IO error or other failure
pub fn copy_file_atomic(src: &Path, dest: &Path) -> Result<u64, SyncError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| map_io_error(parent, e))?;
    }

    // Appended suffix, not a replaced extension: `foo.part` in a mod tree
    // must not collide with the temporary for `foo.pbo`.
    let mut part_name = dest
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    part_name.push(".part");
    let part_path = dest.with_file_name(part_name);

    let mut src_file = File::open(src).map_err(|e| map_io_error(src, e))?;
    let mut part_file = File::create(&part_path).map_err(|e| map_io_error(&part_path, e))?;

    let mut buffer = vec![0u8; 128 * 1024];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = src_file.read(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        part_file.write_all(&buffer[0..bytes_read])?;
        total_bytes += bytes_read as u64;
    }

    part_file.sync_all()?;

    // Drop the file handle before rename (required on Windows)
    drop(part_file);

    let src_metadata = fs::metadata(src)?;
    fs::set_permissions(&part_path, src_metadata.permissions())?;

    let mtime = src_metadata.modified()?;
    filetime::set_file_mtime(&part_path, filetime::FileTime::from_system_time(mtime))?;

    // Atomic on POSIX systems (single syscall)
    fs::rename(&part_path, dest)?;

    Ok(total_bytes)
}

/// Copy a directory tree, file by file, continuing past per-file errors
///
/// Every file under `src_root` is copied to the same relative path under
/// `dest_root`, overwriting whatever is already there. Directories are
/// created as encountered so empty directories survive the copy. Failures
/// are reported and counted but never abort the rest of the tree.
///
/// `on_file` is invoked once per successfully copied file.
pub fn copy_dir_recursive(
    src_root: &Path,
    dest_root: &Path,
    on_file: &mut dyn FnMut(),
) -> CopyStats {
    let mut stats = CopyStats::default();

    let walker = ignore::WalkBuilder::new(src_root)
        .standard_filters(false)
        .build();

    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                eprintln!(
                    "Warning: Error walking {}: {}. Subtree skipped.",
                    src_root.display(),
                    e
                );
                stats.failed_files += 1;
                continue;
            }
        };

        let relative = match entry.path().strip_prefix(src_root) {
            Ok(p) => p,
            Err(_) => {
                eprintln!(
                    "Warning: Path {} escapes the mod root. File skipped.",
                    entry.path().display()
                );
                stats.failed_files += 1;
                continue;
            }
        };
        let dest = dest_root.join(relative);

        let file_type = match entry.file_type() {
            Some(ft) => ft,
            None => continue,
        };

        if file_type.is_dir() {
            if let Err(e) = fs::create_dir_all(&dest) {
                eprintln!(
                    "Warning: Cannot create directory {}: {}. Subtree will fail.",
                    dest.display(),
                    e
                );
                stats.failed_files += 1;
            }
            continue;
        }

        if !file_type.is_file() {
            // Special files (sockets, pipes, devices) have no place in a mod tree
            continue;
        }

        match copy_file_atomic(entry.path(), &dest) {
            Ok(_) => {
                stats.files_copied += 1;
                on_file();
            }
            Err(e) => {
                eprintln!(
                    "Warning: Failed to copy {} -> {}: {}",
                    entry.path().display(),
                    dest.display(),
                    e
                );
                stats.failed_files += 1;
            }
        }
    }

    stats
}

fn map_io_error(path: &Path, error: std::io::Error) -> SyncError {
    if matches!(error.kind(), ErrorKind::PermissionDenied) {
        SyncError::PermissionDenied {
            path: path.to_path_buf(),
        }
    } else {
        SyncError::Io(error)
    }
}
