//! SyncSession - Counters for one synchronization run

/// Progress and outcome statistics for a single sync run.
///
/// Ephemeral: nothing here survives past process exit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSession {
    /// Precomputed progress denominator: files under all non-excluded mods.
    pub total_files: u64,
    /// Files copied so far (mod files and key files).
    pub copied_files: u64,
    /// Key files propagated into the shared key directory.
    pub key_files_copied: u64,
    /// Mods copied fresh to the destination.
    pub mods_installed: usize,
    /// Mods re-copied because the source was newer.
    pub mods_updated: usize,
    /// Mods left untouched (destination current).
    pub mods_up_to_date: usize,
    /// Mods skipped via the exclusion marker or exclude patterns.
    pub mods_excluded: usize,
    /// Mods whose copy hit at least one error.
    pub failed_mods: usize,
}

impl SyncSession {
    /// Create a session with a known progress denominator
    pub fn new(total_files: u64) -> Self {
        Self {
            total_files,
            ..Default::default()
        }
    }

    /// Whether any mod was newly copied or updated this run.
    ///
    /// Key-only propagation intentionally does not count as an update.
    pub fn updated(&self) -> bool {
        self.mods_installed > 0 || self.mods_updated > 0
    }

    /// Record a copied file, clamped so progress never exceeds the total
    pub fn record_copied_file(&mut self) {
        if self.copied_files < self.total_files {
            self.copied_files += 1;
        }
    }

    /// Progress percentage of copied files against the precomputed total
    pub fn progress_percent(&self) -> f64 {
        if self.total_files == 0 {
            return 0.0;
        }
        (self.copied_files as f64 / self.total_files as f64) * 100.0
    }
}
