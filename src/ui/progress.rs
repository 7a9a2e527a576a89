//! Progress reporting

use crate::types::SyncSession;
use indicatif::{ProgressBar, ProgressStyle};

/// Progress reporter for a sync run
pub struct ProgressReporter {
    count_bar: ProgressBar,
    copy_bar: ProgressBar,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new() -> Self {
        let count_bar = ProgressBar::new_spinner();
        count_bar.enable_steady_tick(std::time::Duration::from_millis(120));
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            count_bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }

        let copy_bar = ProgressBar::new(0);
        if let Ok(style) =
            ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} files ({percent}%) | {msg}")
        {
            copy_bar.set_style(style.progress_chars("=>-"));
        }

        Self {
            count_bar,
            copy_bar,
        }
    }

    /// Mark start of the file-count pre-pass.
    pub fn start_count(&self) {
        self.count_bar.set_message("Counting mod files...");
    }

    /// Update the pre-pass running total.
    pub fn update_count(&self, files: u64) {
        self.count_bar
            .set_message(format!("Counting mod files... {} files", files));
    }

    /// Mark completion of the pre-pass.
    pub fn finish_count(&self, files: u64) {
        self.count_bar
            .finish_with_message(format!("Total files to copy: {}", files));
    }

    /// Initialize copy phase progress.
    pub fn start_copy(&self, total_files: u64) {
        self.copy_bar.set_length(total_files);
        self.copy_bar.set_position(0);
        self.copy_bar.set_message("Starting copy...".to_string());
    }

    /// Show which mod is currently being processed.
    pub fn set_current_mod(&self, action: &str, name: &str) {
        self.copy_bar.set_message(format!("{} {}", action, name));
    }

    /// Advance cumulative copied-file progress.
    pub fn file_copied(&self, copied: u64) {
        self.copy_bar.set_position(copied);
    }

    /// Surface a per-mod error above the bar.
    pub fn mod_error(&self, name: &str, message: &str) {
        self.copy_bar.println(format!("ERROR {}: {}", name, message));
    }

    /// Finalize the copy phase with the session outcome.
    pub fn finish_copy(&self, session: &SyncSession) {
        self.copy_bar.finish_with_message(format!(
            "Copy process complete: {} installed, {} updated, {} up to date, {} excluded | {} file(s), {} key(s) | {:.0}%",
            session.mods_installed,
            session.mods_updated,
            session.mods_up_to_date,
            session.mods_excluded,
            session.copied_files,
            session.key_files_copied,
            session.progress_percent()
        ));
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}
