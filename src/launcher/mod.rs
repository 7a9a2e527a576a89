//! Server launcher
//!
//! Thin collaborator around the synchronizer: lists the mods installed at
//! the destination, assembles the `-mod=` parameter, and spawns the server
//! executable. Invoked only when a sync run made no updates.

use crate::types::SyncError;
use crate::Config;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// Directories carrying this marker are recognized as installed mods
pub const MOD_MARKER: char = '@';

/// List installed mod names at the destination root
///
/// Direct subdirectories only, `@`-prefixed names only, sorted. There is no
/// exclusion-marker filtering here: whatever sits installed on the server
/// gets loaded.
pub fn installed_mods(dest_root: &Path) -> Result<Vec<String>, SyncError> {
    let mut mods = Vec::new();
    for entry in fs::read_dir(dest_root)? {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                eprintln!(
                    "Warning: Error listing {}: {}. Entry skipped.",
                    dest_root.display(),
                    e
                );
                continue;
            }
        };
        if !entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(MOD_MARKER) {
            mods.push(name);
        }
    }
    mods.sort();
    Ok(mods)
}

/// Build the `-mod=` parameter from a list of mod names
///
/// Names are joined with semicolons; spaces are replaced with underscores
/// so the parameter survives shell-style argument handling.
pub fn mod_parameter(mods: &[String]) -> String {
    let cleaned: Vec<String> = mods.iter().map(|m| m.replace(' ', "_")).collect();
    format!("-mod={}", cleaned.join(";"))
}

/// A fully assembled server launch command
#[derive(Debug, Clone)]
pub struct ServerCommand {
    executable: PathBuf,
    args: Vec<String>,
}

impl ServerCommand {
    /// Assemble the launch command from configuration and installed mods
    pub fn build(config: &Config, mods: &[String]) -> Result<Self, SyncError> {
        let executable = config
            .server_executable
            .clone()
            .ok_or_else(|| SyncError::Launch("no server executable configured".to_string()))?;

        let args = vec![
            format!("-config={}", config.server_config),
            format!("-port={}", config.port),
            mod_parameter(mods),
        ];

        Ok(Self { executable, args })
    }

    /// Human-readable command line for status output
    pub fn command_line(&self) -> String {
        let mut parts = vec![self.executable.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }

    /// Spawn the server process and block until it exits
    pub fn run(&self) -> Result<ExitStatus, SyncError> {
        Command::new(&self.executable)
            .args(&self.args)
            .status()
            .map_err(|e| {
                SyncError::Launch(format!(
                    "failed to start {}: {}",
                    self.executable.display(),
                    e
                ))
            })
    }
}
