//! Executor module - runs a sync plan against the filesystem

pub mod copy;
pub mod keys;

use crate::plan::SyncPlan;
use crate::types::{ModAction, SyncSession};
use crate::Config;

pub use copy::{copy_dir_recursive, copy_file_atomic, CopyStats};
pub use keys::propagate_keys;

/// Events emitted while executing a plan.
#[derive(Debug)]
pub enum SyncEvent {
    /// Processing of one mod started.
    ModStart {
        index: usize,
        total: usize,
        action: &'static str,
        name: String,
    },
    /// One file (mod file or key file) was copied.
    FileCopied { copied: u64, total: u64 },
    /// A mod hit one or more errors but execution continued.
    ModError { name: String, message: String },
    /// Processing of one mod finished.
    ModComplete {
        action: &'static str,
        name: String,
        files: u64,
    },
    /// Plan execution completed (with or without errors).
    Complete { session: SyncSession },
}

/// Optional callback used to receive execution events.
pub type SyncCallback = dyn Fn(&SyncEvent) + Send + Sync;

/// Execute a sync plan
///
/// Actions run sequentially in plan order. Install and Update copy the
/// whole mod tree (overwriting); key propagation then runs for every
/// non-excluded mod regardless of the copy decision. Per-mod failures are
/// reported and counted, and execution continues with the next mod.
pub fn execute_plan(
    plan: &SyncPlan,
    config: &Config,
    on_event: Option<&SyncCallback>,
) -> SyncSession {
    let mut session = SyncSession::new(plan.stats.total_files);
    let total_mods = plan.actions.len();

    for (idx, action) in plan.actions.iter().enumerate() {
        emit_event(
            on_event,
            SyncEvent::ModStart {
                index: idx + 1,
                total: total_mods,
                action: action.action_name(),
                name: action.mod_name().to_string(),
            },
        );

        let entry = match action {
            ModAction::Exclude(_) => {
                // No copy, no key propagation
                session.mods_excluded += 1;
                continue;
            }
            ModAction::Install(entry) | ModAction::Update(entry) | ModAction::UpToDate(entry) => {
                entry
            }
        };

        let mut files_this_mod = 0u64;
        let mut failures_this_mod = 0u64;

        if action.is_copy() {
            let dest = entry.dest_path(&config.dest_root);
            let stats = {
                let session = &mut session;
                copy::copy_dir_recursive(&entry.source_path, &dest, &mut || {
                    session.record_copied_file();
                    emit_event(
                        on_event,
                        SyncEvent::FileCopied {
                            copied: session.copied_files,
                            total: session.total_files,
                        },
                    );
                })
            };
            files_this_mod += stats.files_copied;
            failures_this_mod += stats.failed_files;

            // Stamp the destination directory with the source mtime so the
            // next run sees this mod as current. A partial copy keeps its
            // old mtime and stays eligible for re-copy.
            if stats.failed_files == 0 {
                if let Err(e) = filetime::set_file_mtime(
                    &dest,
                    filetime::FileTime::from_system_time(entry.mtime),
                ) {
                    eprintln!(
                        "Warning: Cannot update timestamp of {}: {}",
                        dest.display(),
                        e
                    );
                }
            }

            // The mod is considered updated once a copy was attempted: the
            // destination has changed on disk even if some files failed.
            match action {
                ModAction::Install(_) => session.mods_installed += 1,
                ModAction::Update(_) => session.mods_updated += 1,
                _ => unreachable!("is_copy() covers Install and Update only"),
            }
        } else {
            session.mods_up_to_date += 1;
        }

        // Key propagation runs whether or not the mod itself was copied
        let key_result = {
            let session = &mut session;
            keys::propagate_keys(
                &entry.keys_dir(),
                &config.key_dest_root,
                &config.key_extension,
                &mut || {
                    session.record_copied_file();
                    emit_event(
                        on_event,
                        SyncEvent::FileCopied {
                            copied: session.copied_files,
                            total: session.total_files,
                        },
                    );
                },
            )
        };
        match key_result {
            Ok(copied) => {
                session.key_files_copied += copied;
                files_this_mod += copied;
            }
            Err(e) => {
                eprintln!("Warning: Key propagation failed for {}: {}", entry.name, e);
                failures_this_mod += 1;
            }
        }

        if failures_this_mod > 0 {
            session.failed_mods += 1;
            emit_event(
                on_event,
                SyncEvent::ModError {
                    name: entry.name.clone(),
                    message: format!("{} operation(s) failed for this mod", failures_this_mod),
                },
            );
        }

        emit_event(
            on_event,
            SyncEvent::ModComplete {
                action: action.action_name(),
                name: entry.name.clone(),
                files: files_this_mod,
            },
        );
    }

    emit_event(
        on_event,
        SyncEvent::Complete {
            session: session.clone(),
        },
    );

    session
}

fn emit_event(on_event: Option<&SyncCallback>, event: SyncEvent) {
    if let Some(callback) = on_event {
        callback(&event);
    }
}
