//! Top-level run command: synchronize, then launch when nothing changed

use crate::executor::{execute_plan, SyncEvent};
use crate::launcher;
use crate::plan::{generate_sync_plan, SyncPlan};
use crate::scanner::discover_mods;
use crate::types::{ModAction, SyncError, SyncSession};
use crate::ui::ProgressReporter;
use crate::Config;
use console::style;
use std::sync::{Arc, Mutex};

/// Run one full sync-then-launch cycle
///
/// A missing source root is reported but not fatal to the process: the run
/// counts as "no updates" and, when launching is enabled, the server is
/// still started with whatever is already installed.
pub fn run(config: Config) -> Result<(), SyncError> {
    println!(
        "Checking for mod updates: {} -> {}",
        config.source_root.display(),
        config.dest_root.display()
    );

    let session = match synchronize(&config) {
        Ok(session) => Some(session),
        Err(e) if e.is_precondition() => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            None
        }
        Err(e) => return Err(e),
    };

    if config.dry_run {
        println!("Dry-run mode: no changes were made.");
        return Ok(());
    }

    if session.as_ref().is_some_and(|s| s.updated()) {
        println!(
            "{}",
            style("Mod update complete. Restart the server manually if needed.").green()
        );
        return Ok(());
    }

    if !config.launch {
        return Ok(());
    }

    println!("All mods are up to date. Starting server...");
    let mods = launcher::installed_mods(&config.dest_root)?;
    for name in &mods {
        println!("Found mod: {}", name);
    }

    let command = launcher::ServerCommand::build(&config, &mods)?;
    println!("Starting server with command: {}", command.command_line());
    let status = command.run()?;
    println!("Server exited with status: {}", status);
    Ok(())
}

/// Run the synchronizer and report progress on the console
fn synchronize(config: &Config) -> Result<SyncSession, SyncError> {
    let reporter = Arc::new(Mutex::new(ProgressReporter::new()));

    let mods = discover_mods(&config.source_root)?;
    println!("Found {} mod folder(s) in source", mods.len());

    if let Ok(progress) = reporter.lock() {
        progress.start_count();
    }
    let count_cb: crate::plan::CountCallback = {
        let reporter = Arc::clone(&reporter);
        Box::new(move |files: u64| {
            if let Ok(progress) = reporter.lock() {
                progress.update_count(files);
            }
        })
    };
    let plan = generate_sync_plan(mods, config, Some(&count_cb))?;
    if let Ok(progress) = reporter.lock() {
        progress.finish_count(plan.stats.total_files);
    }

    println!("{}", format_plan_preview(&plan));

    if config.dry_run {
        println!("{}", format_dry_run_actions(&plan));
        return Ok(SyncSession::new(plan.stats.total_files));
    }

    if plan.stats.total_files == 0 {
        println!("No files to copy.");
        return Ok(SyncSession::new(0));
    }

    if let Ok(progress) = reporter.lock() {
        progress.start_copy(plan.stats.total_files);
    }

    let error_records: Arc<Mutex<Vec<(String, String)>>> = Arc::new(Mutex::new(Vec::new()));
    let event_cb = {
        let reporter = Arc::clone(&reporter);
        let error_records = Arc::clone(&error_records);
        move |event: &SyncEvent| match event {
            SyncEvent::ModStart { action, name, .. } => {
                if let Ok(progress) = reporter.lock() {
                    progress.set_current_mod(action, name);
                }
            }
            SyncEvent::FileCopied { copied, .. } => {
                if let Ok(progress) = reporter.lock() {
                    progress.file_copied(*copied);
                }
            }
            SyncEvent::ModError { name, message } => {
                if let Ok(progress) = reporter.lock() {
                    progress.mod_error(name, message);
                }
                if let Ok(mut records) = error_records.lock() {
                    records.push((name.clone(), message.clone()));
                }
            }
            SyncEvent::ModComplete { .. } => {}
            SyncEvent::Complete { session } => {
                if let Ok(progress) = reporter.lock() {
                    progress.finish_copy(session);
                }
            }
        }
    };

    let session = execute_plan(&plan, config, Some(&event_cb));

    if let Ok(records) = error_records.lock() {
        if !records.is_empty() {
            println!("{}", format_error_summary(&records));
        }
    }

    Ok(session)
}

fn format_plan_preview(plan: &SyncPlan) -> String {
    format!(
        "Plan:\n  Install: {}  Update: {}  Up to date: {}  Excluded: {}\n  Total files to copy: {}",
        plan.stats.install_count,
        plan.stats.update_count,
        plan.stats.up_to_date_count,
        plan.stats.excluded_count,
        plan.stats.total_files
    )
}

fn format_dry_run_actions(plan: &SyncPlan) -> String {
    if plan.actions.is_empty() {
        return "Dry-run actions:\n  (no mods found)".to_string();
    }

    let mut lines = Vec::with_capacity(plan.actions.len() + 1);
    lines.push("Dry-run actions:".to_string());
    for action in &plan.actions {
        let label = match action {
            ModAction::Install(_) => "INSTALL",
            ModAction::Update(_) => "UPDATE ",
            ModAction::UpToDate(_) => "OK     ",
            ModAction::Exclude(_) => "EXCLUDE",
        };
        lines.push(format!("  {}   {}", label, action.mod_name()));
    }
    lines.join("\n")
}

fn format_error_summary(records: &[(String, String)]) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Error summary ({} mod(s) affected):", records.len()));
    for (name, message) in records.iter().take(5) {
        lines.push(format!("  - {}: {}", name, message));
    }
    if records.len() > 5 {
        lines.push(format!("  - ... {} more", records.len() - 5));
    }
    lines.join("\n")
}
