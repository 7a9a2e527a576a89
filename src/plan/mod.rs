//! Per-mod staleness decisions and plan generation

use crate::scanner;
use crate::types::{ModAction, ModEntry, SyncError};
use crate::Config;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::fs;
use std::path::Path;

/// Mods whose name starts with this marker are never synchronized
pub const EXCLUDE_MARKER: char = '!';

/// Callback for reporting pre-pass progress (total files counted so far)
pub type CountCallback = Box<dyn Fn(u64) + Send + Sync>;

/// Aggregate statistics for a sync plan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanStats {
    pub install_count: usize,
    pub update_count: usize,
    pub up_to_date_count: usize,
    pub excluded_count: usize,
    /// Progress denominator: files under all non-excluded mods
    pub total_files: u64,
}

/// Ordered per-mod actions plus aggregate statistics
#[derive(Debug, Clone, Default)]
pub struct SyncPlan {
    pub actions: Vec<ModAction>,
    pub stats: PlanStats,
}

impl SyncPlan {
    /// Whether any mod needs copying
    pub fn has_copy_work(&self) -> bool {
        self.stats.install_count > 0 || self.stats.update_count > 0
    }
}

/// Generate a sync plan for the discovered source mods
///
/// Runs the file-count pre-pass over every non-excluded mod (the progress
/// denominator) and decides one [`ModAction`] per mod:
///
/// 1. Exclusion marker or exclude-pattern match -> `Exclude` (not counted)
/// 2. Destination missing -> `Install`
/// 3. Source directory mtime strictly newer -> `Update`
/// 4. Otherwise -> `UpToDate`
///
/// The staleness comparison is directory-level by contract: the mod
/// folder's own mtime, not per-file metadata.
///
/// # Errors
/// Invalid exclude patterns return `SyncError::Config`.
pub fn generate_sync_plan(
    mods: Vec<ModEntry>,
    config: &Config,
    on_count: Option<&CountCallback>,
) -> Result<SyncPlan, SyncError> {
    let exclude_set = build_exclude_set(&config.exclude)?;
    let mut plan = SyncPlan::default();

    for mut entry in mods {
        if is_excluded(&entry.name, &exclude_set) {
            plan.stats.excluded_count += 1;
            plan.actions.push(ModAction::Exclude(entry.name));
            continue;
        }

        entry.file_count = scanner::count_files(&entry.source_path);
        plan.stats.total_files += entry.file_count;
        if let Some(callback) = on_count {
            callback(plan.stats.total_files);
        }

        let dest = entry.dest_path(&config.dest_root);
        let action = compare_mod(entry, &dest);
        match &action {
            ModAction::Install(_) => plan.stats.install_count += 1,
            ModAction::Update(_) => plan.stats.update_count += 1,
            ModAction::UpToDate(_) => plan.stats.up_to_date_count += 1,
            ModAction::Exclude(_) => unreachable!("exclusion decided before comparison"),
        }
        plan.actions.push(action);
    }

    Ok(plan)
}

/// Compare one source mod against its destination path
///
/// Missing destination means a fresh install. Otherwise the source wins only
/// when its directory mtime is strictly newer; equal timestamps are current.
pub fn compare_mod(entry: ModEntry, dest: &Path) -> ModAction {
    if !dest.exists() {
        return ModAction::Install(entry);
    }

    match fs::metadata(dest).and_then(|m| m.modified()) {
        Ok(dest_mtime) => {
            if entry.mtime > dest_mtime {
                ModAction::Update(entry)
            } else {
                ModAction::UpToDate(entry)
            }
        }
        Err(e) => {
            // Unreadable destination metadata: re-copy rather than guess
            eprintln!(
                "Warning: Cannot read modification time of {}: {}. Mod will be re-copied.",
                dest.display(),
                e
            );
            ModAction::Update(entry)
        }
    }
}

fn build_exclude_set(patterns: &[String]) -> Result<GlobSet, SyncError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| {
            SyncError::Config(format!("Invalid exclude pattern '{}': {}", pattern, e))
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| SyncError::Config(format!("Failed to build exclude patterns: {}", e)))
}

fn is_excluded(name: &str, exclude_set: &GlobSet) -> bool {
    name.starts_with(EXCLUDE_MARKER) || exclude_set.is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::FileTime;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};
    use tempfile::TempDir;

    fn entry_at(name: &str, path: PathBuf, mtime: SystemTime) -> ModEntry {
        ModEntry::new(name.to_string(), path, mtime, 0)
    }

    fn config_for(source: &Path, dest: &Path) -> Config {
        Config {
            source_root: source.to_path_buf(),
            dest_root: dest.to_path_buf(),
            key_dest_root: dest.join("keys"),
            ..Config::default()
        }
    }

    fn set_dir_mtime(path: &Path, secs: i64) {
        filetime::set_file_mtime(path, FileTime::from_unix_time(secs, 0))
            .expect("set directory mtime");
    }

    #[test]
    fn test_compare_missing_dest_is_install() {
        let temp = TempDir::new().expect("create temp dir");
        let entry = entry_at("@A", temp.path().join("@A"), UNIX_EPOCH);

        let action = compare_mod(entry, &temp.path().join("missing/@A"));
        assert!(matches!(action, ModAction::Install(_)));
    }

    #[test]
    fn test_compare_newer_source_is_update() {
        let temp = TempDir::new().expect("create temp dir");
        let dest = temp.path().join("@A");
        fs::create_dir(&dest).expect("create dest dir");
        set_dir_mtime(&dest, 1_000);

        let newer = UNIX_EPOCH + Duration::from_secs(2_000);
        let action = compare_mod(entry_at("@A", temp.path().join("src/@A"), newer), &dest);
        assert!(matches!(action, ModAction::Update(_)));
    }

    #[test]
    fn test_compare_equal_or_older_source_is_up_to_date() {
        let temp = TempDir::new().expect("create temp dir");
        let dest = temp.path().join("@A");
        fs::create_dir(&dest).expect("create dest dir");
        set_dir_mtime(&dest, 2_000);

        let equal = UNIX_EPOCH + Duration::from_secs(2_000);
        let action = compare_mod(entry_at("@A", temp.path().join("src/@A"), equal), &dest);
        assert!(matches!(action, ModAction::UpToDate(_)), "equal mtimes are current");

        let older = UNIX_EPOCH + Duration::from_secs(1_000);
        let action = compare_mod(entry_at("@A", temp.path().join("src/@A"), older), &dest);
        assert!(matches!(action, ModAction::UpToDate(_)));
    }

    #[test]
    fn test_plan_excludes_marker_and_skips_counting() {
        let src = TempDir::new().expect("create src dir");
        let dst = TempDir::new().expect("create dst dir");
        fs::create_dir(src.path().join("!DO_NOT_COPY")).expect("create excluded mod");
        fs::write(src.path().join("!DO_NOT_COPY/big.bin"), b"data").expect("write excluded file");
        fs::create_dir(src.path().join("@Keep")).expect("create mod");
        fs::write(src.path().join("@Keep/a.pbo"), b"a").expect("write mod file");

        let mods = crate::scanner::discover_mods(src.path()).expect("discover");
        let config = config_for(src.path(), dst.path());
        let plan = generate_sync_plan(mods, &config, None).expect("plan");

        assert_eq!(plan.stats.excluded_count, 1);
        assert_eq!(plan.stats.install_count, 1);
        assert!(plan.has_copy_work());
        // Excluded mod's file must not inflate the denominator
        assert_eq!(plan.stats.total_files, 1);
        assert!(plan
            .actions
            .iter()
            .any(|a| a.is_excluded() && a.mod_name() == "!DO_NOT_COPY"));
    }

    #[test]
    fn test_plan_exclude_globs_behave_like_marker() {
        let src = TempDir::new().expect("create src dir");
        let dst = TempDir::new().expect("create dst dir");
        fs::create_dir(src.path().join("@TestMod")).expect("create mod");
        fs::create_dir(src.path().join("@Real")).expect("create mod");

        let mods = crate::scanner::discover_mods(src.path()).expect("discover");
        let mut config = config_for(src.path(), dst.path());
        config.exclude = vec!["@Test*".to_string()];
        let plan = generate_sync_plan(mods, &config, None).expect("plan");

        assert_eq!(plan.stats.excluded_count, 1);
        assert_eq!(plan.stats.install_count, 1);
    }

    #[test]
    fn test_plan_invalid_exclude_pattern_is_config_error() {
        let src = TempDir::new().expect("create src dir");
        let dst = TempDir::new().expect("create dst dir");

        let mut config = config_for(src.path(), dst.path());
        config.exclude = vec!["@[unclosed".to_string()];
        let err = generate_sync_plan(Vec::new(), &config, None).unwrap_err();
        assert!(err.to_string().contains("Invalid exclude pattern"));
    }

    #[test]
    fn test_plan_count_callback_reports_running_total() {
        use std::sync::atomic::{AtomicU64, Ordering};
        use std::sync::Arc;

        let src = TempDir::new().expect("create src dir");
        let dst = TempDir::new().expect("create dst dir");
        fs::create_dir(src.path().join("@A")).expect("create @A");
        fs::write(src.path().join("@A/one.pbo"), b"1").expect("write file");
        fs::create_dir(src.path().join("@B")).expect("create @B");
        fs::write(src.path().join("@B/two.pbo"), b"2").expect("write file");

        let last_seen = Arc::new(AtomicU64::new(0));
        let last_seen_ref = Arc::clone(&last_seen);
        let callback: CountCallback = Box::new(move |total| {
            last_seen_ref.store(total, Ordering::SeqCst);
        });

        let mods = crate::scanner::discover_mods(src.path()).expect("discover");
        let config = config_for(src.path(), dst.path());
        let plan = generate_sync_plan(mods, &config, Some(&callback)).expect("plan");

        assert_eq!(plan.stats.total_files, 2);
        assert_eq!(last_seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_plan_preserves_discovery_order() {
        let src = TempDir::new().expect("create src dir");
        let dst = TempDir::new().expect("create dst dir");
        for name in ["@C", "@A", "@B"] {
            fs::create_dir(src.path().join(name)).expect("create mod");
        }

        let mods = crate::scanner::discover_mods(src.path()).expect("discover");
        let config = config_for(src.path(), dst.path());
        let plan = generate_sync_plan(mods, &config, None).expect("plan");

        let names: Vec<&str> = plan.actions.iter().map(|a| a.mod_name()).collect();
        assert_eq!(names, vec!["@A", "@B", "@C"]);
    }
}
