//! ModAction - Per-mod decisions produced by the plan stage

use super::ModEntry;

/// Sync action decided for one source mod
#[derive(Debug, Clone)]
pub enum ModAction {
    /// Copy new mod (exists in source, missing at destination)
    Install(ModEntry),

    /// Re-copy existing mod (source directory is strictly newer)
    Update(ModEntry),

    /// Destination is current, nothing to copy
    UpToDate(ModEntry),

    /// Name carries the exclusion marker or matched an exclude pattern
    Exclude(String),
}

impl ModAction {
    /// Short action label used in events and console output
    pub fn action_name(&self) -> &'static str {
        match self {
            ModAction::Install(_) => "Install",
            ModAction::Update(_) => "Update",
            ModAction::UpToDate(_) => "UpToDate",
            ModAction::Exclude(_) => "Exclude",
        }
    }

    /// Mod name this action refers to
    pub fn mod_name(&self) -> &str {
        match self {
            ModAction::Install(entry) | ModAction::Update(entry) | ModAction::UpToDate(entry) => {
                &entry.name
            }
            ModAction::Exclude(name) => name,
        }
    }

    /// Whether this action copies the mod directory
    pub fn is_copy(&self) -> bool {
        matches!(self, ModAction::Install(_) | ModAction::Update(_))
    }

    /// Whether this mod is skipped entirely (no copy, no key propagation)
    pub fn is_excluded(&self) -> bool {
        matches!(self, ModAction::Exclude(_))
    }
}
