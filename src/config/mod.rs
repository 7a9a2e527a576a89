//! Configuration management
//!
//! Paths are never baked into the sync logic: the CLI layer assembles an
//! explicit [`Config`] from flags and an optional TOML file, with flags
//! taking precedence.

use crate::types::SyncError;
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(
    name = "modsync",
    version,
    about = "Synchronize workshop mods to a server and launch it"
)]
pub struct Cli {
    /// Client-side workshop folder containing the mod directories
    #[arg(long, value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Server mods folder to synchronize into
    #[arg(long, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Shared server key directory (default: <dest>/keys)
    #[arg(long, value_name = "DIR")]
    pub keys: Option<PathBuf>,

    /// Server executable launched when no mod needed updating
    #[arg(long = "server-exe", value_name = "FILE")]
    pub server_executable: Option<PathBuf>,

    /// Config file name passed to the server as -config=
    #[arg(long, value_name = "NAME")]
    pub server_config: Option<String>,

    /// Port passed to the server as -port=
    #[arg(long)]
    pub port: Option<u16>,

    /// Key file extension recognized during key propagation
    #[arg(long, value_name = "EXT")]
    pub key_extension: Option<String>,

    /// Additional mod-name glob pattern to exclude (repeatable)
    #[arg(long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Show the sync plan without copying anything
    #[arg(long)]
    pub dry_run: bool,

    /// Synchronize only, never launch the server
    #[arg(long)]
    pub no_launch: bool,

    /// TOML file supplying any of the above values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Optional values loaded from a TOML config file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    source: Option<PathBuf>,
    dest: Option<PathBuf>,
    keys: Option<PathBuf>,
    server_executable: Option<PathBuf>,
    server_config: Option<String>,
    port: Option<u16>,
    key_extension: Option<String>,
    exclude: Option<Vec<String>>,
    launch: Option<bool>,
}

impl FileConfig {
    fn load(path: &PathBuf) -> Result<Self, SyncError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            SyncError::Config(format!("Cannot read config file {:?}: {}", path, e))
        })?;
        toml::from_str(&raw)
            .map_err(|e| SyncError::Config(format!("Invalid config file {:?}: {}", path, e)))
    }
}

/// Global configuration for modsync
#[derive(Debug, Clone)]
pub struct Config {
    /// Client/source mods root (workshop folder)
    pub source_root: PathBuf,

    /// Server/destination mods root
    pub dest_root: PathBuf,

    /// Shared server key directory
    pub key_dest_root: PathBuf,

    /// Server executable path (required only when launching)
    pub server_executable: Option<PathBuf>,

    /// Server config file name (-config=)
    pub server_config: String,

    /// Server port (-port=)
    pub port: u16,

    /// Key file extension, without leading dot
    pub key_extension: String,

    /// Additional mod-name glob patterns to exclude
    pub exclude: Vec<String>,

    /// Launch the server when the run made no updates
    pub launch: bool,

    /// Show plan, don't execute
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_root: PathBuf::new(),
            dest_root: PathBuf::new(),
            key_dest_root: PathBuf::new(),
            server_executable: None,
            server_config: "serverDZ.cfg".to_string(),
            port: 2302,
            key_extension: "bikey".to_string(),
            exclude: Vec::new(),
            launch: false,
            dry_run: false,
        }
    }
}

impl TryFrom<Cli> for Config {
    type Error = SyncError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        let defaults = Config::default();

        let source_root = cli.source.or(file.source).ok_or_else(|| {
            SyncError::Config("Source mods directory is required (--source)".to_string())
        })?;
        let dest_root = cli.dest.or(file.dest).ok_or_else(|| {
            SyncError::Config("Destination mods directory is required (--dest)".to_string())
        })?;
        let key_dest_root = cli
            .keys
            .or(file.keys)
            .unwrap_or_else(|| dest_root.join("keys"));

        let mut exclude = file.exclude.unwrap_or_default();
        exclude.extend(cli.exclude);

        let launch = if cli.no_launch {
            false
        } else {
            file.launch.unwrap_or(true)
        };

        let config = Config {
            source_root,
            dest_root,
            key_dest_root,
            server_executable: cli.server_executable.or(file.server_executable),
            server_config: cli
                .server_config
                .or(file.server_config)
                .unwrap_or(defaults.server_config),
            port: cli.port.or(file.port).unwrap_or(defaults.port),
            key_extension: normalize_extension(
                cli.key_extension
                    .or(file.key_extension)
                    .unwrap_or(defaults.key_extension),
            ),
            exclude,
            launch,
            dry_run: cli.dry_run,
        };

        config.validate()?;
        Ok(config)
    }
}

/// Key extensions are matched against `Path::extension`, which has no dot
fn normalize_extension(ext: String) -> String {
    ext.trim_start_matches('.').to_string()
}

impl Config {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), SyncError> {
        // Ensure source != destination
        if self.source_root == self.dest_root {
            return Err(SyncError::Config(
                "Source and destination cannot be the same".to_string(),
            ));
        }

        if self.key_extension.is_empty() {
            return Err(SyncError::Config(
                "Key extension cannot be empty".to_string(),
            ));
        }

        // Launching without an executable is a configuration mistake we can
        // catch up front instead of after a long copy run.
        if self.launch && !self.dry_run && self.server_executable.is_none() {
            return Err(SyncError::Config(
                "Server executable is required unless --no-launch is given (--server-exe)"
                    .to_string(),
            ));
        }

        Ok(())
    }
}
