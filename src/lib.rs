//! # modsync - Workshop-to-Server Mod Synchronizer
//!
//! Keeps a server's mods folder in step with a client-side workshop folder,
//! propagates mod signing keys into the shared key directory, and launches
//! the server with a generated `-mod=` parameter once everything is current.

// Module declarations
pub mod config;
pub mod scanner;
pub mod plan;
pub mod executor;
pub mod launcher;
pub mod ui;
pub mod commands;
pub mod types;

// Re-export commonly used types
pub use types::{ModAction, ModEntry, SyncError, SyncSession};
pub use config::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
