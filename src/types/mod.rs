//! Core type definitions for modsync

mod action;
mod entry;
mod error;
mod session;

pub use action::ModAction;
pub use entry::ModEntry;
pub use error::SyncError;
pub use session::SyncSession;
