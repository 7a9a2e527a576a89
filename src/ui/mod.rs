//! User-facing progress reporting

pub mod progress;

pub use progress::ProgressReporter;
