//! User-invokable commands

pub mod run;
