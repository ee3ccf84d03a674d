//! Shared plumbing for the host binaries: option loading, level files and log setup.

pub mod config;
pub mod level_file;
pub mod logging;
