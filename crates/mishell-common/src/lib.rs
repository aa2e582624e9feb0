//! Session-scoped data model, configuration, and shared utilities for
//! `mishell`.

pub mod config;
pub mod error;
pub mod history;
pub mod session;
pub mod util;

/// Build-time version string, derived from `git describe` when available
/// (see `build.rs`), falling back to the crate version.
pub const VERSION: &str = env!("MISHELL_VERSION");
