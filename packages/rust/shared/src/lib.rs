//! Shared types, error model, and configuration for Bookforge.
//!
//! This crate is the foundation depended on by all other Bookforge crates.
//! It provides:
//! - [`BookforgeError`]: the unified error type
//! - Domain types ([`ItemStatus`], [`OutcomeCounts`], [`RenamePair`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CONFIG_FILE_NAME, ChaptersConfig, PathsConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{BookforgeError, Result};
pub use types::{ItemStatus, OutcomeCounts, RenamePair};
