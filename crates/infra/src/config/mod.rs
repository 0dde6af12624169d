//! Configuration loading
//!
//! Environment variables, JSON or TOML files, then built-in defaults.

pub mod loader;

pub use loader::{
    load, load_from_env, load_from_file, load_with_source, probe_config_paths, ConfigSource,
};
