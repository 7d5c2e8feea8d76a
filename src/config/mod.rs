//! Configuration loading and schema for statenv.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//!
//! # Example
//!
//! ```
//! use statenv::config::load_config;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::create_dir_all(temp.path().join(".statenv")).unwrap();
//! fs::write(temp.path().join(".statenv/config.yml"), "install_timeout_secs: 120").unwrap();
//!
//! let config = load_config(temp.path(), None).unwrap();
//! assert_eq!(config.install_timeout_secs, 120);
//! ```

pub mod loader;
pub mod schema;

pub use loader::{
    default_config_path, load_config, load_config_file, parse_config, resolve_python,
    CONFIG_DIR, CONFIG_FILE, PYTHON_ENV_VAR,
};
pub use schema::{CriticalPackage, SetupConfig, ValidationSettings};
