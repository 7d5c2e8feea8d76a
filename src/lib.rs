//! statenv - Install and validate the Python side of a statistical analysis environment.
//!
//! statenv reads a pip requirements file, installs every package into the
//! target interpreter one at a time, confirms that the critical packages
//! import, and writes a plain-text log. `statenv check` validates an
//! existing environment and the project layout without installing.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading and defaults
//! - [`error`] - Error types and result aliases
//! - [`install`] - Package manager seam and the sequential installer
//! - [`python`] - The target interpreter and version handling
//! - [`report`] - The installation log
//! - [`requirements`] - Requirements file parsing
//! - [`shell`] - Child process execution and interrupt handling
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//! - [`validate`] - Environment and project checks
//! - [`verify`] - Post-install import verification
//!
//! # Example
//!
//! ```
//! use statenv::requirements::parse_requirements;
//!
//! let specs = parse_requirements("numpy\n# plotting\nmatplotlib>=3.7  # charts\n");
//! let names: Vec<_> = specs.iter().map(|s| s.as_str()).collect();
//! assert_eq!(names, ["numpy", "matplotlib>=3.7"]);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod install;
pub mod python;
pub mod report;
pub mod requirements;
pub mod shell;
pub mod ui;
pub mod validate;
pub mod verify;

pub use error::{Result, SetupError};
