//! Configuration file discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::SetupConfig;
use crate::error::{Result, SetupError};
use crate::shell::default_python;

/// Directory holding statenv's project config.
pub const CONFIG_DIR: &str = ".statenv";

/// Config file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.yml";

/// Environment variable naming the interpreter when the config doesn't.
pub const PYTHON_ENV_VAR: &str = "STATENV_PYTHON";

/// Path of the project config: `.statenv/config.yml`.
pub fn default_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR).join(CONFIG_FILE)
}

/// Load configuration for a project.
///
/// An explicit path must exist. Without one, `.statenv/config.yml` is used
/// when present and built-in defaults otherwise.
///
/// # Errors
///
/// Returns `ConfigParseError` if the file is missing (explicit path only)
/// or is not valid YAML for [`SetupConfig`].
pub fn load_config(project_root: &Path, explicit: Option<&Path>) -> Result<SetupConfig> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let path = default_config_path(project_root);
            if !path.exists() {
                tracing::debug!("No config at {}, using defaults", path.display());
                return Ok(SetupConfig::default());
            }
            path
        }
    };

    load_config_file(&path)
}

/// Load a single config file.
pub fn load_config_file(path: &Path) -> Result<SetupConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SetupError::ConfigParseError {
                path: path.to_path_buf(),
                message: "file not found".to_string(),
            }
        } else {
            SetupError::Io(e)
        }
    })?;

    tracing::debug!("Loading config from {}", path.display());
    parse_config(&content, path)
}

/// Parse YAML content into [`SetupConfig`].
///
/// # Arguments
///
/// * `content` - The YAML content to parse
/// * `source_path` - Path for error reporting
pub fn parse_config(content: &str, source_path: &Path) -> Result<SetupConfig> {
    if content.trim().is_empty() {
        return Ok(SetupConfig::default());
    }

    serde_yaml::from_str(content).map_err(|e| SetupError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Pick the interpreter: CLI flag, then config, then `$STATENV_PYTHON`,
/// then the platform default.
pub fn resolve_python(cli_override: Option<&str>, config: &SetupConfig) -> String {
    cli_override
        .map(String::from)
        .or_else(|| config.python.clone())
        .or_else(|| std::env::var(PYTHON_ENV_VAR).ok().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| default_python().to_string())
}
