//! Configuration schema definitions for statenv.
//!
//! Every field has a default matching the stock analytics environment, so
//! an absent or empty config file is valid.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::python::Version;

/// Root configuration structure for `.statenv/config.yml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupConfig {
    /// Interpreter to install into (name on PATH or explicit path).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python: Option<String>,

    /// Requirements file (relative to project root).
    pub requirements_file: PathBuf,

    /// Directory for installation logs (relative to project root).
    pub logs_dir: PathBuf,

    /// Oldest interpreter the installer accepts.
    pub min_python: Version,

    /// Per-package install timeout in seconds.
    pub install_timeout_secs: u64,

    /// Packages that must import after installation.
    pub critical_packages: Vec<CriticalPackage>,

    /// Settings for `statenv check`.
    pub validation: ValidationSettings,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            python: None,
            requirements_file: PathBuf::from("requirements-python.txt"),
            logs_dir: PathBuf::from("logs"),
            min_python: Version::new(3, 9),
            install_timeout_secs: 300,
            critical_packages: default_critical_packages(),
            validation: ValidationSettings::default(),
        }
    }
}

impl SetupConfig {
    /// Per-package install timeout.
    pub fn install_timeout(&self) -> Duration {
        Duration::from_secs(self.install_timeout_secs)
    }
}

fn default_critical_packages() -> Vec<CriticalPackage> {
    vec![
        CriticalPackage::new("numpy"),
        CriticalPackage::new("pandas"),
        CriticalPackage::new("matplotlib"),
        CriticalPackage::new("seaborn"),
        CriticalPackage::new("jupyter"),
        CriticalPackage::new("requests"),
        CriticalPackage::with_module("pyyaml", "yaml"),
    ]
}

/// A package whose importability decides whether the install succeeded.
///
/// Accepts either a bare name (`numpy`) or a mapping when the import name
/// differs from the distribution name (`{name: pyyaml, module: yaml}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CriticalPackageEntry")]
pub struct CriticalPackage {
    /// Distribution name, as shown to the user.
    pub name: String,

    /// Import name, when different from `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
}

impl CriticalPackage {
    /// A package imported under its own name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            module: None,
        }
    }

    /// A package imported under a different name.
    pub fn with_module(name: &str, module: &str) -> Self {
        Self {
            name: name.to_string(),
            module: Some(module.to_string()),
        }
    }

    /// The name passed to `import`.
    pub fn import_name(&self) -> &str {
        self.module.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CriticalPackageEntry {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        module: Option<String>,
    },
}

impl From<CriticalPackageEntry> for CriticalPackage {
    fn from(entry: CriticalPackageEntry) -> Self {
        match entry {
            CriticalPackageEntry::Name(name) => Self { name, module: None },
            CriticalPackageEntry::Full { name, module } => Self { name, module },
        }
    }
}

/// Expectations checked by `statenv check`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    /// Oldest interpreter the checks accept.
    pub min_python: Version,

    /// Modules that must be importable.
    pub required_modules: Vec<String>,

    /// Minimum `__version__` per module.
    pub version_floors: BTreeMap<String, Version>,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        let mut version_floors = BTreeMap::new();
        version_floors.insert("numpy".to_string(), Version::new(1, 24));
        version_floors.insert("pandas".to_string(), Version::new(2, 0));

        Self {
            min_python: Version::new(3, 9),
            required_modules: ["numpy", "pandas", "yaml", "matplotlib"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            version_floors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_environment() {
        let config = SetupConfig::default();
        assert_eq!(config.requirements_file, PathBuf::from("requirements-python.txt"));
        assert_eq!(config.logs_dir, PathBuf::from("logs"));
        assert_eq!(config.min_python, Version::new(3, 9));
        assert_eq!(config.install_timeout(), Duration::from_secs(300));
        assert_eq!(config.python, None);
    }

    #[test]
    fn default_critical_packages() {
        let config = SetupConfig::default();
        let names: Vec<_> = config
            .critical_packages
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(
            names,
            ["numpy", "pandas", "matplotlib", "seaborn", "jupyter", "requests", "pyyaml"]
        );
    }

    #[test]
    fn pyyaml_imports_as_yaml() {
        let config = SetupConfig::default();
        let pyyaml = config
            .critical_packages
            .iter()
            .find(|p| p.name == "pyyaml")
            .unwrap();
        assert_eq!(pyyaml.import_name(), "yaml");
        assert_eq!(CriticalPackage::new("numpy").import_name(), "numpy");
    }

    #[test]
    fn default_validation_settings() {
        let v = ValidationSettings::default();
        assert_eq!(v.min_python, Version::new(3, 9));
        assert_eq!(v.required_modules, ["numpy", "pandas", "yaml", "matplotlib"]);
        assert_eq!(v.version_floors.get("numpy"), Some(&Version::new(1, 24)));
        assert_eq!(v.version_floors.get("pandas"), Some(&Version::new(2, 0)));
    }

    #[test]
    fn parses_partial_config() {
        let yaml = r#"
install_timeout_secs: 60
critical_packages:
  - numpy
  - name: pyyaml
    module: yaml
"#;
        let config: SetupConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.install_timeout_secs, 60);
        assert_eq!(
            config.critical_packages,
            vec![
                CriticalPackage::new("numpy"),
                CriticalPackage::with_module("pyyaml", "yaml"),
            ]
        );
        // Untouched fields keep their defaults
        assert_eq!(config.logs_dir, PathBuf::from("logs"));
        assert_eq!(config.min_python, Version::new(3, 9));
    }

    #[test]
    fn parses_validation_block() {
        let yaml = r#"
validation:
  min_python: "3.10"
  version_floors:
    numpy: "2.0"
"#;
        let config: SetupConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.validation.min_python, Version::new(3, 10));
        assert_eq!(
            config.validation.version_floors.get("numpy"),
            Some(&Version::new(2, 0))
        );
        assert_eq!(config.validation.required_modules.len(), 4);
    }

    #[test]
    fn critical_package_mapping_without_module() {
        let pkg: CriticalPackage = serde_yaml::from_str("name: requests").unwrap();
        assert_eq!(pkg, CriticalPackage::new("requests"));
    }
}
