//! pip invocation.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;
use crate::requirements::PackageSpecifier;
use crate::shell::{self, CommandOptions, CommandResult};

/// Shown in the log when the package listing cannot be produced.
pub const LISTING_UNAVAILABLE: &str = "Could not list packages";

/// The package manager the installer drives.
pub trait PackageManager {
    /// Upgrade the package manager itself.
    fn upgrade_self(&self) -> Result<CommandResult>;

    /// Install exactly one specifier, killing the install after `timeout`.
    fn install(&self, spec: &PackageSpecifier, timeout: Duration) -> Result<CommandResult>;

    /// Human-readable listing of installed packages.
    fn list_installed(&self) -> Result<String>;
}

/// pip run as `<python> -m pip`, so packages land in that interpreter.
#[derive(Debug, Clone)]
pub struct Pip {
    python: String,
    cwd: Option<PathBuf>,
}

impl Pip {
    /// Drive pip through `python`.
    pub fn new(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
            cwd: None,
        }
    }

    /// Run pip with `dir` as the working directory.
    pub fn in_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    fn run(&self, pip_args: &[&str], timeout: Option<Duration>) -> Result<CommandResult> {
        let mut args = vec!["-m", "pip"];
        args.extend_from_slice(pip_args);

        let options = CommandOptions {
            cwd: self.cwd.clone(),
            timeout,
            watch_interrupt: true,
            ..CommandOptions::captured()
        };
        shell::execute(&self.python, &args, &options)
    }
}

impl PackageManager for Pip {
    fn upgrade_self(&self) -> Result<CommandResult> {
        self.run(&["install", "--upgrade", "pip"], None)
    }

    fn install(&self, spec: &PackageSpecifier, timeout: Duration) -> Result<CommandResult> {
        self.run(&["install", spec.as_str()], Some(timeout))
    }

    fn list_installed(&self) -> Result<String> {
        let result = self.run(&["list"], None)?;
        if result.success {
            Ok(result.stdout)
        } else {
            tracing::warn!("pip list failed: {}", result.diagnostic());
            Ok(LISTING_UNAVAILABLE.to_string())
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    /// A fake interpreter that records its arguments and answers like pip.
    fn fake_python(dir: &Path, body: &str) -> String {
        let path = dir.join("fake-python");
        fs::write(&path, format!("#!/bin/sh\necho \"$@\" >> \"{}/calls\"\n{}\n", dir.display(), body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path.display().to_string()
    }

    fn calls(dir: &Path) -> String {
        fs::read_to_string(dir.join("calls")).unwrap_or_default()
    }

    #[test]
    fn install_passes_specifier_verbatim() {
        let temp = TempDir::new().unwrap();
        let pip = Pip::new(fake_python(temp.path(), "exit 0"));

        let result = pip
            .install(&PackageSpecifier::new("pandas>=2.0"), Duration::from_secs(10))
            .unwrap();

        assert!(result.success);
        assert_eq!(calls(temp.path()).trim(), "-m pip install pandas>=2.0");
    }

    #[test]
    fn upgrade_invokes_pip_self_upgrade() {
        let temp = TempDir::new().unwrap();
        let pip = Pip::new(fake_python(temp.path(), "exit 0"));

        pip.upgrade_self().unwrap();

        assert_eq!(calls(temp.path()).trim(), "-m pip install --upgrade pip");
    }

    #[test]
    fn install_times_out() {
        let temp = TempDir::new().unwrap();
        let pip = Pip::new(fake_python(temp.path(), "sleep 5"));

        let result = pip
            .install(&PackageSpecifier::new("slowpkg"), Duration::from_millis(200))
            .unwrap();

        assert!(result.timed_out);
    }

    #[test]
    fn list_returns_stdout() {
        let temp = TempDir::new().unwrap();
        let pip = Pip::new(fake_python(temp.path(), "echo 'numpy 1.26.4'"));

        let listing = pip.list_installed().unwrap();

        assert!(listing.contains("numpy 1.26.4"));
    }

    #[test]
    fn failed_list_is_placeholder() {
        let temp = TempDir::new().unwrap();
        let pip = Pip::new(fake_python(temp.path(), "exit 1"));

        assert_eq!(pip.list_installed().unwrap(), LISTING_UNAVAILABLE);
    }
}
