//! Running snippets in the target Python interpreter.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::error::{Result, SetupError};
use crate::shell::{self, CommandOptions, CommandResult};

use super::Version;

/// Exit status a snippet uses to report that its subject module is missing.
pub const SKIP_EXIT_CODE: i32 = 3;

/// Prints a JSON description of the running interpreter.
const INSPECT_SCRIPT: &str = r#"import json, sys
print(json.dumps({
    "version": list(sys.version_info[:3]),
    "version_string": sys.version,
    "prefix": sys.prefix,
    "base_prefix": getattr(sys, "base_prefix", sys.prefix),
    "real_prefix": getattr(sys, "real_prefix", None),
}))"#;

static MODULE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$").unwrap()
});

/// Whether `name` is a dotted Python module path that is safe to splice into a snippet.
pub fn is_module_name(name: &str) -> bool {
    MODULE_NAME.is_match(name)
}

/// Facts reported by the interpreter about itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpreterInfo {
    /// `sys.version_info[:3]`.
    pub version: [u32; 3],
    /// `sys.version`, including build information.
    pub version_string: String,
    /// `sys.prefix`.
    pub prefix: PathBuf,
    /// `sys.base_prefix`.
    pub base_prefix: PathBuf,
    /// `sys.real_prefix`, set by legacy `virtualenv`.
    #[serde(default)]
    pub real_prefix: Option<PathBuf>,
}

impl InterpreterInfo {
    /// The `major.minor` release.
    pub fn release(&self) -> Version {
        Version::new(self.version[0], self.version[1])
    }

    /// Whether packages install into an environment separate from the system interpreter.
    pub fn is_isolated(&self) -> bool {
        self.real_prefix.is_some() || self.base_prefix != self.prefix
    }

    /// First line of the full version string.
    pub fn short_version_string(&self) -> &str {
        self.version_string.lines().next().unwrap_or_default()
    }
}

/// The interpreter packages are installed into and checked against.
pub trait Interpreter {
    /// The executable as configured (name or path).
    fn program(&self) -> &str;

    /// Describe the interpreter.
    fn info(&self) -> Result<InterpreterInfo>;

    /// Run `python -c <code>`.
    fn run_snippet(&self, code: &str) -> Result<CommandResult>;

    /// Whether `import <module>` succeeds.
    ///
    /// An invalid module name is never importable. Failing to run the
    /// interpreter at all is an error, not a failed import.
    fn can_import(&self, module: &str) -> Result<bool> {
        if !is_module_name(module) {
            tracing::warn!("Refusing to import invalid module name '{}'", module);
            return Ok(false);
        }
        Ok(self.run_snippet(&format!("import {}", module))?.success)
    }

    /// `<module>.__version__`, or `None` when the module cannot be imported.
    fn module_version(&self, module: &str) -> Result<Option<String>> {
        if !is_module_name(module) {
            return Ok(None);
        }
        let code = format!(
            "import sys\ntry:\n    import {module} as _m\nexcept ImportError:\n    sys.exit({SKIP_EXIT_CODE})\nprint(getattr(_m, '__version__', ''))"
        );
        let result = self.run_snippet(&code)?;
        if result.success {
            Ok(Some(result.stdout.trim().to_string()))
        } else {
            Ok(None)
        }
    }
}

/// A real interpreter found on PATH or at an explicit location.
#[derive(Debug, Clone)]
pub struct PythonInterpreter {
    program: String,
    cwd: Option<PathBuf>,
}

impl PythonInterpreter {
    /// Create an interpreter handle for `program` (e.g. `python3`).
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            cwd: None,
        }
    }

    /// Run snippets with `dir` as the working directory.
    pub fn in_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    fn options(&self) -> CommandOptions {
        CommandOptions {
            cwd: self.cwd.clone(),
            watch_interrupt: true,
            ..CommandOptions::captured()
        }
    }

    fn inspect_error(&self, message: impl Into<String>) -> SetupError {
        SetupError::InterpreterInspectFailed {
            python: self.program.clone(),
            message: message.into(),
        }
    }
}

impl Interpreter for PythonInterpreter {
    fn program(&self) -> &str {
        &self.program
    }

    fn info(&self) -> Result<InterpreterInfo> {
        let result = match self.run_snippet(INSPECT_SCRIPT) {
            Ok(r) => r,
            Err(SetupError::CommandFailed { .. }) => {
                return Err(self.inspect_error("not found or not executable"));
            }
            Err(e) => return Err(e),
        };

        if !result.success {
            return Err(self.inspect_error(result.diagnostic()));
        }

        parse_info_output(&result.stdout).map_err(|e| self.inspect_error(e))
    }

    fn run_snippet(&self, code: &str) -> Result<CommandResult> {
        shell::execute(&self.program, &["-c", code], &self.options())
    }
}

/// Parse the inspection script's JSON line, ignoring any noise printed before it.
pub fn parse_info_output(stdout: &str) -> std::result::Result<InterpreterInfo, String> {
    let line = stdout
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .ok_or_else(|| "inspection printed nothing".to_string())?;

    serde_json::from_str(line.trim()).map_err(|e| format!("unexpected inspection output: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VENV_JSON: &str = r#"{"version": [3, 11, 4], "version_string": "3.11.4 (main, Jun  7 2023)\n[GCC 12.2.0]", "prefix": "/work/venv", "base_prefix": "/usr", "real_prefix": null}"#;

    #[test]
    fn parses_info_json() {
        let info = parse_info_output(VENV_JSON).unwrap();
        assert_eq!(info.version, [3, 11, 4]);
        assert_eq!(info.release(), Version::new(3, 11));
        assert_eq!(info.short_version_string(), "3.11.4 (main, Jun  7 2023)");
    }

    #[test]
    fn ignores_leading_noise() {
        let out = format!("some warning\n{}\n\n", VENV_JSON);
        assert!(parse_info_output(&out).is_ok());
    }

    #[test]
    fn empty_output_is_an_error() {
        assert!(parse_info_output("  \n").is_err());
    }

    #[test]
    fn garbage_output_is_an_error() {
        let err = parse_info_output("Python 3.11.4").unwrap_err();
        assert!(err.contains("unexpected inspection output"));
    }

    #[test]
    fn venv_is_isolated() {
        let info = parse_info_output(VENV_JSON).unwrap();
        assert!(info.is_isolated());
    }

    #[test]
    fn system_interpreter_is_not_isolated() {
        let info = InterpreterInfo {
            version: [3, 12, 1],
            version_string: "3.12.1".into(),
            prefix: PathBuf::from("/usr"),
            base_prefix: PathBuf::from("/usr"),
            real_prefix: None,
        };
        assert!(!info.is_isolated());
    }

    #[test]
    fn legacy_virtualenv_is_isolated() {
        let info = InterpreterInfo {
            version: [2, 7, 18],
            version_string: "2.7.18".into(),
            prefix: PathBuf::from("/env"),
            base_prefix: PathBuf::from("/env"),
            real_prefix: Some(PathBuf::from("/usr")),
        };
        assert!(info.is_isolated());
    }

    #[test]
    fn real_prefix_may_be_absent() {
        let json = r#"{"version": [3, 9, 0], "version_string": "3.9.0", "prefix": "/usr", "base_prefix": "/usr"}"#;
        let info = parse_info_output(json).unwrap();
        assert_eq!(info.real_prefix, None);
    }

    #[test]
    fn module_names() {
        assert!(is_module_name("numpy"));
        assert!(is_module_name("yaml"));
        assert!(is_module_name("matplotlib.pyplot"));
        assert!(is_module_name("_private"));
        assert!(!is_module_name("pyyaml>=6"));
        assert!(!is_module_name("os; import shutil"));
        assert!(!is_module_name("1abc"));
        assert!(!is_module_name(""));
    }

    #[test]
    fn missing_interpreter_reports_inspect_failure() {
        let python = PythonInterpreter::new("statenv-no-such-python");
        let err = python.info().unwrap_err();
        assert!(matches!(err, SetupError::InterpreterInspectFailed { .. }));
    }

    #[test]
    fn missing_interpreter_import_is_an_error() {
        let python = PythonInterpreter::new("statenv-no-such-python");
        let err = python.can_import("numpy").unwrap_err();
        assert!(matches!(err, SetupError::CommandFailed { .. }));
    }

    #[test]
    fn invalid_module_name_is_not_importable() {
        let python = PythonInterpreter::new("statenv-no-such-python");
        assert!(!python.can_import("os; import shutil").unwrap());
    }
}
