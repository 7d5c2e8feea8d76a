//! Checks that run inside the target interpreter.

use crate::python::{Version, SKIP_EXIT_CODE};

use super::check::{Check, CheckContext, CheckGroup, CheckStatus};

/// The interpreter meets the minimum release.
pub struct PythonVersionCheck;

impl Check for PythonVersionCheck {
    fn id(&self) -> String {
        "python-version".to_string()
    }

    fn description(&self) -> String {
        "Python version meets the minimum".to_string()
    }

    fn group(&self) -> CheckGroup {
        CheckGroup::Environment
    }

    fn run(&self, ctx: &CheckContext<'_>) -> CheckStatus {
        let floor = ctx.settings.min_python;
        match ctx.interpreter.info() {
            Ok(info) => {
                let found = info.release();
                CheckStatus::expect(found.satisfies(floor), || {
                    format!("Python {} is below minimum {}", found, floor)
                })
            }
            Err(e) => CheckStatus::Failed(e.to_string()),
        }
    }
}

/// Every required module imports.
pub struct RequiredModulesCheck;

impl Check for RequiredModulesCheck {
    fn id(&self) -> String {
        "required-modules".to_string()
    }

    fn description(&self) -> String {
        "Critical packages are importable".to_string()
    }

    fn group(&self) -> CheckGroup {
        CheckGroup::Environment
    }

    fn run(&self, ctx: &CheckContext<'_>) -> CheckStatus {
        let mut missing = Vec::new();
        for module in &ctx.settings.required_modules {
            match ctx.interpreter.can_import(module) {
                Ok(true) => {}
                Ok(false) => missing.push(module.as_str()),
                Err(e) => return CheckStatus::Failed(e.to_string()),
            }
        }

        CheckStatus::expect(missing.is_empty(), || {
            format!("not importable: {}", missing.join(", "))
        })
    }
}

/// A module's `__version__` meets its floor; skipped when the module is absent.
pub struct VersionFloorCheck {
    module: String,
    floor: Version,
}

impl VersionFloorCheck {
    /// Require `module` to be at least `floor`.
    pub fn new(module: &str, floor: Version) -> Self {
        Self {
            module: module.to_string(),
            floor,
        }
    }
}

impl Check for VersionFloorCheck {
    fn id(&self) -> String {
        format!("{}-version", self.module)
    }

    fn description(&self) -> String {
        format!("{} version is at least {}", self.module, self.floor)
    }

    fn group(&self) -> CheckGroup {
        CheckGroup::Environment
    }

    fn run(&self, ctx: &CheckContext<'_>) -> CheckStatus {
        let raw = match ctx.interpreter.module_version(&self.module) {
            Ok(Some(raw)) => raw,
            Ok(None) => return CheckStatus::Skipped(format!("{} not installed", self.module)),
            Err(e) => return CheckStatus::Failed(e.to_string()),
        };

        match raw.parse::<Version>() {
            Ok(found) => CheckStatus::expect(found.satisfies(self.floor), || {
                format!(
                    "{} version {} is below minimum {}",
                    self.module, raw, self.floor
                )
            }),
            Err(e) => CheckStatus::Failed(e),
        }
    }
}

/// A Python snippet that exits with the skip code when its module is missing.
pub struct SnippetCheck {
    id: &'static str,
    description: &'static str,
    subject: &'static str,
    code: String,
}

impl SnippetCheck {
    /// YAML dump and load through a temporary file.
    pub fn yaml_round_trip() -> Self {
        Self {
            id: "yaml-round-trip",
            description: "YAML can be written and read back",
            subject: "yaml",
            code: format!(
                r#"import os, sys, tempfile
try:
    import yaml
except ImportError:
    sys.exit({SKIP_EXIT_CODE})
data = {{"test_key": "test_value", "test_number": 42}}
with tempfile.NamedTemporaryFile("w", suffix=".yml", delete=False) as f:
    yaml.dump(data, f)
    path = f.name
try:
    with open(path) as f:
        loaded = yaml.safe_load(f)
finally:
    os.unlink(path)
assert loaded == data, "round trip returned %r" % (loaded,)
"#
            ),
        }
    }

    /// Sum, mean and length of a small array.
    pub fn numpy_operations() -> Self {
        Self {
            id: "numpy-operations",
            description: "numpy basic operations",
            subject: "numpy",
            code: format!(
                r#"import sys
try:
    import numpy as np
except ImportError:
    sys.exit({SKIP_EXIT_CODE})
arr = np.array([1, 2, 3, 4, 5])
assert np.sum(arr) == 15, "sum was %r" % (np.sum(arr),)
assert np.mean(arr) == 3.0, "mean was %r" % (np.mean(arr),)
assert len(arr) == 5, "length was %r" % (len(arr),)
"#
            ),
        }
    }

    /// Filtering and aggregation on a small frame.
    pub fn pandas_operations() -> Self {
        Self {
            id: "pandas-operations",
            description: "pandas basic operations",
            subject: "pandas",
            code: format!(
                r#"import sys
try:
    import pandas as pd
except ImportError:
    sys.exit({SKIP_EXIT_CODE})
df = pd.DataFrame({{"x": range(10), "y": range(10, 20)}})
filtered = df[df["x"] > 5]
assert len(filtered) == 4, "filter kept %r rows" % (len(filtered),)
assert df["x"].mean() == 4.5, "mean was %r" % (df["x"].mean(),)
"#
            ),
        }
    }

    /// The Python source this check runs.
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl Check for SnippetCheck {
    fn id(&self) -> String {
        self.id.to_string()
    }

    fn description(&self) -> String {
        self.description.to_string()
    }

    fn group(&self) -> CheckGroup {
        CheckGroup::Environment
    }

    fn run(&self, ctx: &CheckContext<'_>) -> CheckStatus {
        match ctx.interpreter.run_snippet(&self.code) {
            Ok(result) => CheckStatus::from_snippet(&result, self.subject),
            Err(e) => CheckStatus::Failed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationSettings;
    use crate::error::{Result, SetupError};
    use crate::python::{parse_info_output, Interpreter, InterpreterInfo};
    use crate::shell::CommandResult;
    use std::collections::HashMap;
    use std::path::Path;
    use std::time::Duration;

    /// Interpreter with a fixed release and a fixed set of installed modules.
    struct FakeInterpreter {
        release: [u32; 3],
        modules: HashMap<&'static str, &'static str>,
        snippet_exit: Option<i32>,
        unrunnable: bool,
    }

    impl FakeInterpreter {
        fn new(release: [u32; 3], modules: &[(&'static str, &'static str)]) -> Self {
            Self {
                release,
                modules: modules.iter().copied().collect(),
                snippet_exit: None,
                unrunnable: false,
            }
        }
    }

    fn ok(stdout: &str) -> CommandResult {
        CommandResult::success(stdout.to_string(), String::new(), Duration::ZERO)
    }

    fn exit(code: i32, stderr: &str) -> CommandResult {
        CommandResult::failure(Some(code), String::new(), stderr.to_string(), Duration::ZERO)
    }

    impl Interpreter for FakeInterpreter {
        fn program(&self) -> &str {
            "python3"
        }

        fn info(&self) -> Result<InterpreterInfo> {
            let [a, b, c] = self.release;
            let json = format!(
                r#"{{"version": [{a}, {b}, {c}], "version_string": "{a}.{b}.{c}", "prefix": "/v", "base_prefix": "/usr", "real_prefix": null}}"#
            );
            parse_info_output(&json).map_err(|m| SetupError::InterpreterInspectFailed {
                python: "python3".into(),
                message: m,
            })
        }

        fn run_snippet(&self, code: &str) -> Result<CommandResult> {
            if self.unrunnable {
                return Err(SetupError::CommandFailed {
                    command: "python3 -c".into(),
                });
            }
            if let Some(module) = code.strip_prefix("import ").filter(|m| !m.contains('\n')) {
                return Ok(if self.modules.contains_key(module.trim()) {
                    ok("")
                } else {
                    exit(1, "ModuleNotFoundError")
                });
            }
            if code.contains("__version__") {
                let module = self
                    .modules
                    .iter()
                    .find(|(name, _)| code.contains(&format!("import {} as _m", name)));
                return Ok(match module {
                    Some((_, version)) => ok(&format!("{}\n", version)),
                    None => exit(SKIP_EXIT_CODE, ""),
                });
            }
            Ok(match self.snippet_exit {
                None => ok(""),
                Some(code) => exit(code, "Traceback\nAssertionError: mean was 2.5"),
            })
        }
    }

    fn run(check: &dyn Check, python: &dyn Interpreter) -> CheckStatus {
        let settings = ValidationSettings::default();
        let ctx = CheckContext {
            project_root: Path::new("."),
            interpreter: python,
            settings: &settings,
        };
        check.run(&ctx)
    }

    #[test]
    fn python_version_at_floor_passes() {
        let python = FakeInterpreter::new([3, 9, 0], &[]);
        assert_eq!(run(&PythonVersionCheck, &python), CheckStatus::Passed);
    }

    #[test]
    fn python_version_below_floor_fails() {
        let python = FakeInterpreter::new([3, 8, 18], &[]);
        assert_eq!(
            run(&PythonVersionCheck, &python),
            CheckStatus::Failed("Python 3.8 is below minimum 3.9".into())
        );
    }

    #[test]
    fn missing_required_module_fails() {
        let python = FakeInterpreter::new([3, 11, 0], &[("numpy", "1.26.4"), ("pandas", "2.1.0")]);
        assert_eq!(
            run(&RequiredModulesCheck, &python),
            CheckStatus::Failed("not importable: yaml, matplotlib".into())
        );
    }

    #[test]
    fn all_required_modules_pass() {
        let python = FakeInterpreter::new(
            [3, 11, 0],
            &[("numpy", "1.26.4"), ("pandas", "2.1.0"), ("yaml", "6.0"), ("matplotlib", "3.8.0")],
        );
        assert_eq!(run(&RequiredModulesCheck, &python), CheckStatus::Passed);
    }

    #[test]
    fn unrunnable_interpreter_is_not_reported_as_missing_modules() {
        let mut python = FakeInterpreter::new([3, 11, 0], &[]);
        python.unrunnable = true;
        assert_eq!(
            run(&RequiredModulesCheck, &python),
            CheckStatus::Failed("Command failed to run: python3 -c".into())
        );
    }

    #[test]
    fn version_floor_ids_name_the_module() {
        let numpy = VersionFloorCheck::new("numpy", Version::new(1, 24));
        let pandas = VersionFloorCheck::new("pandas", Version::new(2, 0));
        assert_eq!(numpy.id(), "numpy-version");
        assert_eq!(pandas.id(), "pandas-version");
    }

    #[test]
    fn version_floor_passes_and_fails() {
        let python = FakeInterpreter::new([3, 11, 0], &[("numpy", "1.26.4"), ("pandas", "1.5.3")]);

        let numpy = VersionFloorCheck::new("numpy", Version::new(1, 24));
        assert_eq!(run(&numpy, &python), CheckStatus::Passed);

        let pandas = VersionFloorCheck::new("pandas", Version::new(2, 0));
        assert_eq!(
            run(&pandas, &python),
            CheckStatus::Failed("pandas version 1.5.3 is below minimum 2.0".into())
        );
    }

    #[test]
    fn version_floor_skips_when_absent() {
        let python = FakeInterpreter::new([3, 11, 0], &[]);
        let check = VersionFloorCheck::new("pandas", Version::new(2, 0));
        assert_eq!(
            run(&check, &python),
            CheckStatus::Skipped("pandas not installed".into())
        );
    }

    #[test]
    fn version_floor_compares_numerically() {
        let python = FakeInterpreter::new([3, 11, 0], &[("numpy", "1.100.0")]);
        let check = VersionFloorCheck::new("numpy", Version::new(1, 24));
        assert_eq!(run(&check, &python), CheckStatus::Passed);
    }

    #[test]
    fn snippet_passes() {
        let python = FakeInterpreter::new([3, 11, 0], &[]);
        assert_eq!(run(&SnippetCheck::numpy_operations(), &python), CheckStatus::Passed);
    }

    #[test]
    fn snippet_skip_code_skips() {
        let mut python = FakeInterpreter::new([3, 11, 0], &[]);
        python.snippet_exit = Some(SKIP_EXIT_CODE);
        assert_eq!(
            run(&SnippetCheck::yaml_round_trip(), &python),
            CheckStatus::Skipped("yaml not installed".into())
        );
    }

    #[test]
    fn snippet_assertion_fails() {
        let mut python = FakeInterpreter::new([3, 11, 0], &[]);
        python.snippet_exit = Some(1);
        assert_eq!(
            run(&SnippetCheck::pandas_operations(), &python),
            CheckStatus::Failed("AssertionError: mean was 2.5".into())
        );
    }

    #[test]
    fn snippets_use_skip_convention() {
        for check in [
            SnippetCheck::yaml_round_trip(),
            SnippetCheck::numpy_operations(),
            SnippetCheck::pandas_operations(),
        ] {
            assert!(check.code().contains("except ImportError:\n    sys.exit(3)"));
        }
        assert!(SnippetCheck::yaml_round_trip()
            .code()
            .contains(r#"{"test_key": "test_value", "test_number": 42}"#));
    }
}
