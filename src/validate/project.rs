//! Checks of the project's files on disk.

use std::fs;
use std::path::Path;

use super::check::{Check, CheckContext, CheckGroup, CheckStatus};

/// Requirements files for the three ecosystems.
pub const REQUIREMENTS_FILES: [&str; 3] = [
    "requirements-python.txt",
    "requirements-r.txt",
    "requirements-stata.do",
];

/// Directory holding configuration templates.
pub const TEMPLATE_DIR: &str = "_config_template";

/// Files every project ships in [`TEMPLATE_DIR`].
pub const TEMPLATE_FILES: [&str; 3] = ["user_config.yml", "project_config.yml", "profile_SIMPLE.R"];

/// Text the README must mention.
pub const README_MARKER: &str = "UNICEF";

const LOGS_DIR: &str = "logs";
const LOGS_WRITE_TEST_FILE: &str = ".statenv-write-test";

fn missing_files(dir: &Path, names: &[&str]) -> Vec<String> {
    names
        .iter()
        .filter(|name| !dir.join(name).is_file())
        .map(|name| name.to_string())
        .collect()
}

/// The project root is an existing directory.
pub struct ProjectRootCheck;

impl Check for ProjectRootCheck {
    fn id(&self) -> String {
        "project-root".to_string()
    }

    fn description(&self) -> String {
        "Project root exists".to_string()
    }

    fn group(&self) -> CheckGroup {
        CheckGroup::Project
    }

    fn run(&self, ctx: &CheckContext<'_>) -> CheckStatus {
        CheckStatus::expect(ctx.project_root.is_dir(), || {
            format!("{} is not a directory", ctx.project_root.display())
        })
    }
}

/// The Python, R and Stata requirements files exist.
pub struct RequirementsFilesCheck;

impl Check for RequirementsFilesCheck {
    fn id(&self) -> String {
        "requirements-files".to_string()
    }

    fn description(&self) -> String {
        "Requirements files exist".to_string()
    }

    fn group(&self) -> CheckGroup {
        CheckGroup::Project
    }

    fn run(&self, ctx: &CheckContext<'_>) -> CheckStatus {
        let missing = missing_files(ctx.project_root, &REQUIREMENTS_FILES);
        CheckStatus::expect(missing.is_empty(), || {
            format!("missing: {}", missing.join(", "))
        })
    }
}

/// README.md exists, is non-empty and mentions the organisation.
pub struct ReadmeCheck;

impl Check for ReadmeCheck {
    fn id(&self) -> String {
        "readme".to_string()
    }

    fn description(&self) -> String {
        "README.md exists and is readable".to_string()
    }

    fn group(&self) -> CheckGroup {
        CheckGroup::Project
    }

    fn run(&self, ctx: &CheckContext<'_>) -> CheckStatus {
        let path = ctx.project_root.join("README.md");
        match fs::read_to_string(&path) {
            Ok(content) if content.is_empty() => CheckStatus::Failed("README.md is empty".into()),
            Ok(content) => CheckStatus::expect(content.contains(README_MARKER), || {
                format!("README.md does not mention {}", README_MARKER)
            }),
            Err(e) => CheckStatus::Failed(format!("cannot read README.md: {}", e)),
        }
    }
}

/// The configuration templates exist.
pub struct ConfigTemplatesCheck;

impl Check for ConfigTemplatesCheck {
    fn id(&self) -> String {
        "config-templates".to_string()
    }

    fn description(&self) -> String {
        "Configuration templates exist".to_string()
    }

    fn group(&self) -> CheckGroup {
        CheckGroup::Project
    }

    fn run(&self, ctx: &CheckContext<'_>) -> CheckStatus {
        let dir = ctx.project_root.join(TEMPLATE_DIR);
        if !dir.is_dir() {
            return CheckStatus::Failed(format!("{} directory is missing", TEMPLATE_DIR));
        }
        let missing = missing_files(&dir, &TEMPLATE_FILES);
        CheckStatus::expect(missing.is_empty(), || {
            format!("missing templates: {}", missing.join(", "))
        })
    }
}

/// The logs directory can be created and written to.
pub struct LogsWritableCheck;

impl Check for LogsWritableCheck {
    fn id(&self) -> String {
        "logs-writable".to_string()
    }

    fn description(&self) -> String {
        "Logs directory is writable".to_string()
    }

    fn group(&self) -> CheckGroup {
        CheckGroup::Project
    }

    fn run(&self, ctx: &CheckContext<'_>) -> CheckStatus {
        let dir = ctx.project_root.join(LOGS_DIR);
        if let Err(e) = fs::create_dir_all(&dir) {
            return CheckStatus::Failed(format!("cannot create {}: {}", dir.display(), e));
        }

        let test_file = dir.join(LOGS_WRITE_TEST_FILE);
        if let Err(e) = fs::write(&test_file, "test") {
            return CheckStatus::Failed(format!("cannot write to {}: {}", dir.display(), e));
        }
        if let Err(e) = fs::remove_file(&test_file) {
            tracing::warn!("Could not remove {}: {}", test_file.display(), e);
        }
        CheckStatus::Passed
    }
}

/// The user config template, when present, is a non-empty YAML document.
pub struct UserConfigYamlCheck;

impl Check for UserConfigYamlCheck {
    fn id(&self) -> String {
        "user-config-yaml".to_string()
    }

    fn description(&self) -> String {
        "User config template is valid YAML".to_string()
    }

    fn group(&self) -> CheckGroup {
        CheckGroup::Project
    }

    fn run(&self, ctx: &CheckContext<'_>) -> CheckStatus {
        let path = ctx.project_root.join(TEMPLATE_DIR).join("user_config.yml");
        if !path.is_file() {
            return CheckStatus::Skipped("user_config.yml not present".into());
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => return CheckStatus::Failed(format!("cannot read user_config.yml: {}", e)),
        };
        if content.trim().is_empty() {
            return CheckStatus::Failed("user_config.yml is empty".into());
        }

        match serde_yaml::from_str::<serde_yaml::Value>(&content) {
            Ok(serde_yaml::Value::Null) => {
                CheckStatus::Failed("user_config.yml has no content".into())
            }
            Ok(_) => CheckStatus::Passed,
            Err(e) => CheckStatus::Failed(format!("invalid YAML: {}", e)),
        }
    }
}
