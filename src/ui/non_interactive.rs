//! Non-interactive UI for CI/headless environments.

use std::collections::HashMap;

use crate::error::Result;

use super::theme::StatenvTheme;
use super::{parse_confirm, OutputMode, Prompt, SpinnerHandle, UserInterface};

/// Prefix of environment variables that answer prompts without a terminal.
pub const PROMPT_ENV_PREFIX: &str = "STATENV_PROMPT_";

/// UI implementation for non-interactive mode.
///
/// Spinners print their final line only. Prompts are answered from
/// `STATENV_PROMPT_<KEY>` or the prompt's default.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();

        Self {
            mode,
            env_overrides,
        }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        eprintln!("⚠ {}", msg);
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn confirm(&mut self, prompt: &Prompt) -> Result<bool> {
        let env_key = format!("{}{}", PROMPT_ENV_PREFIX, prompt.key.to_uppercase());
        if let Some(value) = self.env_overrides.get(&env_key) {
            tracing::debug!("Answering '{}' from {}", prompt.key, env_key);
            return Ok(parse_confirm(value));
        }

        tracing::debug!("No terminal, answering '{}' with default", prompt.key);
        Ok(prompt.default)
    }

    fn start_spinner(&mut self, _message: &str) -> Box<dyn SpinnerHandle> {
        Box::new(LineSpinner {
            theme: StatenvTheme::plain(),
        })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", StatenvTheme::plain().format_header(title));
        }
    }

    fn show_hint(&mut self, hint: &str) {
        if self.mode.shows_status() {
            println!("  {}", hint);
        }
    }
}

/// Spinner stand-in that prints one line when the operation finishes.
struct LineSpinner {
    theme: StatenvTheme,
}

impl SpinnerHandle for LineSpinner {
    fn finish_success(&mut self, msg: &str) {
        println!("{}", self.theme.format_success(msg));
    }

    fn finish_error(&mut self, msg: &str) {
        println!("{}", self.theme.format_error(msg));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn confirm_uses_default() {
        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Normal, HashMap::new());

        let declined = Prompt::confirm("continue_without_venv", "Continue anyway?", false);
        assert!(!ui.confirm(&declined).unwrap());

        let accepted = Prompt::confirm("continue_without_venv", "Continue anyway?", true);
        assert!(ui.confirm(&accepted).unwrap());
    }

    #[test]
    fn confirm_uses_env_override() {
        let mut ui = NonInteractiveUI::with_overrides(
            OutputMode::Normal,
            overrides(&[("STATENV_PROMPT_CONTINUE_WITHOUT_VENV", "yes")]),
        );
        let prompt = Prompt::confirm("continue_without_venv", "Continue anyway?", false);

        assert!(ui.confirm(&prompt).unwrap());
    }

    #[test]
    fn env_override_can_decline() {
        let mut ui = NonInteractiveUI::with_overrides(
            OutputMode::Normal,
            overrides(&[("STATENV_PROMPT_CONTINUE_WITHOUT_VENV", "no")]),
        );
        let prompt = Prompt::confirm("continue_without_venv", "Continue anyway?", true);

        assert!(!ui.confirm(&prompt).unwrap());
    }

    #[test]
    fn output_mode_preserved() {
        let ui = NonInteractiveUI::new(OutputMode::Verbose);
        assert_eq!(ui.output_mode(), OutputMode::Verbose);
    }
}
