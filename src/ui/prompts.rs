//! Interactive prompts.

use console::Term;
use dialoguer::Confirm;

use crate::error::{Result, SetupError};

use super::Prompt;

/// Convert dialoguer errors, keeping Ctrl-C distinguishable.
fn map_dialoguer_err(e: dialoguer::Error) -> SetupError {
    let io: std::io::Error = e.into();
    if io.kind() == std::io::ErrorKind::Interrupted {
        SetupError::Interrupted
    } else {
        SetupError::Io(io)
    }
}

/// Ask a yes/no question on `term`.
pub fn confirm_on(prompt: &Prompt, term: &Term) -> Result<bool> {
    Confirm::new()
        .with_prompt(&prompt.question)
        .default(prompt.default)
        .interact_on(term)
        .map_err(map_dialoguer_err)
}
