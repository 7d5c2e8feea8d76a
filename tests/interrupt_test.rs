//! Interrupt handling, in its own test binary because the Ctrl-C flag is
//! process-wide and never cleared.

use std::cell::RefCell;
use std::time::Duration;

use statenv::install::{install_all, PackageManager};
use statenv::requirements::PackageSpecifier;
use statenv::shell::{execute, interrupt, CommandOptions, CommandResult};
use statenv::ui::MockUI;
use statenv::{Result, SetupError};

/// Package manager that records every install it is asked for.
#[derive(Default)]
struct RecordingManager {
    installed: RefCell<Vec<String>>,
}

impl PackageManager for RecordingManager {
    fn upgrade_self(&self) -> Result<CommandResult> {
        Ok(CommandResult::success(String::new(), String::new(), Duration::ZERO))
    }

    fn install(&self, spec: &PackageSpecifier, _timeout: Duration) -> Result<CommandResult> {
        self.installed.borrow_mut().push(spec.to_string());
        Ok(CommandResult::success(String::new(), String::new(), Duration::ZERO))
    }

    fn list_installed(&self) -> Result<String> {
        Ok(String::new())
    }
}

#[test]
fn recorded_interrupt_stops_work() {
    interrupt::trigger();
    assert!(interrupt::is_interrupted());

    // No further package is started once Ctrl-C was seen
    let manager = RecordingManager::default();
    let specs = vec![PackageSpecifier::new("numpy"), PackageSpecifier::new("pandas")];
    let mut ui = MockUI::new();
    let err = install_all(&specs, &manager, Duration::from_secs(60), &mut ui).unwrap_err();
    assert!(matches!(err, SetupError::Interrupted));
    assert!(manager.installed.borrow().is_empty());

    if !cfg!(unix) {
        return;
    }

    // A child that fails on the same Ctrl-C counts as interrupted
    let options = CommandOptions {
        watch_interrupt: true,
        ..CommandOptions::captured()
    };
    let err = execute("sh", &["-c", "exit 1"], &options).unwrap_err();
    assert!(matches!(err, SetupError::Interrupted));

    // Without watching, the failure is reported as-is
    let result = execute("sh", &["-c", "exit 1"], &CommandOptions::captured()).unwrap();
    assert_eq!(result.exit_code, Some(1));
}
