//! Ctrl-C tracking.
//!
//! The handler only records the interrupt. Long-running operations poll
//! [`is_interrupted`] and unwind with [`SetupError::Interrupted`], which
//! `main` turns into exit code 130.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{Result, SetupError};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Install the process-wide Ctrl-C handler.
pub fn install_handler() -> Result<()> {
    ctrlc::set_handler(trigger)
    .map_err(|e| anyhow::anyhow!("Failed to set signal handler: {}", e))?;
    Ok(())
}

/// Record an interrupt, as the Ctrl-C handler does.
pub fn trigger() {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

/// Whether Ctrl-C has been pressed since startup.
pub fn is_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// Whether an interrupt is recorded before `grace` runs out.
pub fn interrupted_within(grace: Duration) -> bool {
    let deadline = Instant::now() + grace;
    loop {
        if is_interrupted() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        thread::sleep(Duration::from_millis(5));
    }
}

/// Return `Err(Interrupted)` if Ctrl-C has been pressed.
pub fn check() -> Result<()> {
    if is_interrupted() {
        Err(SetupError::Interrupted)
    } else {
        Ok(())
    }
}
