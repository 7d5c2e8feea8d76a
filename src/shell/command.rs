//! Child process execution.
//!
//! Programs are spawned directly (no intermediate shell) so that package
//! specifiers such as `pandas>=2.0` reach pip untouched.

use crate::error::{Result, SetupError};
use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::interrupt;

/// How often a running child is polled for exit, timeout and interrupt.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// How long a failed child gets for a pending Ctrl-C to be recorded.
///
/// A Ctrl-C reaches the whole process group, so the child can exit before
/// the handler thread has set the flag.
const INTERRUPT_SETTLE: Duration = Duration::from_millis(100);

/// How long to wait for output readers after a child was killed.
///
/// Grandchildren (compilers started by a build backend) can keep the pipes
/// open after the direct child is gone.
const KILL_GRACE: Duration = Duration::from_secs(2);

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal or timeout).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,

    /// Whether the command was killed because it exceeded its timeout.
    pub timed_out: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
            timed_out: false,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
            timed_out: false,
        }
    }

    /// Create a result for a command killed after `duration`.
    pub fn timeout(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: None,
            stdout,
            stderr,
            duration,
            success: false,
            timed_out: true,
        }
    }

    /// The most useful diagnostic text: stderr, or stdout when stderr is empty.
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim().to_string()
        } else {
            stderr.to_string()
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Capture stdout (if false, inherits from parent).
    pub capture_stdout: bool,

    /// Capture stderr (if false, inherits from parent).
    pub capture_stderr: bool,

    /// Wall-clock limit (None = no timeout).
    pub timeout: Option<Duration>,

    /// Kill the child and return [`SetupError::Interrupted`] on Ctrl-C.
    pub watch_interrupt: bool,
}

impl CommandOptions {
    /// Options that capture both streams.
    pub fn captured() -> Self {
        Self {
            capture_stdout: true,
            capture_stderr: true,
            ..Default::default()
        }
    }
}

/// Render a program and its arguments for messages.
pub fn display_command(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

/// Execute a program with arguments.
///
/// Spawn failures are errors; a non-zero exit or a timeout is reported in
/// the returned [`CommandResult`].
pub fn execute(program: &str, args: &[&str], options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();
    let command_line = display_command(program, args);
    tracing::debug!("Running: {}", command_line);

    let mut cmd = Command::new(program);
    cmd.args(args);
    cmd.stdin(Stdio::null());

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    cmd.stdout(if options.capture_stdout {
        Stdio::piped()
    } else {
        Stdio::inherit()
    });
    cmd.stderr(if options.capture_stderr {
        Stdio::piped()
    } else {
        Stdio::inherit()
    });

    let mut child = cmd.spawn().map_err(|e| {
        tracing::debug!("Failed to spawn {}: {}", command_line, e);
        SetupError::CommandFailed {
            command: command_line.clone(),
        }
    })?;

    let stdout_reader = child.stdout.take().map(spawn_reader);
    let stderr_reader = child.stderr.take().map(spawn_reader);

    let waited = wait_for_exit(&mut child, options, start);

    let grace = match &waited {
        Ok(Exit::Finished(_)) => None,
        _ => Some(KILL_GRACE),
    };
    let stdout = join_reader(stdout_reader, grace);
    let stderr = join_reader(stderr_reader, grace);
    let duration = start.elapsed();

    match waited.map_err(|e| {
        tracing::debug!("Failed to wait on {}: {}", command_line, e);
        e
    })? {
        Exit::Finished(status) if status.success() => {
            Ok(CommandResult::success(stdout, stderr, duration))
        }
        Exit::Finished(status) => Ok(CommandResult::failure(
            status.code(),
            stdout,
            stderr,
            duration,
        )),
        Exit::TimedOut => {
            tracing::debug!("{} timed out after {:?}", command_line, duration);
            Ok(CommandResult::timeout(stdout, stderr, duration))
        }
    }
}

enum Exit {
    Finished(ExitStatus),
    TimedOut,
}

fn wait_for_exit(child: &mut Child, options: &CommandOptions, start: Instant) -> Result<Exit> {
    loop {
        if let Some(status) = child.try_wait()? {
            if !status.success()
                && options.watch_interrupt
                && interrupt::interrupted_within(INTERRUPT_SETTLE)
            {
                return Err(SetupError::Interrupted);
            }
            return Ok(Exit::Finished(status));
        }

        if options.watch_interrupt && interrupt::is_interrupted() {
            kill(child);
            return Err(SetupError::Interrupted);
        }

        if let Some(limit) = options.timeout {
            if start.elapsed() >= limit {
                kill(child);
                return Ok(Exit::TimedOut);
            }
        }

        thread::sleep(POLL_INTERVAL);
    }
}

fn kill(child: &mut Child) {
    // The child may already have exited between polls.
    let _ = child.kill();
    let _ = child.wait();
}

fn spawn_reader<R: Read + Send + 'static>(mut stream: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = stream.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).to_string()
    })
}

fn join_reader(reader: Option<JoinHandle<String>>, grace: Option<Duration>) -> String {
    let Some(handle) = reader else {
        return String::new();
    };

    if let Some(grace) = grace {
        let deadline = Instant::now() + grace;
        while !handle.is_finished() {
            if Instant::now() >= deadline {
                return String::new();
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    handle.join().unwrap_or_default()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn execute_successful_command() {
        let result = execute("sh", &["-c", "echo hello"], &CommandOptions::captured()).unwrap();

        assert!(result.success);
        assert!(!result.timed_out);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("hello"));
    }

    #[test]
    fn execute_failing_command() {
        let result = execute("sh", &["-c", "exit 3"], &CommandOptions::captured()).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
    }

    #[test]
    fn arguments_are_not_shell_expanded() {
        let result = execute("echo", &["pandas>=2.0"], &CommandOptions::captured()).unwrap();

        assert_eq!(result.stdout.trim(), "pandas>=2.0");
    }

    #[test]
    fn execute_with_cwd() {
        let temp = tempfile::TempDir::new().unwrap();
        let options = CommandOptions {
            cwd: Some(temp.path().to_path_buf()),
            ..CommandOptions::captured()
        };

        let result = execute("sh", &["-c", "touch marker"], &options).unwrap();

        assert!(result.success);
        assert!(temp.path().join("marker").exists());
    }

    #[test]
    fn failure_without_interrupt_is_reported() {
        let options = CommandOptions {
            watch_interrupt: true,
            ..CommandOptions::captured()
        };

        let result = execute("sh", &["-c", "exit 1"], &options).unwrap();

        assert_eq!(result.exit_code, Some(1));
    }

    #[test]
    fn missing_program_is_an_error() {
        let err = execute(
            "statenv-definitely-not-a-program",
            &["--version"],
            &CommandOptions::captured(),
        )
        .unwrap_err();

        assert!(matches!(err, SetupError::CommandFailed { .. }));
        assert!(err.to_string().contains("statenv-definitely-not-a-program"));
    }

    #[test]
    fn timeout_kills_long_running_command() {
        let options = CommandOptions {
            timeout: Some(Duration::from_millis(200)),
            ..CommandOptions::captured()
        };

        let result = execute("sleep", &["5"], &options).unwrap();

        assert!(result.timed_out);
        assert!(!result.success);
        assert_eq!(result.exit_code, None);
        assert!(result.duration < Duration::from_secs(4));
    }

    #[test]
    fn fast_command_does_not_time_out() {
        let options = CommandOptions {
            timeout: Some(Duration::from_secs(10)),
            ..CommandOptions::captured()
        };

        let result = execute("sh", &["-c", "echo quick"], &options).unwrap();

        assert!(result.success);
        assert!(!result.timed_out);
    }

    #[test]
    fn diagnostic_prefers_stderr() {
        let result = execute(
            "sh",
            &["-c", "echo out; echo err >&2; exit 1"],
            &CommandOptions::captured(),
        )
        .unwrap();

        assert_eq!(result.diagnostic(), "err");
    }

    #[test]
    fn diagnostic_falls_back_to_stdout() {
        let result = CommandResult::failure(
            Some(1),
            "only stdout\n".to_string(),
            "  ".to_string(),
            Duration::ZERO,
        );
        assert_eq!(result.diagnostic(), "only stdout");
    }

    #[test]
    fn display_command_joins_args() {
        assert_eq!(
            display_command("python3", &["-m", "pip", "list"]),
            "python3 -m pip list"
        );
        assert_eq!(display_command("python3", &[]), "python3");
    }
}
