//! The target Python interpreter.
//!
//! Everything statenv learns about the environment comes from running
//! small snippets in the configured interpreter:
//!
//! - [`Interpreter`] - trait seam used by the installer, verifier and checks
//! - [`PythonInterpreter`] - the real implementation, built on [`crate::shell`]
//! - [`Version`] - `major.minor` versions for interpreters and packages

pub mod interpreter;
pub mod version;

pub use interpreter::{
    is_module_name, parse_info_output, Interpreter, InterpreterInfo, PythonInterpreter,
    SKIP_EXIT_CODE,
};
pub use version::Version;
