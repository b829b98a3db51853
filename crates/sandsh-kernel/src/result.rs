//! ExecResult: the structured result of every command execution.
//!
//! Handlers return an `ExecResult` instead of printing. The REPL decides
//! where `out` and `err` go; background work reports through the
//! [`OutputSink`](crate::OutputSink) instead.

use crate::error::{ShellError, ShellResult};

/// The result of executing one command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// Exit code. 0 means success.
    pub code: i64,
    /// Human-readable output.
    pub out: String,
    /// Error message when the command failed.
    pub err: String,
}

impl ExecResult {
    /// Create a successful result with output.
    pub fn success(out: impl Into<String>) -> Self {
        Self {
            code: 0,
            out: out.into(),
            err: String::new(),
        }
    }

    /// Create a failed result with an error message.
    pub fn failure(code: i64, err: impl Into<String>) -> Self {
        Self {
            code,
            out: String::new(),
            err: err.into(),
        }
    }

    /// Build a failure from a [`ShellError`], prefixed with the command name.
    pub fn from_error(command: &str, error: &ShellError) -> Self {
        Self::failure(error.code(), format!("{}: {}", command, error))
    }

    /// Fold a handler outcome into a result.
    pub fn from_outcome(command: &str, outcome: ShellResult<String>) -> Self {
        match outcome {
            Ok(out) => Self::success(out),
            Err(e) => Self::from_error(command, &e),
        }
    }

    /// True if the command succeeded (exit code 0).
    pub fn ok(&self) -> bool {
        self.code == 0
    }
}

impl Default for ExecResult {
    fn default() -> Self {
        Self::success("")
    }
}
