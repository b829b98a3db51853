//! Error taxonomy for sandsh operations.
//!
//! Every failure a command can hit maps onto one of these variants. Handlers
//! never let them escape: the tool layer turns them into a failed
//! [`ExecResult`](crate::ExecResult) so the command loop keeps running.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::session::relative_display;

/// Errors raised by the resolver, tree walker, codecs, and dispatcher.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("{}: does not exist", .0.display())]
    NotFound(PathBuf),
    #[error("{}: already exists", .0.display())]
    AlreadyExists(PathBuf),
    #[error("{}: not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("codec failure: {0}")]
    Codec(String),
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("malformed input: blank line")]
    MalformedInput,
    #[error("missing {0} argument")]
    MissingArgument(&'static str),
    #[error("{}: path escapes sandbox root", .0.display())]
    PathEscapesRoot(PathBuf),
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    #[error("command registered twice: {0}")]
    DuplicateCommand(String),
}

impl ShellError {
    /// Wrap an I/O error with the path it happened on.
    ///
    /// `NotFound` and `AlreadyExists` kinds are lifted into their dedicated
    /// variants so callers can match on them.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path),
            io::ErrorKind::AlreadyExists => Self::AlreadyExists(path),
            _ => Self::Io { path, source },
        }
    }

    /// Show host paths under `root` as sandbox paths (`/a/b`).
    ///
    /// Applied at the command boundary so user-facing errors read the same
    /// way as `pwd` and progress lines. Paths outside the root, and the raw
    /// input carried by `PathEscapesRoot`, are left as they are.
    pub fn relative_to(self, root: &Path) -> Self {
        let path = |p: PathBuf| PathBuf::from(relative_display(root, &p));
        let text = |message: String| relative_text(root, &message);
        match self {
            Self::NotFound(p) => Self::NotFound(path(p)),
            Self::AlreadyExists(p) => Self::AlreadyExists(path(p)),
            Self::NotADirectory(p) => Self::NotADirectory(path(p)),
            Self::Io { path: p, source } => Self::Io {
                path: path(p),
                source,
            },
            Self::Codec(m) => Self::Codec(text(m)),
            Self::InvalidOperation(m) => Self::InvalidOperation(text(m)),
            other => other,
        }
    }

    /// Exit code reported in the command's result.
    pub fn code(&self) -> i64 {
        match self {
            Self::UnknownCommand(_) | Self::MalformedInput => 127,
            Self::MissingArgument(_) => 2,
            _ => 1,
        }
    }
}

/// Messages built with `Path::display` before the root was known.
fn relative_text(root: &Path, message: &str) -> String {
    let prefix = format!("{}{}", root.display(), std::path::MAIN_SEPARATOR);
    message.replace(&prefix, "/")
}

/// Convenience alias used across the kernel.
pub type ShellResult<T> = Result<T, ShellError>;
