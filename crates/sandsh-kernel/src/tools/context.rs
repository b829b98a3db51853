//! Execution context for tools.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{DEFAULT_CHUNK_SIZE, DEFAULT_SECRET_KEY, ShellConfig};
use crate::error::{ShellError, ShellResult};
use crate::output::{NullSink, OutputSink};
use crate::result::ExecResult;
use crate::scheduler::CopyQueue;
use crate::session::Session;

use super::traits::ToolSchema;

/// Execution context passed to tools.
///
/// Owns the session, so cwd changes made by one command are seen by the
/// next.
pub struct ExecContext {
    /// Sandbox root and cwd.
    pub session: Session,
    /// Where copy progress goes.
    pub sink: Arc<dyn OutputSink>,
    /// Queue for `cp -d`. `None` means background copies run inline.
    pub background: Option<CopyQueue>,
    /// Passphrase used when encrypt/decrypt get no key argument.
    pub default_key: String,
    /// Streaming chunk size in bytes.
    pub chunk_size: usize,
    /// Report per-chunk progress for background copies.
    pub background_progress: bool,
    /// Schemas of every registered tool, for `help`.
    pub schemas: Vec<ToolSchema>,
}

impl ExecContext {
    /// Create a context with default settings and no sink output.
    pub fn new(session: Session) -> Self {
        Self {
            session,
            sink: Arc::new(NullSink),
            background: None,
            default_key: DEFAULT_SECRET_KEY.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            background_progress: false,
            schemas: Vec::new(),
        }
    }

    /// Create a context configured from `config`.
    pub fn from_config(session: Session, config: &ShellConfig, sink: Arc<dyn OutputSink>) -> Self {
        Self {
            sink,
            default_key: config.default_key.clone(),
            chunk_size: config.chunk_size,
            background_progress: config.background_progress,
            ..Self::new(session)
        }
    }

    /// Set the output sink.
    pub fn with_sink(mut self, sink: Arc<dyn OutputSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Attach a background queue.
    pub fn with_background(mut self, queue: CopyQueue) -> Self {
        self.background = Some(queue);
        self
    }

    /// Resolve a user path against the session.
    pub fn resolve_path(&self, path: &str) -> ShellResult<PathBuf> {
        self.session.resolve(path)
    }

    /// Show a host path relative to the sandbox root.
    pub fn display(&self, path: &Path) -> String {
        self.session.display(path)
    }

    /// Fold a handler outcome into a result, with sandbox-relative paths.
    pub fn outcome(&self, command: &str, outcome: ShellResult<String>) -> ExecResult {
        let root = self.session.root();
        ExecResult::from_outcome(command, outcome.map_err(|e| e.relative_to(root)))
    }

    /// A failed result for `error`, with sandbox-relative paths.
    pub fn fail(&self, command: &str, error: ShellError) -> ExecResult {
        ExecResult::from_error(command, &error.relative_to(self.session.root()))
    }

    /// Change the current working directory.
    pub fn set_cwd(&mut self, path: PathBuf) {
        self.session.set_cwd(path);
    }

    /// Current working directory (host path).
    pub fn cwd(&self) -> &Path {
        self.session.cwd()
    }
}
