//! Recursive tree operations: copy and delete.
//!
//! Copy is pre-order (a destination directory exists before anything is
//! written into it) and streams each file in fixed-size chunks, reporting
//! progress per file. Delete is post-order and keeps going past individual
//! failures. Neither rolls back partial work.

mod copy;
mod delete;

use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use copy::{CopySummary, copy_file, copy_tree};
pub(crate) use copy::same_file;
pub use delete::{DeleteReport, delete_tree};

use crate::output::OutputSink;
use crate::session::relative_display;

/// One unit of copy work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyTask {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Suppress progress reporting.
    pub silent: bool,
}

impl CopyTask {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            silent: false,
        }
    }

    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// Task for a child path, inheriting `silent`.
    fn child(&self, source: PathBuf, destination: PathBuf) -> Self {
        Self {
            source,
            destination,
            silent: self.silent,
        }
    }
}

/// Receives per-chunk progress for file copies.
pub trait Progress: Send + Sync {
    /// `percent` is on a 0–100 scale.
    fn report(&self, task: &CopyTask, percent: f64);
}

/// Progress that goes nowhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn report(&self, _task: &CopyTask, _percent: f64) {}
}

/// Progress rendered as sandbox-relative lines on an [`OutputSink`].
#[derive(Clone)]
pub struct SinkProgress {
    sink: Arc<dyn OutputSink>,
    root: PathBuf,
}

impl SinkProgress {
    pub fn new(sink: Arc<dyn OutputSink>, root: impl Into<PathBuf>) -> Self {
        Self {
            sink,
            root: root.into(),
        }
    }

    fn show(&self, path: &Path) -> String {
        relative_display(&self.root, path)
    }
}

impl Progress for SinkProgress {
    fn report(&self, task: &CopyTask, percent: f64) {
        self.sink.line(&format!(
            "cp {} -> {}: {:.1}%",
            self.show(&task.source),
            self.show(&task.destination),
            percent
        ));
    }
}
