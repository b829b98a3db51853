//! Single-worker FIFO runner for background copies.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{ShellError, ShellResult};
use crate::output::OutputSink;
use crate::session::relative_display;
use crate::walker::{CopyTask, SinkProgress, copy_tree};

/// Submitting half of the background queue.
///
/// Cheap to clone. The worker exits once every clone and the runner's own
/// sender are gone and the queue is empty.
#[derive(Clone, Debug)]
pub struct CopyQueue {
    tx: mpsc::UnboundedSender<CopyTask>,
}

impl CopyQueue {
    /// Enqueue a copy. Fails only after shutdown.
    pub fn submit(&self, task: CopyTask) -> ShellResult<()> {
        self.tx
            .send(task)
            .map_err(|_| ShellError::InvalidOperation("background queue is closed".into()))
    }
}

/// Owns the worker task that drains the queue in submission order.
pub struct BackgroundRunner {
    queue: CopyQueue,
    worker: JoinHandle<()>,
}

impl BackgroundRunner {
    /// Spawn the worker on the current tokio runtime.
    ///
    /// Progress lines and completion notices go to `sink` with paths shown
    /// relative to `root`.
    pub fn start(sink: Arc<dyn OutputSink>, root: impl Into<PathBuf>, chunk_size: usize) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run(rx, sink, root.into(), chunk_size));
        Self {
            queue: CopyQueue { tx },
            worker,
        }
    }

    /// A handle for submitting work.
    pub fn queue(&self) -> CopyQueue {
        self.queue.clone()
    }

    /// Close the queue and wait for already-queued copies to finish.
    ///
    /// Other [`CopyQueue`] clones must be dropped first or this waits for
    /// them too.
    pub async fn shutdown(self) {
        let Self { queue, worker } = self;
        drop(queue);
        if let Err(e) = worker.await {
            tracing::warn!(error = %e, "background worker ended abnormally");
        }
    }
}

async fn run(
    mut rx: mpsc::UnboundedReceiver<CopyTask>,
    sink: Arc<dyn OutputSink>,
    root: PathBuf,
    chunk_size: usize,
) {
    let progress = SinkProgress::new(sink.clone(), root.clone());
    while let Some(task) = rx.recv().await {
        let src = relative_display(&root, &task.source);
        let dst = relative_display(&root, &task.destination);
        tracing::info!(source = %src, destination = %dst, "background copy started");

        match copy_tree(&task, chunk_size, &progress).await {
            Ok(summary) => {
                tracing::info!(
                    source = %src,
                    files = summary.files,
                    bytes = summary.bytes,
                    "background copy finished"
                );
                sink.line(&format!("[bg] cp {src} -> {dst}: done"));
            }
            Err(e) => {
                let e = e.relative_to(&root);
                tracing::warn!(source = %src, error = %e, "background copy failed");
                sink.line(&format!("[bg] cp {src} -> {dst}: {e}"));
            }
        }
    }
    tracing::debug!("background queue drained");
}
