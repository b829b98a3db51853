//! The Kernel: owns the session and runs sandsh commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::RwLock;

use crate::config::ShellConfig;
use crate::dispatch::Dispatcher;
use crate::output::OutputSink;
use crate::result::ExecResult;
use crate::scheduler::BackgroundRunner;
use crate::session::Session;
use crate::tools::{ExecContext, ToolSchema};

/// The Kernel. Executes sandsh command lines.
///
/// This is the primary interface for running commands. It owns all the
/// runtime state: the session (root and cwd), the tool registry, and the
/// background copy worker.
pub struct Kernel {
    /// Canonical sandbox root.
    root: PathBuf,
    /// Parser plus tool registry.
    dispatcher: Dispatcher,
    /// Execution context (session, sink, settings).
    exec_ctx: RwLock<ExecContext>,
    /// Worker for `cp -d`.
    runner: BackgroundRunner,
}

impl Kernel {
    /// Create a kernel from configuration.
    ///
    /// The sandbox root is created if missing and canonicalized. Must be
    /// called from within a tokio runtime, since the background worker is
    /// spawned here.
    pub fn new(config: &ShellConfig, sink: Arc<dyn OutputSink>) -> Result<Self> {
        std::fs::create_dir_all(&config.root)
            .with_context(|| format!("Failed to create sandbox root {}", config.root.display()))?;
        let root = std::fs::canonicalize(&config.root)
            .with_context(|| format!("Failed to resolve sandbox root {}", config.root.display()))?;

        let dispatcher = Dispatcher::with_builtins().context("Failed to register builtins")?;
        let runner = BackgroundRunner::start(sink.clone(), &root, config.chunk_size);

        let session = Session::new(&root).confined(config.confine_paths);
        let mut exec_ctx =
            ExecContext::from_config(session, config, sink).with_background(runner.queue());
        exec_ctx.schemas = dispatcher.schemas();

        tracing::info!(root = %root.display(), confined = config.confine_paths, "kernel ready");
        Ok(Self {
            root,
            dispatcher,
            exec_ctx: RwLock::new(exec_ctx),
            runner,
        })
    }

    /// Execute one command line.
    ///
    /// Never fails: every error is folded into the returned [`ExecResult`].
    pub async fn execute(&self, input: &str) -> ExecResult {
        let mut ctx = self.exec_ctx.write().await;
        self.dispatcher.dispatch(input, &mut ctx).await
    }

    /// The canonical sandbox root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Current working directory as a host path.
    pub async fn cwd(&self) -> PathBuf {
        self.exec_ctx.read().await.cwd().to_path_buf()
    }

    /// Current working directory relative to the root, e.g. `/a/b`.
    pub async fn cwd_display(&self) -> String {
        let ctx = self.exec_ctx.read().await;
        ctx.display(ctx.cwd())
    }

    /// Get available tool schemas.
    pub fn tool_schemas(&self) -> Vec<ToolSchema> {
        self.dispatcher.schemas()
    }

    /// Shutdown the kernel.
    ///
    /// Closes the background queue and waits for copies already queued.
    pub async fn shutdown(self) {
        let Self {
            exec_ctx, runner, ..
        } = self;
        // The context holds a queue handle; it has to go before the worker
        // can see the channel close.
        drop(exec_ctx);
        runner.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::MemorySink;

    fn kernel(dir: &Path) -> Kernel {
        let config = ShellConfig::default().with_root(dir.join("files"));
        Kernel::new(&config, Arc::new(MemorySink::new())).expect("failed to create kernel")
    }

    #[tokio::test]
    async fn test_kernel_creates_root() {
        let dir = tempfile::tempdir().unwrap();
        let kernel = kernel(dir.path());
        assert!(kernel.root().is_dir());
        assert_eq!(kernel.cwd_display().await, "/");
        kernel.shutdown().await;
    }

    #[tokio::test]
    async fn test_kernel_execute_echo() {
        let dir = tempfile::tempdir().unwrap();
        let kernel = kernel(dir.path());
        let result = kernel.execute("echo hello").await;
        assert!(result.ok());
        assert_eq!(result.out, "hello");
        kernel.shutdown().await;
    }

    #[tokio::test]
    async fn test_kernel_cwd_persists_between_lines() {
        let dir = tempfile::tempdir().unwrap();
        let kernel = kernel(dir.path());
        assert!(kernel.execute("mkdir work").await.ok());
        assert!(kernel.execute("cd work").await.ok());
        assert_eq!(kernel.cwd_display().await, "/work");
        assert_eq!(kernel.execute("pwd").await.out, "/work");
        assert_eq!(kernel.cwd().await, kernel.root().join("work"));
        kernel.shutdown().await;
    }

    #[tokio::test]
    async fn test_kernel_help_sees_all_tools() {
        let dir = tempfile::tempdir().unwrap();
        let kernel = kernel(dir.path());
        let help = kernel.execute("help").await;
        for schema in kernel.tool_schemas() {
            assert!(help.out.contains(&schema.name), "missing {}", schema.name);
        }
        kernel.shutdown().await;
    }

    #[tokio::test]
    async fn test_kernel_confined() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ShellConfig::default().with_root(dir.path().join("files"));
        config.confine_paths = true;
        let kernel = Kernel::new(&config, Arc::new(MemorySink::new())).unwrap();

        let result = kernel.execute("cat ../../etc/hostname").await;
        assert!(result.err.contains("escapes sandbox root"));
        kernel.shutdown().await;
    }
}
