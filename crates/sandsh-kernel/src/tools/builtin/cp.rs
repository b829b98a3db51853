//! cp: Recursive copy, in the foreground or queued.
//!
//! # Examples
//!
//! ```text
//! cp notes.txt backup.txt     # blocks until done, progress per chunk
//! cp photos /archive -d       # returns at once, copy runs on the worker
//! cp big.iso copy.iso -q      # no progress lines
//! ```

use async_trait::async_trait;
use tokio::fs;

use crate::error::{ShellError, ShellResult};
use crate::result::ExecResult;
use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};
use crate::walker::{CopyTask, SinkProgress, copy_tree};

/// Cp tool: copy a file or directory tree.
pub struct Cp;

#[async_trait]
impl Tool for Cp {
    fn name(&self) -> &str {
        "cp"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("cp", "Copy a file or directory tree")
            .param(ParamSchema::required("source", "File or directory to copy"))
            .param(ParamSchema::required("destination", "Where to copy it"))
            .option('d', "Run in the background and return immediately")
            .option('q', "Don't report progress")
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let outcome = run(&args, ctx).await;
        ctx.outcome("cp", outcome)
    }
}

async fn run(args: &ToolArgs, ctx: &ExecContext) -> ShellResult<String> {
    let source = ctx.resolve_path(args.require(0, "source")?)?;
    let destination = ctx.resolve_path(args.require(1, "destination")?)?;
    let quiet = args.has_flag('q');

    if args.has_flag('d') {
        // Catch the obvious mistake now rather than on the worker.
        fs::symlink_metadata(&source)
            .await
            .map_err(|e| ShellError::io(&source, e))?;

        let task = CopyTask::new(&source, &destination).silent(quiet || !ctx.background_progress);
        if let Some(queue) = &ctx.background {
            queue.submit(task)?;
            return Ok(format!(
                "queued {} -> {}",
                ctx.display(&source),
                ctx.display(&destination)
            ));
        }
        tracing::debug!("no background queue, copying inline");
        let progress = SinkProgress::new(ctx.sink.clone(), ctx.session.root());
        copy_tree(&task, ctx.chunk_size, &progress).await?;
        return Ok(String::new());
    }

    let task = CopyTask::new(&source, &destination).silent(quiet);
    let progress = SinkProgress::new(ctx.sink.clone(), ctx.session.root());
    let summary = copy_tree(&task, ctx.chunk_size, &progress).await?;
    tracing::debug!(files = summary.files, bytes = summary.bytes, "cp finished");
    Ok(String::new())
}
