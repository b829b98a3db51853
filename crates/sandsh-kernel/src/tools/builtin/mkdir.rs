//! mkdir: Create a directory.

use async_trait::async_trait;
use tokio::fs;

use crate::error::{ShellError, ShellResult};
use crate::result::ExecResult;
use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};

/// Mkdir tool: create one directory. The parent must already exist.
pub struct Mkdir;

#[async_trait]
impl Tool for Mkdir {
    fn name(&self) -> &str {
        "mkdir"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("mkdir", "Create a directory")
            .param(ParamSchema::required("dir", "Directory to create"))
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let outcome = run(&args, ctx).await;
        ctx.outcome("mkdir", outcome)
    }
}

async fn run(args: &ToolArgs, ctx: &ExecContext) -> ShellResult<String> {
    let path = ctx.resolve_path(args.require(0, "dir")?)?;
    if fs::symlink_metadata(&path).await.is_ok() {
        return Err(ShellError::AlreadyExists(path));
    }
    fs::create_dir(&path)
        .await
        .map_err(|e| ShellError::io(&path, e))?;
    Ok(String::new())
}
