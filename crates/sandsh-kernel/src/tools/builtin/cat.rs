//! cat: Print file contents.

use async_trait::async_trait;
use tokio::fs;

use crate::error::{ShellError, ShellResult};
use crate::result::ExecResult;
use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};

/// Cat tool: read a file and return its contents.
pub struct Cat;

#[async_trait]
impl Tool for Cat {
    fn name(&self) -> &str {
        "cat"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("cat", "Print file contents")
            .param(ParamSchema::required("file", "File to read"))
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let outcome = run(&args, ctx).await;
        ctx.outcome("cat", outcome)
    }
}

async fn run(args: &ToolArgs, ctx: &ExecContext) -> ShellResult<String> {
    let path = ctx.resolve_path(args.require(0, "file")?)?;
    let meta = fs::metadata(&path)
        .await
        .map_err(|e| ShellError::io(&path, e))?;
    if meta.is_dir() {
        return Err(ShellError::InvalidOperation(format!(
            "{} is a directory",
            ctx.display(&path)
        )));
    }
    let data = fs::read(&path).await.map_err(|e| ShellError::io(&path, e))?;
    Ok(String::from_utf8_lossy(&data).into_owned())
}
