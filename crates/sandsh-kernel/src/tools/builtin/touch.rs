//! touch: Create an empty file.

use async_trait::async_trait;
use tokio::fs::OpenOptions;

use crate::error::{ShellError, ShellResult};
use crate::result::ExecResult;
use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};

/// Touch tool: create a new, empty file. Refuses to clobber.
pub struct Touch;

#[async_trait]
impl Tool for Touch {
    fn name(&self) -> &str {
        "touch"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("touch", "Create an empty file")
            .param(ParamSchema::required("file", "File to create"))
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let outcome = run(&args, ctx).await;
        ctx.outcome("touch", outcome)
    }
}

async fn run(args: &ToolArgs, ctx: &ExecContext) -> ShellResult<String> {
    let path = ctx.resolve_path(args.require(0, "file")?)?;
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .await
        .map_err(|e| ShellError::io(&path, e))?;
    Ok(String::new())
}
