//! cd: Change working directory.

use async_trait::async_trait;
use tokio::fs;

use crate::error::{ShellError, ShellResult};
use crate::result::ExecResult;
use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};

/// Cd tool: change current working directory.
pub struct Cd;

#[async_trait]
impl Tool for Cd {
    fn name(&self) -> &str {
        "cd"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("cd", "Change current working directory").param(ParamSchema::optional(
            "dir",
            "Directory to change to (default: sandbox root)",
        ))
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let outcome = run(&args, ctx).await;
        ctx.outcome("cd", outcome)
    }
}

async fn run(args: &ToolArgs, ctx: &mut ExecContext) -> ShellResult<String> {
    let resolved = ctx.resolve_path(args.get(0).unwrap_or("/"))?;

    // Verify the path exists and is a directory
    let meta = fs::metadata(&resolved)
        .await
        .map_err(|e| ShellError::io(&resolved, e))?;
    if !meta.is_dir() {
        return Err(ShellError::NotADirectory(resolved));
    }
    ctx.set_cwd(resolved);
    Ok(String::new())
}
