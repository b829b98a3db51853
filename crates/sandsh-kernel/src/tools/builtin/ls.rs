//! ls: List directory contents.

use async_trait::async_trait;

use crate::error::ShellResult;
use crate::listing::{SortOrder, list};
use crate::result::ExecResult;
use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};

/// Ls tool: list the immediate children of a directory.
pub struct Ls;

#[async_trait]
impl Tool for Ls {
    fn name(&self) -> &str {
        "ls"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("ls", "List directory contents")
            .param(ParamSchema::optional("dir", "Directory to list (default: cwd)"))
            .option('n', "Sort by name (default)")
            .option('t', "Sort by modification time")
            .option('s', "Sort by size")
            .option('r', "Reverse the order")
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let outcome = run(&args, ctx).await;
        ctx.outcome("ls", outcome)
    }
}

async fn run(args: &ToolArgs, ctx: &ExecContext) -> ShellResult<String> {
    let dir = ctx.resolve_path(args.get(0).unwrap_or(""))?;
    let entries = list(&dir, SortOrder::from_options(&args.options)).await?;
    let rows: Vec<String> = entries.iter().map(|e| e.render()).collect();
    Ok(rows.join("\n"))
}
