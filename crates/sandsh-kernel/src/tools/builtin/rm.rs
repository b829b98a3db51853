//! rm: Recursive delete.

use async_trait::async_trait;

use crate::error::ShellError;
use crate::result::ExecResult;
use crate::session::normalize;
use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};
use crate::walker::delete_tree;

/// Rm tool: remove a file, or a directory and everything under it.
pub struct Rm;

#[async_trait]
impl Tool for Rm {
    fn name(&self) -> &str {
        "rm"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("rm", "Remove a file or directory tree")
            .param(ParamSchema::required("path", "Path to remove"))
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let path = match args
            .require(0, "path")
            .and_then(|raw| ctx.resolve_path(raw))
        {
            Ok(p) => p,
            Err(e) => return ctx.fail("rm", e),
        };

        if normalize(&path) == normalize(ctx.session.root()) {
            return ctx.fail(
                "rm",
                ShellError::InvalidOperation("refusing to remove the sandbox root".into()),
            );
        }

        match delete_tree(&path).await {
            Ok(report) if report.is_clean() => ExecResult::success(""),
            // One line per entry left behind.
            Ok(report) => {
                let lines: Vec<String> = report
                    .failures
                    .into_iter()
                    .map(|e| ctx.fail("rm", e).err)
                    .collect();
                ExecResult::failure(1, lines.join("\n"))
            }
            Err(e) => ctx.fail("rm", e),
        }
    }
}
