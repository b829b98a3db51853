//! help: Describe the available commands.

use async_trait::async_trait;

use crate::error::ShellError;
use crate::result::ExecResult;
use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};

/// Help tool. Reads the schemas the kernel put in the context.
pub struct Help;

#[async_trait]
impl Tool for Help {
    fn name(&self) -> &str {
        "help"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("help", "List commands, or describe one")
            .param(ParamSchema::optional("command", "Command to describe"))
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        match args.get(0) {
            None => {
                let width = ctx.schemas.iter().map(|s| s.name.len()).max().unwrap_or(0);
                let lines: Vec<String> = ctx
                    .schemas
                    .iter()
                    .map(|s| format!("{:<width$}  {}", s.name, s.description))
                    .collect();
                ExecResult::success(lines.join("\n"))
            }
            Some(name) => match ctx.schemas.iter().find(|s| s.name == name) {
                Some(schema) => ExecResult::success(schema.help()),
                None => ExecResult::from_error("help", &ShellError::UnknownCommand(name.into())),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::testing::sandbox;

    fn ctx_with_schemas() -> (tempfile::TempDir, ExecContext) {
        let (dir, mut ctx) = sandbox();
        ctx.schemas = vec![
            ToolSchema::new("cat", "Print file contents")
                .param(ParamSchema::required("file", "File to read")),
            Help.schema(),
        ];
        (dir, ctx)
    }

    #[tokio::test]
    async fn test_help_lists_all() {
        let (_dir, mut ctx) = ctx_with_schemas();
        let result = Help.execute(ToolArgs::new(), &mut ctx).await;
        assert_eq!(
            result.out,
            "cat   Print file contents\nhelp  List commands, or describe one"
        );
    }

    #[tokio::test]
    async fn test_help_one_command() {
        let (_dir, mut ctx) = ctx_with_schemas();
        let result = Help.execute(ToolArgs::positional(["cat"]), &mut ctx).await;
        assert!(result.out.starts_with("cat file\n  Print file contents"));
    }

    #[tokio::test]
    async fn test_help_unknown() {
        let (_dir, mut ctx) = ctx_with_schemas();
        let result = Help.execute(ToolArgs::positional(["frob"]), &mut ctx).await;
        assert_eq!(result.code, 127);
    }
}
