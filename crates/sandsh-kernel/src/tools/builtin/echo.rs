//! echo: Print content, or write it to a file.

use async_trait::async_trait;
use tokio::fs;

use crate::error::{ShellError, ShellResult};
use crate::result::ExecResult;
use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};

/// Echo tool.
///
/// With one argument the content is printed. With more, the last argument
/// is the target file and everything before it, joined by single spaces,
/// replaces the file's contents.
pub struct Echo;

#[async_trait]
impl Tool for Echo {
    fn name(&self) -> &str {
        "echo"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("echo", "Print content, or overwrite a file with it")
            .param(ParamSchema::required("content", "Text to write"))
            .param(ParamSchema::optional("file", "File to overwrite"))
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let outcome = run(&args, ctx).await;
        ctx.outcome("echo", outcome)
    }
}

async fn run(args: &ToolArgs, ctx: &ExecContext) -> ShellResult<String> {
    args.require(0, "content")?;
    let Some((file, content)) = args.positional.split_last().filter(|(_, rest)| !rest.is_empty())
    else {
        return Ok(args.positional.join(" "));
    };

    let path = ctx.resolve_path(file)?;
    fs::write(&path, content.join(" "))
        .await
        .map_err(|e| ShellError::io(&path, e))?;
    Ok(String::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::testing::sandbox;

    #[tokio::test]
    async fn test_echo_prints() {
        let (_dir, mut ctx) = sandbox();
        let result = Echo.execute(ToolArgs::positional(["hello"]), &mut ctx).await;
        assert!(result.ok());
        assert_eq!(result.out, "hello");
    }

    #[tokio::test]
    async fn test_echo_overwrites_file() {
        let (_dir, mut ctx) = sandbox();
        let path = ctx.session.root().join("out.txt");
        std::fs::write(&path, b"a much longer previous body").unwrap();

        let result = Echo
            .execute(ToolArgs::positional(["hi", "out.txt"]), &mut ctx)
            .await;
        assert!(result.ok());
        assert!(result.out.is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hi");
    }

    #[tokio::test]
    async fn test_echo_joins_words() {
        let (_dir, mut ctx) = sandbox();
        let args = ToolArgs::positional(["hello", "there", "greeting"]);
        assert!(Echo.execute(args, &mut ctx).await.ok());
        let body = std::fs::read_to_string(ctx.session.root().join("greeting")).unwrap();
        assert_eq!(body, "hello there");
    }

    #[tokio::test]
    async fn test_echo_missing_parent() {
        let (_dir, mut ctx) = sandbox();
        let result = Echo
            .execute(ToolArgs::positional(["x", "no/such/file"]), &mut ctx)
            .await;
        assert!(result.err.contains("does not exist"));
    }

    #[tokio::test]
    async fn test_echo_no_args() {
        let (_dir, mut ctx) = sandbox();
        assert_eq!(Echo.execute(ToolArgs::new(), &mut ctx).await.code, 2);
    }
}
