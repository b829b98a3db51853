//! zip / unzip: Deflate archives.

use async_trait::async_trait;

use crate::codec::{compress, decompress};
use crate::error::ShellResult;
use crate::result::ExecResult;
use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};

/// Zip tool: archive a file or directory tree.
pub struct Zip;

#[async_trait]
impl Tool for Zip {
    fn name(&self) -> &str {
        "zip"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("zip", "Archive a file or directory")
            .param(ParamSchema::required("input", "File or directory to archive"))
            .param(ParamSchema::required("output", "Archive to write"))
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let outcome = run_zip(&args, ctx).await;
        ctx.outcome("zip", outcome)
    }
}

async fn run_zip(args: &ToolArgs, ctx: &ExecContext) -> ShellResult<String> {
    let input = ctx.resolve_path(args.require(0, "input")?)?;
    let output = ctx.resolve_path(args.require(1, "output")?)?;
    compress(&input, &output).await?;
    Ok(String::new())
}

/// Unzip tool: extract an archive.
pub struct Unzip;

#[async_trait]
impl Tool for Unzip {
    fn name(&self) -> &str {
        "unzip"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("unzip", "Extract an archive")
            .param(ParamSchema::required("archive", "Archive to read"))
            .param(ParamSchema::optional("dir", "Destination (default: cwd)"))
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let outcome = run_unzip(&args, ctx).await;
        ctx.outcome("unzip", outcome)
    }
}

async fn run_unzip(args: &ToolArgs, ctx: &ExecContext) -> ShellResult<String> {
    let archive = ctx.resolve_path(args.require(0, "archive")?)?;
    let dir = ctx.resolve_path(args.get(1).unwrap_or(""))?;
    decompress(&archive, &dir).await?;
    Ok(String::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::testing::sandbox;

    #[tokio::test]
    async fn test_zip_then_unzip_into_dir() {
        let (_dir, mut ctx) = sandbox();
        let root = ctx.session.root().to_path_buf();
        std::fs::create_dir_all(root.join("proj/src")).unwrap();
        std::fs::write(root.join("proj/src/lib.rs"), b"fn main() {}").unwrap();

        let zipped = Zip
            .execute(ToolArgs::positional(["proj", "proj.zip"]), &mut ctx)
            .await;
        assert!(zipped.ok(), "{}", zipped.err);

        let unzipped = Unzip
            .execute(ToolArgs::positional(["proj.zip", "restore"]), &mut ctx)
            .await;
        assert!(unzipped.ok(), "{}", unzipped.err);
        assert_eq!(
            std::fs::read(root.join("restore/proj/src/lib.rs")).unwrap(),
            b"fn main() {}"
        );
    }

    #[tokio::test]
    async fn test_unzip_defaults_to_cwd() {
        let (_dir, mut ctx) = sandbox();
        let root = ctx.session.root().to_path_buf();
        std::fs::write(root.join("f.txt"), b"f").unwrap();
        std::fs::create_dir(root.join("work")).unwrap();

        assert!(Zip.execute(ToolArgs::positional(["f.txt", "f.zip"]), &mut ctx).await.ok());
        ctx.set_cwd(root.join("work"));
        assert!(Unzip.execute(ToolArgs::positional(["/f.zip"]), &mut ctx).await.ok());
        assert_eq!(std::fs::read(root.join("work/f.txt")).unwrap(), b"f");
    }

    #[tokio::test]
    async fn test_zip_missing_input() {
        let (_dir, mut ctx) = sandbox();
        let result = Zip
            .execute(ToolArgs::positional(["nope", "out.zip"]), &mut ctx)
            .await;
        assert!(result.err.contains("does not exist"));
    }
}
