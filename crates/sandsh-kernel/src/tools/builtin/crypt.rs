//! encrypt / decrypt: AES-128-CBC file codec.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::codec::{decrypt_file, encrypt_file};
use crate::error::ShellResult;
use crate::result::ExecResult;
use crate::tools::{ExecContext, ParamSchema, Tool, ToolArgs, ToolSchema};

fn schema(name: &str, description: &str) -> ToolSchema {
    ToolSchema::new(name, description)
        .param(ParamSchema::required("input", "File to read"))
        .param(ParamSchema::required("output", "File to write"))
        .param(ParamSchema::optional(
            "key",
            "Passphrase (default: the configured key)",
        ))
}

/// The three arguments both directions take, resolved.
struct Job {
    input: PathBuf,
    output: PathBuf,
    key: String,
}

fn job(args: &ToolArgs, ctx: &ExecContext) -> ShellResult<Job> {
    Ok(Job {
        input: ctx.resolve_path(args.require(0, "input")?)?,
        output: ctx.resolve_path(args.require(1, "output")?)?,
        key: args.get(2).unwrap_or(ctx.default_key.as_str()).to_string(),
    })
}

async fn run_encrypt(args: &ToolArgs, ctx: &ExecContext) -> ShellResult<String> {
    let job = job(args, ctx)?;
    encrypt_file(&job.input, &job.output, &job.key, ctx.chunk_size).await?;
    Ok(String::new())
}

async fn run_decrypt(args: &ToolArgs, ctx: &ExecContext) -> ShellResult<String> {
    let job = job(args, ctx)?;
    decrypt_file(&job.input, &job.output, &job.key, ctx.chunk_size).await?;
    Ok(String::new())
}

/// Encrypt tool.
pub struct Encrypt;

#[async_trait]
impl Tool for Encrypt {
    fn name(&self) -> &str {
        "encrypt"
    }

    fn schema(&self) -> ToolSchema {
        schema("encrypt", "Encrypt a file with AES-128-CBC")
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let outcome = run_encrypt(&args, ctx).await;
        ctx.outcome("encrypt", outcome)
    }
}

/// Decrypt tool.
pub struct Decrypt;

#[async_trait]
impl Tool for Decrypt {
    fn name(&self) -> &str {
        "decrypt"
    }

    fn schema(&self) -> ToolSchema {
        schema("decrypt", "Decrypt a file produced by encrypt")
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let outcome = run_decrypt(&args, ctx).await;
        ctx.outcome("decrypt", outcome)
    }
}
