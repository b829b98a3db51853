//! Line dispatch: parse, look up, run.

use std::sync::Arc;

use crate::error::ShellResult;
use crate::parser::parse;
use crate::result::ExecResult;
use crate::tools::{ExecContext, ToolArgs, ToolRegistry, ToolSchema, register_builtins};

/// Routes one input line to the tool it names.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    tools: Arc<ToolRegistry>,
}

impl Dispatcher {
    pub fn new(tools: Arc<ToolRegistry>) -> Self {
        Self { tools }
    }

    /// A dispatcher over the built-in tool set.
    pub fn with_builtins() -> ShellResult<Self> {
        let mut registry = ToolRegistry::new();
        register_builtins(&mut registry)?;
        Ok(Self::new(Arc::new(registry)))
    }

    /// Schemas of every registered tool, sorted by name.
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools.schemas()
    }

    /// Run one line to completion.
    ///
    /// Blank lines and unknown names produce an "Unknown command" failure
    /// (code 127) without touching any tool.
    pub async fn dispatch(&self, line: &str, ctx: &mut ExecContext) -> ExecResult {
        let Ok(parsed) = parse(line) else {
            return unknown(line);
        };
        let Some(tool) = self.tools.get(&parsed.name) else {
            tracing::debug!(command = %parsed.name, "no such command");
            return unknown(line);
        };

        tracing::debug!(command = %parsed.name, args = ?parsed.args, "dispatch");
        tool.execute(ToolArgs::from(parsed), ctx).await
    }
}

fn unknown(line: &str) -> ExecResult {
    ExecResult::failure(127, format!("Unknown command: {}", line.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;

    fn ctx() -> (tempfile::TempDir, ExecContext) {
        let dir = tempfile::tempdir().unwrap();
        let root = std::fs::canonicalize(dir.path()).unwrap();
        (dir, ExecContext::new(Session::new(root)))
    }

    #[tokio::test]
    async fn unknown_command_has_no_side_effect() {
        let (_dir, mut ctx) = ctx();
        let dispatcher = Dispatcher::with_builtins().unwrap();
        let before = ctx.cwd().to_path_buf();

        let result = dispatcher.dispatch("frobnicate a b", &mut ctx).await;
        assert_eq!(result.code, 127);
        assert_eq!(result.err, "Unknown command: frobnicate a b");
        assert_eq!(ctx.cwd(), before);
        assert_eq!(std::fs::read_dir(ctx.session.root()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn blank_line_is_unknown() {
        let (_dir, mut ctx) = ctx();
        let dispatcher = Dispatcher::with_builtins().unwrap();
        for line in ["", "   ", "\n"] {
            let result = dispatcher.dispatch(line, &mut ctx).await;
            assert_eq!(result.code, 127);
            assert!(result.err.starts_with("Unknown command"));
        }
    }

    #[tokio::test]
    async fn routes_to_named_tool() {
        let (_dir, mut ctx) = ctx();
        let dispatcher = Dispatcher::with_builtins().unwrap();
        let result = dispatcher.dispatch("echo  hello", &mut ctx).await;
        assert!(result.ok());
        assert_eq!(result.out, "hello");
    }

    #[test]
    fn schemas_cover_every_command() {
        let dispatcher = Dispatcher::with_builtins().unwrap();
        assert_eq!(dispatcher.schemas().len(), 14);
    }
}
