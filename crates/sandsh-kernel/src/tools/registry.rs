//! Tool registry for looking up and managing tools.

use std::collections::HashMap;
use std::sync::Arc;

use super::traits::{Tool, ToolSchema};
use crate::error::{ShellError, ShellResult};

/// Registry of available tools.
///
/// Names are unique; a second registration under the same name is refused.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool.
    pub fn register(&mut self, tool: impl Tool + 'static) -> ShellResult<()> {
        self.register_arc(Arc::new(tool))
    }

    /// Register a tool that's already in an Arc.
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) -> ShellResult<()> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(ShellError::DuplicateCommand(name));
        }
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// List all tool names.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    /// List all tool schemas.
    pub fn schemas(&self) -> Vec<ToolSchema> {
        let mut schemas: Vec<_> = self.tools.values().map(|t| t.schema()).collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ExecResult;
    use crate::tools::{ExecContext, ToolArgs};
    use async_trait::async_trait;

    struct Named(&'static str);

    #[async_trait]
    impl Tool for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn schema(&self) -> ToolSchema {
            ToolSchema::new(self.0, "A test tool")
        }

        async fn execute(&self, _args: ToolArgs, _ctx: &mut ExecContext) -> ExecResult {
            ExecResult::success(self.0)
        }
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = ToolRegistry::new();
        registry.register(Named("dummy")).unwrap();

        assert!(registry.get("dummy").is_some());
        assert!(registry.get("nonexistent").is_none());
        assert_eq!(registry.names(), vec!["dummy"]);
    }

    #[test]
    fn test_duplicate_is_refused() {
        let mut registry = ToolRegistry::new();
        registry.register(Named("cp")).unwrap();
        let err = registry.register(Named("cp")).unwrap_err();
        assert!(matches!(err, ShellError::DuplicateCommand(name) if name == "cp"));
        assert_eq!(registry.names(), vec!["cp"]);
    }

    #[test]
    fn test_names_and_schemas_sorted() {
        let mut registry = ToolRegistry::new();
        registry.register(Named("zzz")).unwrap();
        registry.register(Named("aaa")).unwrap();
        registry.register(Named("mmm")).unwrap();

        assert_eq!(registry.names(), vec!["aaa", "mmm", "zzz"]);
        let schemas: Vec<_> = registry.schemas().into_iter().map(|s| s.name).collect();
        assert_eq!(schemas, vec!["aaa", "mmm", "zzz"]);
    }
}
