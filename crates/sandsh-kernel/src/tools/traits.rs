//! Core tool traits and types.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::error::{ShellError, ShellResult};
use crate::parser::ParsedCommand;
use crate::result::ExecResult;

use super::context::ExecContext;

/// Schema for a positional parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSchema {
    /// Parameter name.
    pub name: String,
    /// Whether this parameter is required.
    pub required: bool,
    /// Description for help text.
    pub description: String,
}

impl ParamSchema {
    /// Create a required parameter.
    pub fn required(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
            description: description.into(),
        }
    }

    /// Create an optional parameter.
    pub fn optional(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            description: description.into(),
        }
    }
}

/// Schema describing a tool's interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSchema {
    /// Tool name.
    pub name: String,
    /// Short description.
    pub description: String,
    /// Positional parameters, in order.
    pub params: Vec<ParamSchema>,
    /// Single-character options and what they do.
    pub options: Vec<(char, String)>,
}

impl ToolSchema {
    /// Create a new tool schema.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            params: Vec::new(),
            options: Vec::new(),
        }
    }

    /// Add a parameter to the schema.
    pub fn param(mut self, param: ParamSchema) -> Self {
        self.params.push(param);
        self
    }

    /// Add an option to the schema.
    pub fn option(mut self, flag: char, description: impl Into<String>) -> Self {
        self.options.push((flag, description.into()));
        self
    }

    /// One-line synopsis, e.g. `cp source destination [-d] [-q]`.
    pub fn usage(&self) -> String {
        let mut parts = vec![self.name.clone()];
        for p in &self.params {
            if p.required {
                parts.push(p.name.clone());
            } else {
                parts.push(format!("[{}]", p.name));
            }
        }
        for (flag, _) in &self.options {
            parts.push(format!("[-{flag}]"));
        }
        parts.join(" ")
    }

    /// Multi-line help text.
    pub fn help(&self) -> String {
        let mut out = format!("{}\n  {}", self.usage(), self.description);
        for p in &self.params {
            out.push_str(&format!("\n  {:<12}{}", p.name, p.description));
        }
        for (flag, desc) in &self.options {
            out.push_str(&format!("\n  -{:<11}{}", flag, desc));
        }
        out
    }
}

/// Arguments as a tool sees them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolArgs {
    /// Positional arguments in order.
    pub positional: Vec<String>,
    /// Option characters, e.g. `{'r', 'n'}` for `-rn`.
    pub options: BTreeSet<char>,
}

impl ToolArgs {
    /// Create empty args.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from positional strings, mostly for tests.
    pub fn positional<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            positional: args.into_iter().map(Into::into).collect(),
            options: BTreeSet::new(),
        }
    }

    /// Add an option.
    pub fn with_option(mut self, flag: char) -> Self {
        self.options.insert(flag);
        self
    }

    /// Get a positional argument by index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.positional.get(index).map(String::as_str)
    }

    /// Get a positional argument or fail with [`ShellError::MissingArgument`].
    pub fn require(&self, index: usize, name: &'static str) -> ShellResult<&str> {
        self.get(index).ok_or(ShellError::MissingArgument(name))
    }

    /// Check if an option is set.
    pub fn has_flag(&self, flag: char) -> bool {
        self.options.contains(&flag)
    }
}

impl From<ParsedCommand> for ToolArgs {
    fn from(cmd: ParsedCommand) -> Self {
        Self {
            positional: cmd.args,
            options: cmd.options,
        }
    }
}

/// A tool that can be executed.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The tool's name (used for lookup).
    fn name(&self) -> &str;

    /// Get the tool's schema.
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with the given arguments and context.
    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_marks_optional_params_and_options() {
        let schema = ToolSchema::new("cp", "Copy")
            .param(ParamSchema::required("source", "what"))
            .param(ParamSchema::optional("key", "how"))
            .option('d', "background");
        assert_eq!(schema.usage(), "cp source [key] [-d]");
        assert!(schema.help().contains("-d"));
    }

    #[test]
    fn require_reports_missing_name() {
        let args = ToolArgs::positional(["a"]);
        assert_eq!(args.require(0, "source").unwrap(), "a");
        assert!(matches!(
            args.require(1, "destination"),
            Err(ShellError::MissingArgument("destination"))
        ));
    }

    #[test]
    fn from_parsed_command() {
        let parsed = crate::parser::parse("ls -rt docs").unwrap();
        let args = ToolArgs::from(parsed);
        assert_eq!(args.get(0), Some("docs"));
        assert!(args.has_flag('r') && args.has_flag('t'));
    }
}
