//! Command-line parsing.
//!
//! The grammar is deliberately flat: tokens are separated by spaces, the
//! first token names the command, `-xyz` tokens contribute the single-char
//! options `x`, `y`, `z`, and everything else is a positional argument.
//! There is no quoting.

use std::collections::BTreeSet;

use crate::error::{ShellError, ShellResult};

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Command name (first token).
    pub name: String,
    /// Option characters gathered from every `-` token.
    pub options: BTreeSet<char>,
    /// Positional arguments in order.
    pub args: Vec<String>,
}

impl ParsedCommand {
    /// True if the option character was given.
    pub fn has_option(&self, c: char) -> bool {
        self.options.contains(&c)
    }
}

/// Parse one input line.
///
/// Runs of spaces don't produce empty arguments. Blank input is
/// [`ShellError::MalformedInput`].
pub fn parse(line: &str) -> ShellResult<ParsedCommand> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Err(ShellError::MalformedInput);
    }

    let mut tokens = line.split(' ').filter(|t| !t.is_empty());
    let name = tokens.next().ok_or(ShellError::MalformedInput)?.to_string();

    let mut options = BTreeSet::new();
    let mut args = Vec::new();
    for token in tokens {
        match token.strip_prefix('-') {
            Some(flags) => options.extend(flags.chars()),
            None => args.push(token.to_string()),
        }
    }

    Ok(ParsedCommand {
        name,
        options,
        args,
    })
}
