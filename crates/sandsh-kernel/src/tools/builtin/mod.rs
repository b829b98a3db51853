//! Built-in tools for sandsh.
//!
//! These are the only commands the shell knows.

mod archive;
mod cat;
mod cd;
mod cp;
mod crypt;
mod echo;
mod help;
mod ls;
mod mkdir;
mod pwd;
mod rm;
mod touch;

use super::ToolRegistry;
use crate::error::ShellResult;

/// Register all built-in tools with the registry.
pub fn register_builtins(registry: &mut ToolRegistry) -> ShellResult<()> {
    registry.register(mkdir::Mkdir)?;
    registry.register(touch::Touch)?;
    registry.register(cat::Cat)?;
    registry.register(rm::Rm)?;
    registry.register(cp::Cp)?;
    registry.register(cd::Cd)?;
    registry.register(ls::Ls)?;
    registry.register(echo::Echo)?;
    registry.register(crypt::Encrypt)?;
    registry.register(crypt::Decrypt)?;
    registry.register(archive::Zip)?;
    registry.register(archive::Unzip)?;
    registry.register(pwd::Pwd)?;
    registry.register(help::Help)?;
    Ok(())
}
