//! Tool system: the commands a sandsh line can name.
//!
//! Every command is a [`Tool`] registered by name in a [`ToolRegistry`].
//! The registry is built once at startup by [`register_builtins`]; there is
//! no discovery.

mod builtin;
mod context;
mod registry;
mod traits;

pub use builtin::register_builtins;
pub use context::ExecContext;
pub use registry::ToolRegistry;
pub use traits::{ParamSchema, Tool, ToolArgs, ToolSchema};
