//! sandsh-kernel: the core of sandsh.
//!
//! This crate provides:
//!
//! - **Session**: sandbox root, working directory, and path resolution
//! - **Parser / Dispatch**: flat `name -opts args` lines routed to tools
//! - **Tools**: the builtin commands (`mkdir`, `cp`, `ls`, `encrypt`, ...)
//! - **Walker**: recursive copy (pre-order, streamed) and delete (post-order)
//! - **Codec**: AES-128-CBC file encryption and zip archives
//! - **Scheduler**: the FIFO worker behind `cp -d`
//! - **Kernel**: ties it together behind `execute(line) -> ExecResult`
//!
//! ```no_run
//! # async fn demo() -> anyhow::Result<()> {
//! use std::sync::Arc;
//! use sandsh_kernel::{Kernel, ShellConfig, StdoutSink};
//!
//! let kernel = Kernel::new(&ShellConfig::load()?, Arc::new(StdoutSink))?;
//! let result = kernel.execute("ls -t").await;
//! println!("{}", result.out);
//! kernel.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod kernel;
pub mod listing;
pub mod output;
pub mod parser;
pub mod result;
pub mod scheduler;
pub mod session;
pub mod tools;
pub mod walker;

pub use config::ShellConfig;
pub use dispatch::Dispatcher;
pub use error::{ShellError, ShellResult};
pub use kernel::Kernel;
pub use output::{MemorySink, NullSink, OutputSink, StdoutSink};
pub use result::ExecResult;
pub use session::Session;
