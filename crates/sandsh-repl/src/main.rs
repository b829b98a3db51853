//! sandsh entry point.
//!
//! Launch the interactive shell:
//! ```bash
//! cargo run -p sandsh-repl -- --root /tmp/box
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use sandsh_kernel::ShellConfig;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "sandsh", version, about = "Interactive shell over a sandboxed directory tree")]
struct Cli {
    /// Sandbox root directory (created if missing)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Config file to load instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Reject paths that resolve outside the sandbox root
    #[arg(long)]
    confine: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they never mix with command output.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,sandsh=info")),
        )
        .init();

    let mut config = match cli.config {
        Some(ref path) => ShellConfig::load_from(path)?,
        None => ShellConfig::load()?,
    };
    if let Some(root) = cli.root {
        config.root = root;
    }
    if cli.confine {
        config.confine_paths = true;
    }

    sandsh_repl::run(config)
}
