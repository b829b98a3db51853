//! sandsh REPL: an interactive shell over a sandbox directory.
//!
//! [`Repl`] owns a tokio runtime and a [`Kernel`]; each input line is run
//! to completion before the next prompt. Background copies keep running on
//! the runtime between lines and report through the kernel's output sink.

use std::sync::Arc;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use tokio::runtime::Runtime;

use sandsh_kernel::{Kernel, OutputSink, ShellConfig, StdoutSink};

/// What the REPL should do with one processed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Command succeeded; print to stdout.
    Output(String),
    /// Command failed; print to stderr.
    Error(String),
    /// `exit` was entered.
    Exit,
}

/// REPL state: the kernel plus the runtime it lives on.
pub struct Repl {
    runtime: Runtime,
    kernel: Kernel,
}

impl Repl {
    /// Create a REPL whose asynchronous lines go to stdout.
    pub fn new(config: ShellConfig) -> Result<Self> {
        Self::with_sink(config, Arc::new(StdoutSink))
    }

    /// Create a REPL with a custom sink for progress and background notices.
    pub fn with_sink(config: ShellConfig, sink: Arc<dyn OutputSink>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("Failed to create tokio runtime")?;
        // The background worker is spawned by the kernel, so build it on the runtime.
        let kernel = runtime.block_on(async { Kernel::new(&config, sink) })?;
        Ok(Self { runtime, kernel })
    }

    /// Prompt text, e.g. `sandsh:/docs> `.
    pub fn prompt(&self) -> String {
        let cwd = self.runtime.block_on(self.kernel.cwd_display());
        format!("sandsh:{}> ", cwd)
    }

    /// The kernel behind this REPL.
    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// Process one line of input.
    ///
    /// Returns `None` when a command succeeded without output.
    pub fn process_line(&mut self, line: &str) -> Option<Reply> {
        if line.trim() == "exit" {
            return Some(Reply::Exit);
        }

        let result = self.runtime.block_on(self.kernel.execute(line));
        if result.ok() {
            (!result.out.is_empty()).then_some(Reply::Output(result.out))
        } else {
            Some(Reply::Error(result.err))
        }
    }

    /// Close the background queue and wait for pending copies.
    pub fn shutdown(self) {
        let Self { runtime, kernel } = self;
        runtime.block_on(kernel.shutdown());
    }
}

/// Run the interactive loop until `exit` or EOF.
pub fn run(config: ShellConfig) -> Result<()> {
    println!("sandsh v{}, sandbox at {}", env!("CARGO_PKG_VERSION"), config.root.display());
    println!("Type help for commands, exit to quit.\n");

    let mut rl: Editor<(), DefaultHistory> =
        Editor::new().context("Failed to create editor")?;

    let history_path = if config.history {
        ShellConfig::data_dir().map(|p| p.join("history.txt"))
    } else {
        None
    };
    if let Some(ref path) = history_path {
        let _ = rl.load_history(path);
    }

    let mut repl = Repl::new(config)?;

    loop {
        let prompt = repl.prompt();

        match rl.readline(&prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.as_str());
                }

                match repl.process_line(&line) {
                    Some(Reply::Output(out)) => println!("{}", out),
                    Some(Reply::Error(err)) => eprintln!("{}", err.red()),
                    Some(Reply::Exit) => break,
                    None => {}
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(err) => {
                eprintln!("Error: {}", err);
                break;
            }
        }
    }

    if let Some(ref path) = history_path {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(e) = rl.save_history(path) {
            tracing::warn!(path = %path.display(), "failed to save history: {}", e);
        }
    }

    repl.shutdown();
    Ok(())
}
