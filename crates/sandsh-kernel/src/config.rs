//! Shell configuration.
//!
//! Loaded from `~/.config/sandsh/config.toml`. Every field has a default, so
//! a missing file (or a partial one) is fine.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Key used by `encrypt`/`decrypt` when no key argument is given.
pub const DEFAULT_SECRET_KEY: &str = "aaaaaaaaaaaaaaaa";

/// Chunk size for streamed copies and cipher passes.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Configuration for a sandsh kernel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Sandbox root. Every command path resolves under it.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Passphrase used when `encrypt`/`decrypt` get no key argument.
    #[serde(default = "default_key")]
    pub default_key: String,

    /// Bytes per read when streaming copies and cipher passes.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Reject resolved paths that leave the sandbox root.
    #[serde(default)]
    pub confine_paths: bool,

    /// Emit per-chunk progress lines for background copies too.
    #[serde(default)]
    pub background_progress: bool,

    /// Persist REPL history across sessions.
    #[serde(default = "default_history")]
    pub history: bool,
}

fn default_root() -> PathBuf {
    ProjectDirs::from("", "", "sandsh")
        .map(|dirs| dirs.data_dir().join("files"))
        .unwrap_or_else(|| std::env::temp_dir().join("sandsh").join("files"))
}

fn default_key() -> String {
    DEFAULT_SECRET_KEY.to_string()
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_history() -> bool {
    true
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            default_key: default_key(),
            chunk_size: default_chunk_size(),
            confine_paths: false,
            background_progress: false,
            history: default_history(),
        }
    }
}

impl ShellConfig {
    /// Replace the sandbox root.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        if config.chunk_size == 0 {
            anyhow::bail!("chunk_size must be positive in {}", path.display());
        }
        Ok(config)
    }

    /// Get the default config file path.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "sandsh")
            .context("Could not determine config directory")?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Directory for REPL history and other per-user state.
    pub fn data_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "sandsh").map(|dirs| dirs.data_dir().to_path_buf())
    }
}
