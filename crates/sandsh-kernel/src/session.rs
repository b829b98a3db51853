//! Session state and path resolution.
//!
//! A [`Session`] is the sandbox root plus the current working directory.
//! Every path a command touches goes through [`Session::resolve`] first.
//!
//! # Containment
//!
//! By default `..` segments are handed to the OS untouched, so a path like
//! `../../etc` resolves above the root. That is the shell's historical
//! behavior and is kept. Setting `confine_paths` in the config turns on a
//! lexical check that rejects anything landing outside the root.

use std::path::{Component, MAIN_SEPARATOR, MAIN_SEPARATOR_STR, Path, PathBuf};

use crate::error::{ShellError, ShellResult};

/// Sandbox root and working directory for one shell run.
#[derive(Debug, Clone)]
pub struct Session {
    root: PathBuf,
    cwd: PathBuf,
    confine: bool,
}

impl Session {
    /// Create a session whose cwd starts at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            cwd: root.clone(),
            root,
            confine: false,
        }
    }

    /// Enable or disable lexical containment under the root.
    pub fn confined(mut self, confine: bool) -> Self {
        self.confine = confine;
        self
    }

    /// The sandbox root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The current working directory (absolute host path).
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Whether containment checks are on.
    pub fn is_confined(&self) -> bool {
        self.confine
    }

    /// Resolve a user-supplied path to an absolute host path.
    ///
    /// A leading separator roots the path at the sandbox base; anything else
    /// is joined onto the cwd. Existence is not checked.
    pub fn resolve(&self, raw: &str) -> ShellResult<PathBuf> {
        let raw = raw.replace('/', MAIN_SEPARATOR_STR);

        let resolved = if raw.is_empty() {
            self.cwd.clone()
        } else if let Some(rest) = raw.strip_prefix(MAIN_SEPARATOR) {
            self.root.join(rest.trim_start_matches(MAIN_SEPARATOR))
        } else {
            self.cwd.join(&raw)
        };

        if self.confine && !normalize(&resolved).starts_with(normalize(&self.root)) {
            return Err(ShellError::PathEscapesRoot(PathBuf::from(raw)));
        }

        tracing::debug!(path = %resolved.display(), "resolved");
        Ok(resolved)
    }

    /// Move the cwd. Only `cd` calls this, after checking the target.
    pub(crate) fn set_cwd(&mut self, path: PathBuf) {
        self.cwd = normalize(&path);
    }

    /// Render a host path relative to the sandbox root, as `/a/b`.
    ///
    /// Paths outside the root are shown as-is.
    pub fn display(&self, path: &Path) -> String {
        relative_display(&self.root, path)
    }
}

/// Render `path` relative to `root` as `/a/b`, or as-is when outside it.
pub fn relative_display(root: &Path, path: &Path) -> String {
    let normalized = normalize(path);
    match normalized.strip_prefix(normalize(root)) {
        Ok(rel) => {
            let parts: Vec<_> = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            format!("/{}", parts.join("/"))
        }
        Err(_) => normalized.display().to_string(),
    }
}

/// Collapse `.` and `..` lexically, without touching the filesystem.
///
/// `..` at the top of an absolute path is dropped, matching what the OS does
/// for `/..`.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let above = matches!(out.components().next_back(), Some(Component::ParentDir));
                if above || (!out.pop() && !out.has_root()) {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
