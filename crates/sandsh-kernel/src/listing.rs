//! Directory listing snapshots and their ordering.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local};
use tokio::fs;

use crate::error::{ShellError, ShellResult};

/// Kind of directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirEntryKind {
    File,
    Directory,
}

/// A read-only snapshot of one directory child, taken at listing time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Name of the entry (not full path).
    pub name: String,
    /// Kind of entry.
    pub kind: DirEntryKind,
    /// Size in bytes (0 for directories).
    pub size: u64,
    /// Last modification time.
    pub modified: SystemTime,
}

impl DirEntry {
    /// Create a new directory entry.
    pub fn directory(name: impl Into<String>, modified: SystemTime) -> Self {
        Self {
            name: name.into(),
            kind: DirEntryKind::Directory,
            size: 0,
            modified,
        }
    }

    /// Create a new file entry.
    pub fn file(name: impl Into<String>, size: u64, modified: SystemTime) -> Self {
        Self {
            name: name.into(),
            kind: DirEntryKind::File,
            size,
            modified,
        }
    }

    /// One `ls` row: `name  type  sizeB  yyyy-mm-dd HH:MM:SS`.
    pub fn render(&self) -> String {
        let kind = match self.kind {
            DirEntryKind::Directory => "dir",
            DirEntryKind::File => "file",
        };
        let modified: DateTime<Local> = self.modified.into();
        format!(
            "{}  {}  {}B  {}",
            self.name,
            kind,
            self.size,
            modified.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

/// Primary sort key for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Name,
    Modified,
    Size,
}

/// Ordering selected by the `n`, `t`, `s`, `r` options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortOrder {
    pub key: SortKey,
    pub reverse: bool,
}

impl SortOrder {
    /// Pick the ordering from an option set. `n` beats `t` beats `s`.
    pub fn from_options(options: &BTreeSet<char>) -> Self {
        let key = if options.contains(&'n') {
            SortKey::Name
        } else if options.contains(&'t') {
            SortKey::Modified
        } else if options.contains(&'s') {
            SortKey::Size
        } else {
            SortKey::Name
        };
        Self {
            key,
            reverse: options.contains(&'r'),
        }
    }

    fn compare(&self, a: &DirEntry, b: &DirEntry) -> Ordering {
        let primary = match self.key {
            SortKey::Name => Ordering::Equal,
            SortKey::Modified => a.modified.cmp(&b.modified),
            SortKey::Size => a.size.cmp(&b.size),
        };
        primary.then_with(|| a.name.cmp(&b.name))
    }

    /// Sort entries in place.
    pub fn sort(&self, entries: &mut [DirEntry]) {
        entries.sort_by(|a, b| self.compare(a, b));
        if self.reverse {
            entries.reverse();
        }
    }
}

/// List the immediate children of `dir`, unsorted.
pub async fn read_entries(dir: &Path) -> ShellResult<Vec<DirEntry>> {
    let meta = fs::metadata(dir).await.map_err(|e| ShellError::io(dir, e))?;
    if !meta.is_dir() {
        return Err(ShellError::NotADirectory(dir.to_path_buf()));
    }

    let mut entries = Vec::new();
    let mut reader = fs::read_dir(dir).await.map_err(|e| ShellError::io(dir, e))?;
    while let Some(entry) = reader
        .next_entry()
        .await
        .map_err(|e| ShellError::io(dir, e))?
    {
        let path = entry.path();
        // A dangling symlink is listed as the link itself.
        let meta = match fs::metadata(&path).await {
            Ok(meta) => meta,
            Err(_) => fs::symlink_metadata(&path)
                .await
                .map_err(|e| ShellError::io(&path, e))?,
        };
        let name = entry.file_name().to_string_lossy().into_owned();
        let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        entries.push(if meta.is_dir() {
            DirEntry::directory(name, modified)
        } else {
            DirEntry::file(name, meta.len(), modified)
        });
    }
    Ok(entries)
}

/// List `dir` in the given order.
pub async fn list(dir: &Path, order: SortOrder) -> ShellResult<Vec<DirEntry>> {
    let mut entries = read_entries(dir).await?;
    order.sort(&mut entries);
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    fn sample() -> Vec<DirEntry> {
        vec![
            DirEntry::file("b.txt", 30, at(100)),
            DirEntry::directory("a", at(300)),
            DirEntry::file("c.txt", 10, at(200)),
        ]
    }

    fn names(entries: &[DirEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    fn opts(s: &str) -> BTreeSet<char> {
        s.chars().collect()
    }

    #[test]
    fn default_is_name() {
        let mut entries = sample();
        SortOrder::from_options(&opts("")).sort(&mut entries);
        assert_eq!(names(&entries), vec!["a", "b.txt", "c.txt"]);
    }

    #[test]
    fn size_sorts_dirs_first() {
        let mut entries = sample();
        SortOrder::from_options(&opts("s")).sort(&mut entries);
        assert_eq!(names(&entries), vec!["a", "c.txt", "b.txt"]);
    }

    #[test]
    fn precedence_n_over_t_over_s() {
        assert_eq!(SortOrder::from_options(&opts("tsn")).key, SortKey::Name);
        assert_eq!(SortOrder::from_options(&opts("st")).key, SortKey::Modified);
        assert_eq!(SortOrder::from_options(&opts("s")).key, SortKey::Size);
    }

    #[test]
    fn ties_break_by_name() {
        let mut entries = vec![
            DirEntry::file("z", 5, at(1)),
            DirEntry::file("y", 5, at(1)),
        ];
        SortOrder::from_options(&opts("s")).sort(&mut entries);
        assert_eq!(names(&entries), vec!["y", "z"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn dangling_symlink_is_still_listed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"abc").unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("dangling")).unwrap();

        let entries = list(dir.path(), SortOrder::default()).await.unwrap();
        assert_eq!(names(&entries), vec!["a.txt", "dangling"]);
        assert_eq!(entries[0].size, 3);
        assert_eq!(entries[1].kind, DirEntryKind::File);
    }

    #[test]
    fn render_row() {
        let entry = DirEntry::directory("docs", SystemTime::now());
        let row = entry.render();
        assert!(row.starts_with("docs  dir  0B  "));
    }
}
