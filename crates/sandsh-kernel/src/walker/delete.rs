//! Recursive, post-order delete.

use std::future::Future;
use std::io;
use std::path::Path;
use std::pin::Pin;

use async_trait::async_trait;
use tokio::fs;

use crate::error::{ShellError, ShellResult};

/// Outcome of a recursive delete.
///
/// A delete with failures still removes everything it can.
#[derive(Debug, Default)]
pub struct DeleteReport {
    pub removed: usize,
    pub failures: Vec<ShellError>,
}

impl DeleteReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// The removal calls a delete makes.
#[async_trait]
trait Remove: Send + Sync {
    async fn remove_file(&self, path: &Path) -> io::Result<()>;
    async fn remove_dir(&self, path: &Path) -> io::Result<()>;
}

/// Removal through the host filesystem.
struct HostFs;

#[async_trait]
impl Remove for HostFs {
    async fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path).await
    }

    async fn remove_dir(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir(path).await
    }
}

/// Remove `path` and everything under it. Symlinks are removed, never
/// followed.
pub async fn delete_tree(path: &Path) -> ShellResult<DeleteReport> {
    delete_with(path, &HostFs).await
}

async fn delete_with(path: &Path, ops: &dyn Remove) -> ShellResult<DeleteReport> {
    let meta = fs::symlink_metadata(path)
        .await
        .map_err(|e| ShellError::io(path, e))?;

    let mut report = DeleteReport::default();
    if meta.is_dir() {
        delete_dir(path, ops, &mut report).await;
    } else {
        remove_one(path, false, ops, &mut report).await;
    }

    for failure in &report.failures {
        tracing::warn!(error = %failure, "delete left an entry behind");
    }
    Ok(report)
}

fn delete_dir<'a>(
    dir: &'a Path,
    ops: &'a dyn Remove,
    report: &'a mut DeleteReport,
) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
    Box::pin(async move {
        match fs::read_dir(dir).await {
            Ok(mut reader) => loop {
                match reader.next_entry().await {
                    Ok(Some(entry)) => {
                        let child = entry.path();
                        match entry.file_type().await {
                            Ok(ft) if ft.is_dir() => delete_dir(&child, ops, report).await,
                            Ok(_) => remove_one(&child, false, ops, report).await,
                            Err(e) => report.failures.push(ShellError::io(&child, e)),
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        report.failures.push(ShellError::io(dir, e));
                        break;
                    }
                }
            },
            Err(e) => report.failures.push(ShellError::io(dir, e)),
        }
        remove_one(dir, true, ops, report).await;
    })
}

async fn remove_one(path: &Path, is_dir: bool, ops: &dyn Remove, report: &mut DeleteReport) {
    let result = if is_dir {
        ops.remove_dir(path).await
    } else {
        ops.remove_file(path).await
    };
    match result {
        Ok(()) => report.removed += 1,
        Err(e) => report.failures.push(ShellError::io(path, e)),
    }
}
