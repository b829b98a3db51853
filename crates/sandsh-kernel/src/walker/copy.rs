//! Recursive, streamed copy.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use super::{CopyTask, Progress};
use crate::error::{ShellError, ShellResult};
use crate::session::normalize;

/// What a copy touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopySummary {
    pub files: usize,
    pub directories: usize,
    pub bytes: u64,
}

/// Copy a file or directory tree.
///
/// Files overwrite whatever is at the destination; a file copied onto an
/// existing directory lands inside it under its own name. Directories are
/// mirrored pre-order, and files already in the destination tree that have
/// no counterpart in the source are left alone.
pub async fn copy_tree(
    task: &CopyTask,
    chunk_size: usize,
    progress: &dyn Progress,
) -> ShellResult<CopySummary> {
    let meta = fs::metadata(&task.source)
        .await
        .map_err(|e| ShellError::io(&task.source, e))?;

    let mut summary = CopySummary::default();
    if meta.is_dir() {
        if normalize(&task.destination).starts_with(normalize(&task.source)) {
            return Err(ShellError::InvalidOperation(format!(
                "cannot copy {} into itself",
                task.source.display()
            )));
        }
        copy_dir(task, chunk_size, progress, &mut summary).await?;
    } else {
        let destination = match fs::metadata(&task.destination).await {
            Ok(dst) if dst.is_dir() => match task.source.file_name() {
                Some(name) => task.destination.join(name),
                None => {
                    return Err(ShellError::InvalidOperation(format!(
                        "{}: invalid source path",
                        task.source.display()
                    )));
                }
            },
            _ => task.destination.clone(),
        };
        let file_task = task.child(task.source.clone(), destination);
        summary.bytes = copy_file(&file_task, chunk_size, progress).await?;
        summary.files = 1;
    }
    Ok(summary)
}

/// Pre-order directory copy.
fn copy_dir<'a>(
    task: &'a CopyTask,
    chunk_size: usize,
    progress: &'a dyn Progress,
    summary: &'a mut CopySummary,
) -> Pin<Box<dyn Future<Output = ShellResult<()>> + Send + 'a>> {
    Box::pin(async move {
        fs::create_dir_all(&task.destination)
            .await
            .map_err(|e| ShellError::io(&task.destination, e))?;
        summary.directories += 1;

        let mut children = Vec::new();
        let mut reader = fs::read_dir(&task.source)
            .await
            .map_err(|e| ShellError::io(&task.source, e))?;
        while let Some(entry) = reader
            .next_entry()
            .await
            .map_err(|e| ShellError::io(&task.source, e))?
        {
            children.push(entry);
        }
        children.sort_by_key(|entry| entry.file_name());

        for entry in children {
            let name = entry.file_name();
            let child = task.child(task.source.join(&name), task.destination.join(&name));
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| ShellError::io(&child.source, e))?;

            if file_type.is_dir() {
                copy_dir(&child, chunk_size, progress, summary).await?;
            } else if file_type.is_symlink() && is_dir(&child.source).await {
                tracing::warn!(path = %child.source.display(), "skipping symlinked directory");
            } else {
                summary.bytes += copy_file(&child, chunk_size, progress).await?;
                summary.files += 1;
            }
        }
        Ok(())
    })
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path).await.map(|m| m.is_dir()).unwrap_or(false)
}

/// Stream one file to its destination, reporting after every chunk.
///
/// Returns the number of bytes copied.
pub async fn copy_file(
    task: &CopyTask,
    chunk_size: usize,
    progress: &dyn Progress,
) -> ShellResult<u64> {
    if same_file(&task.source, &task.destination).await {
        return Err(ShellError::InvalidOperation(format!(
            "{} and {} are the same file",
            task.source.display(),
            task.destination.display()
        )));
    }

    let mut input = File::open(&task.source)
        .await
        .map_err(|e| ShellError::io(&task.source, e))?;
    let total = input
        .metadata()
        .await
        .map_err(|e| ShellError::io(&task.source, e))?
        .len();
    let mut output = File::create(&task.destination)
        .await
        .map_err(|e| ShellError::io(&task.destination, e))?;

    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut copied = 0u64;
    loop {
        let n = input
            .read(&mut buf)
            .await
            .map_err(|e| ShellError::io(&task.source, e))?;
        if n == 0 {
            break;
        }
        output
            .write_all(&buf[..n])
            .await
            .map_err(|e| ShellError::io(&task.destination, e))?;
        copied += n as u64;
        if !task.silent {
            progress.report(task, percent(copied, total));
        }
    }
    output
        .flush()
        .await
        .map_err(|e| ShellError::io(&task.destination, e))?;

    tracing::debug!(
        source = %task.source.display(),
        destination = %task.destination.display(),
        bytes = copied,
        "copied file"
    );
    Ok(copied)
}

fn percent(copied: u64, total: u64) -> f64 {
    if total == 0 {
        return 100.0;
    }
    (copied as f64 / total as f64 * 100.0).min(100.0)
}

/// True if both paths exist and name the same file.
pub(crate) async fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a).await, fs::canonicalize(b).await) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
