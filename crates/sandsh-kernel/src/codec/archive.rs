//! Zip archives, deflate-compressed.
//!
//! The zip crate is synchronous, so both directions run on the blocking
//! pool and use `std::fs`.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::{discard, same_file};
use crate::error::{ShellError, ShellResult};

fn codec(e: zip::result::ZipError) -> ShellError {
    ShellError::Codec(e.to_string())
}

/// Archive a file or directory tree into `archive`.
///
/// A file becomes one entry under its base name. A directory becomes a
/// `name/` marker followed by its descendants as `name/child/...`, in name
/// order. Returns the number of entries written.
pub async fn compress(path: &Path, archive: &Path) -> ShellResult<usize> {
    tokio::fs::symlink_metadata(path)
        .await
        .map_err(|e| ShellError::io(path, e))?;
    if same_file(path, archive).await {
        return Err(ShellError::InvalidOperation(
            "archive would overwrite its own input".into(),
        ));
    }

    let (src, dst) = (path.to_path_buf(), archive.to_path_buf());
    let result = tokio::task::spawn_blocking(move || write_archive(&src, &dst))
        .await
        .map_err(|e| ShellError::Codec(format!("archive task failed: {e}")))?;

    if result.is_err() && tokio::fs::try_exists(archive).await.unwrap_or(false) {
        discard(archive).await;
    }
    result
}

/// Extract `archive` into `destination`, creating it if needed.
///
/// Entries whose names would land outside `destination` abort the
/// extraction. Returns the number of entries extracted.
pub async fn decompress(archive: &Path, destination: &Path) -> ShellResult<usize> {
    let (src, dst) = (archive.to_path_buf(), destination.to_path_buf());
    tokio::task::spawn_blocking(move || read_archive(&src, &dst))
        .await
        .map_err(|e| ShellError::Codec(format!("archive task failed: {e}")))?
}

fn write_archive(path: &Path, archive: &Path) -> ShellResult<usize> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            ShellError::InvalidOperation(format!("{}: nothing to archive", path.display()))
        })?;

    let file = File::create(archive).map_err(|e| ShellError::io(archive, e))?;
    // Compared against every file we visit so the archive never swallows itself.
    let own = fs::canonicalize(archive).map_err(|e| ShellError::io(archive, e))?;

    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut count = 0;

    if path.is_dir() {
        add_dir(&mut zip, options, path, &name, &own, &mut count)?;
    } else {
        add_file(&mut zip, options, path, &name)?;
        count += 1;
    }

    zip.finish().map_err(codec)?;
    tracing::debug!(archive = %archive.display(), entries = count, "archive written");
    Ok(count)
}

fn add_dir(
    zip: &mut ZipWriter<File>,
    options: SimpleFileOptions,
    dir: &Path,
    entry: &str,
    own: &Path,
    count: &mut usize,
) -> ShellResult<()> {
    zip.add_directory(format!("{entry}/"), options)
        .map_err(codec)?;
    *count += 1;

    let mut children = fs::read_dir(dir)
        .map_err(|e| ShellError::io(dir, e))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ShellError::io(dir, e))?;
    children.sort_by_key(|c| c.file_name());

    for child in children {
        let path = child.path();
        let child_entry = format!("{}/{}", entry, child.file_name().to_string_lossy());
        let file_type = child.file_type().map_err(|e| ShellError::io(&path, e))?;
        if file_type.is_dir() {
            add_dir(zip, options, &path, &child_entry, own, count)?;
        } else if file_type.is_symlink() && !path.is_file() {
            // Links to directories (or to nothing) stay out of the archive.
            tracing::warn!(path = %path.display(), "skipping symlink that is not a file");
        } else if fs::canonicalize(&path).ok().as_deref() == Some(own) {
            tracing::debug!(path = %path.display(), "skipping the archive being written");
        } else {
            add_file(zip, options, &path, &child_entry)?;
            *count += 1;
        }
    }
    Ok(())
}

fn add_file(
    zip: &mut ZipWriter<File>,
    options: SimpleFileOptions,
    path: &Path,
    entry: &str,
) -> ShellResult<()> {
    let mut source = File::open(path).map_err(|e| ShellError::io(path, e))?;
    zip.start_file(entry, options).map_err(codec)?;
    io::copy(&mut source, zip).map_err(|e| ShellError::io(path, e))?;
    Ok(())
}

fn read_archive(archive: &Path, destination: &Path) -> ShellResult<usize> {
    let file = File::open(archive).map_err(|e| ShellError::io(archive, e))?;
    let mut zip = ZipArchive::new(file).map_err(codec)?;
    fs::create_dir_all(destination).map_err(|e| ShellError::io(destination, e))?;

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).map_err(codec)?;
        let relative: PathBuf = match entry.enclosed_name() {
            Some(p) => p.to_path_buf(),
            None => {
                return Err(ShellError::InvalidOperation(format!(
                    "unsafe archive entry: {}",
                    entry.name()
                )));
            }
        };
        let target = destination.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(|e| ShellError::io(&target, e))?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| ShellError::io(parent, e))?;
        }
        let mut out = File::create(&target).map_err(|e| ShellError::io(&target, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| ShellError::io(&target, e))?;
    }

    Ok(zip.len())
}
