//! File codecs: AES-128-CBC encryption and zip archives.
//!
//! Both read and write through the host filesystem directly; callers hand
//! them already-resolved paths. A codec that fails part way removes the
//! output it started writing.

mod archive;
mod crypto;

pub use archive::{compress, decompress};
pub use crypto::{
    BLOCK_SIZE, StreamDecryptor, StreamEncryptor, decrypt_file, derive_key, encrypt_file,
};

use std::path::Path;

use tokio::fs;

use crate::walker::same_file;

/// Best-effort removal of a half-written output.
async fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        tracing::warn!(path = %path.display(), error = %e, "could not remove partial output");
    }
}
