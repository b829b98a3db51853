//! Streaming AES-128-CBC with PKCS#7 padding.
//!
//! Ciphertext layout: a random 16-byte IV, then the CBC blocks. Files are
//! fed through the cipher one chunk at a time and never held in memory
//! whole.

use std::path::Path;

use aes::Aes128;
use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use super::{discard, same_file};
use crate::error::{ShellError, ShellResult};

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;

/// AES block size, which is also the key and IV length here.
pub const BLOCK_SIZE: usize = 16;

/// Turn a passphrase into a 16-byte key.
///
/// Longer passphrases are truncated, shorter ones zero-padded.
pub fn derive_key(passphrase: &str) -> [u8; BLOCK_SIZE] {
    let mut key = [0u8; BLOCK_SIZE];
    let bytes = passphrase.as_bytes();
    let n = bytes.len().min(BLOCK_SIZE);
    key[..n].copy_from_slice(&bytes[..n]);
    key
}

/// Incremental CBC encryptor.
pub struct StreamEncryptor {
    cipher: Aes128CbcEnc,
    pending: Vec<u8>,
}

impl StreamEncryptor {
    pub fn new(key: &[u8; BLOCK_SIZE], iv: &[u8; BLOCK_SIZE]) -> Self {
        Self {
            cipher: Aes128CbcEnc::new(&(*key).into(), &(*iv).into()),
            pending: Vec::with_capacity(BLOCK_SIZE),
        }
    }

    /// Feed plaintext; returns whatever whole blocks are ready.
    pub fn update(&mut self, data: &[u8]) -> Vec<u8> {
        self.pending.extend_from_slice(data);
        let whole = self.pending.len() - self.pending.len() % BLOCK_SIZE;
        let mut out: Vec<u8> = self.pending.drain(..whole).collect();
        for block in out.chunks_exact_mut(BLOCK_SIZE) {
            self.cipher
                .encrypt_block_mut(GenericArray::from_mut_slice(block));
        }
        out
    }

    /// Pad and encrypt the tail. Always yields exactly one block.
    pub fn finish(self) -> ShellResult<Vec<u8>> {
        let Self { cipher, pending } = self;
        let mut buf = [0u8; BLOCK_SIZE];
        buf[..pending.len()].copy_from_slice(&pending);
        let block = cipher
            .encrypt_padded_mut::<Pkcs7>(&mut buf, pending.len())
            .map_err(|_| ShellError::Codec("padding failed".into()))?;
        Ok(block.to_vec())
    }
}

/// Incremental CBC decryptor.
///
/// The last block is held back until [`finish`](Self::finish) because only
/// it carries padding.
pub struct StreamDecryptor {
    cipher: Aes128CbcDec,
    pending: Vec<u8>,
}

impl StreamDecryptor {
    pub fn new(key: &[u8; BLOCK_SIZE], iv: &[u8; BLOCK_SIZE]) -> Self {
        Self {
            cipher: Aes128CbcDec::new(&(*key).into(), &(*iv).into()),
            pending: Vec::with_capacity(2 * BLOCK_SIZE),
        }
    }

    /// Feed ciphertext; returns plaintext for every block except the last.
    pub fn update(&mut self, data: &[u8]) -> Vec<u8> {
        self.pending.extend_from_slice(data);
        if self.pending.len() <= BLOCK_SIZE {
            return Vec::new();
        }
        let keep = match self.pending.len() % BLOCK_SIZE {
            0 => BLOCK_SIZE,
            r => r,
        };
        let take = self.pending.len() - keep;
        let mut out: Vec<u8> = self.pending.drain(..take).collect();
        for block in out.chunks_exact_mut(BLOCK_SIZE) {
            self.cipher
                .decrypt_block_mut(GenericArray::from_mut_slice(block));
        }
        out
    }

    /// Decrypt the final block and strip its padding.
    ///
    /// Fails on truncated input or when the padding doesn't check out,
    /// which is what a wrong key usually looks like.
    pub fn finish(self) -> ShellResult<Vec<u8>> {
        let Self { cipher, pending } = self;
        if pending.len() != BLOCK_SIZE {
            return Err(ShellError::Codec("truncated ciphertext".into()));
        }
        let mut buf = [0u8; BLOCK_SIZE];
        buf.copy_from_slice(&pending);
        let plain = cipher
            .decrypt_padded_mut::<Pkcs7>(&mut buf)
            .map_err(|_| ShellError::Codec("bad padding (wrong key or corrupted input)".into()))?;
        Ok(plain.to_vec())
    }
}

/// Encrypt `input` into `output` under `passphrase`.
///
/// Returns the number of plaintext bytes read.
pub async fn encrypt_file(
    input: &Path,
    output: &Path,
    passphrase: &str,
    chunk_size: usize,
) -> ShellResult<u64> {
    let mut source = open_input(input, output).await?;
    let len = source
        .metadata()
        .await
        .map_err(|e| ShellError::io(input, e))?
        .len();
    if len == 0 {
        return Err(ShellError::Codec(format!("{}: empty input", input.display())));
    }

    let mut sink = File::create(output)
        .await
        .map_err(|e| ShellError::io(output, e))?;
    let iv: [u8; BLOCK_SIZE] = rand::random();
    let encryptor = StreamEncryptor::new(&derive_key(passphrase), &iv);
    let result =
        pump_encrypt(&mut source, &mut sink, &iv, encryptor, input, output, chunk_size).await;

    if result.is_err() {
        drop(sink);
        discard(output).await;
    }
    result
}

async fn pump_encrypt(
    source: &mut File,
    sink: &mut File,
    iv: &[u8; BLOCK_SIZE],
    mut encryptor: StreamEncryptor,
    input: &Path,
    output: &Path,
    chunk_size: usize,
) -> ShellResult<u64> {
    sink.write_all(iv)
        .await
        .map_err(|e| ShellError::io(output, e))?;
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut total = 0u64;
    loop {
        let n = source
            .read(&mut buf)
            .await
            .map_err(|e| ShellError::io(input, e))?;
        if n == 0 {
            break;
        }
        total += n as u64;
        let block = encryptor.update(&buf[..n]);
        sink.write_all(&block)
            .await
            .map_err(|e| ShellError::io(output, e))?;
    }
    sink.write_all(&encryptor.finish()?)
        .await
        .map_err(|e| ShellError::io(output, e))?;
    sink.flush().await.map_err(|e| ShellError::io(output, e))?;
    Ok(total)
}

/// Decrypt `input` into `output` under `passphrase`.
///
/// Returns the number of plaintext bytes written.
pub async fn decrypt_file(
    input: &Path,
    output: &Path,
    passphrase: &str,
    chunk_size: usize,
) -> ShellResult<u64> {
    let mut source = open_input(input, output).await?;
    let len = source
        .metadata()
        .await
        .map_err(|e| ShellError::io(input, e))?
        .len();
    let block = BLOCK_SIZE as u64;
    if len < 2 * block || len % block != 0 {
        return Err(ShellError::Codec(format!(
            "{}: not a valid ciphertext ({} bytes)",
            input.display(),
            len
        )));
    }

    let mut iv = [0u8; BLOCK_SIZE];
    source
        .read_exact(&mut iv)
        .await
        .map_err(|e| ShellError::io(input, e))?;
    let decryptor = StreamDecryptor::new(&derive_key(passphrase), &iv);

    let mut sink = File::create(output)
        .await
        .map_err(|e| ShellError::io(output, e))?;
    let result = pump_decrypt(&mut source, &mut sink, decryptor, input, output, chunk_size).await;

    if result.is_err() {
        drop(sink);
        discard(output).await;
    }
    result
}

async fn pump_decrypt(
    source: &mut File,
    sink: &mut File,
    mut decryptor: StreamDecryptor,
    input: &Path,
    output: &Path,
    chunk_size: usize,
) -> ShellResult<u64> {
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut total = 0u64;
    loop {
        let n = source
            .read(&mut buf)
            .await
            .map_err(|e| ShellError::io(input, e))?;
        if n == 0 {
            break;
        }
        let plain = decryptor.update(&buf[..n]);
        total += plain.len() as u64;
        sink.write_all(&plain)
            .await
            .map_err(|e| ShellError::io(output, e))?;
    }
    let tail = decryptor.finish()?;
    total += tail.len() as u64;
    sink.write_all(&tail)
        .await
        .map_err(|e| ShellError::io(output, e))?;
    sink.flush().await.map_err(|e| ShellError::io(output, e))?;
    Ok(total)
}

async fn open_input(input: &Path, output: &Path) -> ShellResult<File> {
    let meta = fs::metadata(input)
        .await
        .map_err(|e| ShellError::io(input, e))?;
    if meta.is_dir() {
        return Err(ShellError::InvalidOperation(format!(
            "{} is a directory",
            input.display()
        )));
    }
    if same_file(input, output).await {
        return Err(ShellError::InvalidOperation(
            "input and output are the same file".into(),
        ));
    }
    File::open(input).await.map_err(|e| ShellError::io(input, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn round_trip_in_memory(data: &[u8], key: &str, feed: usize) -> Vec<u8> {
        let iv = [9u8; BLOCK_SIZE];
        let key = derive_key(key);

        let mut enc = StreamEncryptor::new(&key, &iv);
        let mut ct = Vec::new();
        for chunk in data.chunks(feed) {
            ct.extend(enc.update(chunk));
        }
        ct.extend(enc.finish().unwrap());
        assert_eq!(ct.len() % BLOCK_SIZE, 0);
        assert!(ct.len() > data.len());

        let mut dec = StreamDecryptor::new(&key, &iv);
        let mut pt = Vec::new();
        for chunk in ct.chunks(feed) {
            pt.extend(dec.update(chunk));
        }
        pt.extend(dec.finish().unwrap());
        pt
    }

    #[test]
    fn key_is_truncated_or_padded() {
        assert_eq!(&derive_key("abc")[..4], b"abc\0");
        assert_eq!(derive_key("abc")[15], 0);
        assert_eq!(&derive_key("0123456789abcdefXYZ"), b"0123456789abcdef");
    }

    #[test]
    fn block_aligned_input_gains_a_full_pad_block() {
        let data = [1u8; 32];
        let mut enc = StreamEncryptor::new(&derive_key("k"), &[0u8; 16]);
        let mut ct = enc.update(&data);
        ct.extend(enc.finish().unwrap());
        assert_eq!(ct.len(), 48);
    }

    #[test]
    fn truncated_ciphertext_fails() {
        let mut dec = StreamDecryptor::new(&derive_key("k"), &[0u8; 16]);
        dec.update(&[0u8; 20]);
        assert!(matches!(dec.finish(), Err(ShellError::Codec(_))));
    }

    proptest! {
        #[test]
        fn stream_round_trip(
            data in proptest::collection::vec(any::<u8>(), 1..2048),
            key in "[ -~]{0,24}",
            feed in 1usize..100,
        ) {
            prop_assert_eq!(round_trip_in_memory(&data, &key, feed), data);
        }
    }

    #[tokio::test]
    async fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("plain");
        let data: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();
        std::fs::write(&plain, &data).unwrap();

        let enc = dir.path().join("enc");
        let dec = dir.path().join("dec");
        encrypt_file(&plain, &enc, "secret", 1024).await.unwrap();
        let ct = std::fs::read(&enc).unwrap();
        assert_eq!(ct.len(), 16 + 5008);
        assert_ne!(&ct[16..32], &data[..16]);

        let n = decrypt_file(&enc, &dec, "secret", 1024).await.unwrap();
        assert_eq!(n, 5000);
        assert_eq!(std::fs::read(&dec).unwrap(), data);
    }

    #[tokio::test]
    async fn fresh_iv_per_encryption() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("p");
        std::fs::write(&plain, b"same bytes").unwrap();
        encrypt_file(&plain, &dir.path().join("a"), "k", 1024).await.unwrap();
        encrypt_file(&plain, &dir.path().join("b"), "k", 1024).await.unwrap();
        assert_ne!(
            std::fs::read(dir.path().join("a")).unwrap(),
            std::fs::read(dir.path().join("b")).unwrap()
        );
    }

    #[tokio::test]
    async fn empty_input_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("empty");
        std::fs::write(&plain, b"").unwrap();
        let out = dir.path().join("out");
        let err = encrypt_file(&plain, &out, "k", 1024).await.unwrap_err();
        assert!(matches!(err, ShellError::Codec(_)));
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn same_input_and_output_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("p");
        std::fs::write(&plain, b"data").unwrap();
        let err = encrypt_file(&plain, &plain, "k", 1024).await.unwrap_err();
        assert!(matches!(err, ShellError::InvalidOperation(_)));
        assert_eq!(std::fs::read(&plain).unwrap(), b"data");
    }

    #[tokio::test]
    async fn missing_input_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = encrypt_file(&dir.path().join("nope"), &dir.path().join("o"), "k", 16)
            .await
            .unwrap_err();
        assert!(matches!(err, ShellError::NotFound(_)));
    }

    #[tokio::test]
    async fn short_ciphertext_is_rejected_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let enc = dir.path().join("enc");
        std::fs::write(&enc, [0u8; 20]).unwrap();
        let out = dir.path().join("out");
        let err = decrypt_file(&enc, &out, "k", 1024).await.unwrap_err();
        assert!(matches!(err, ShellError::Codec(_)));
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn wrong_key_never_yields_plaintext() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("p");
        std::fs::write(&plain, b"attack at dawn").unwrap();
        let enc = dir.path().join("enc");
        encrypt_file(&plain, &enc, "right", 1024).await.unwrap();

        let out = dir.path().join("out");
        match decrypt_file(&enc, &out, "wrong", 1024).await {
            // Bad padding is the usual outcome; the partial output is gone.
            Err(e) => {
                assert!(matches!(e, ShellError::Codec(_)));
                assert!(!out.exists());
            }
            Ok(_) => assert_ne!(std::fs::read(&out).unwrap(), b"attack at dawn"),
        }
    }
}
