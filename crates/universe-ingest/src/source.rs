//! Byte-level source wrapper: fingerprinting, progress and encoding checks.

use std::io::{self, BufRead, BufReader, Read};

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::{IngestError, Result};

/// Size and SHA-256 of every byte consumed from a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceDigest {
    pub bytes_read: u64,
    /// Lowercase hex SHA-256.
    pub fingerprint: String,
}

/// Reader that hashes and counts bytes as the parser pulls them.
pub(crate) struct TrackingReader<'a, R> {
    inner: R,
    hasher: Sha256,
    bytes_read: u64,
    progress: Option<Box<dyn FnMut(u64) + 'a>>,
}

impl<'a, R: Read> TrackingReader<'a, R> {
    pub(crate) fn new(inner: R, progress: Option<Box<dyn FnMut(u64) + 'a>>) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
            bytes_read: 0,
            progress,
        }
    }

    pub(crate) fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub(crate) fn digest(&self) -> SourceDigest {
        SourceDigest {
            bytes_read: self.bytes_read,
            fingerprint: hex::encode(self.hasher.clone().finalize()),
        }
    }
}

impl<R: Read> Read for TrackingReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.hasher.update(&buf[..n]);
            self.bytes_read += n as u64;
            if let Some(progress) = self.progress.as_mut() {
                progress(self.bytes_read);
            }
        }
        Ok(n)
    }
}

/// Buffers a source and rejects UTF-16 input up front.
///
/// The UTF-8 byte order mark is accepted; it is stripped from the first
/// header later.
pub(crate) fn open_buffered<R: Read>(reader: R) -> Result<BufReader<R>> {
    let mut buffered = BufReader::new(reader);
    let head = buffered.fill_buf()?;
    if head.starts_with(&[0xFF, 0xFE]) {
        return Err(IngestError::UnsupportedEncoding {
            encoding: "UTF-16 LE",
        });
    }
    if head.starts_with(&[0xFE, 0xFF]) {
        return Err(IngestError::UnsupportedEncoding {
            encoding: "UTF-16 BE",
        });
    }
    Ok(buffered)
}
