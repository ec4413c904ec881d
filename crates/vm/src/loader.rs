//! Loader for FONZ images.
//!
//! An image is the 4-byte magic, exactly one data segment and up to one
//! code segment. A short code segment is fine, the rest stays zero; a short
//! data segment is a format error.

use std::io::{self, Read};

use thiserror::Error;
use types::{CODE_SEGMENT_SIZE, DATA_SEGMENT_SIZE, FONZ_MAGIC};

use crate::memory::Memory;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read image: {0}")]
    Io(#[from] io::Error),

    #[error("image header truncated after {read} bytes")]
    TruncatedHeader { read: usize },

    #[error("bad magic {found:02x?}, expected {magic:02x?}", magic = FONZ_MAGIC)]
    BadMagic { found: [u8; 4] },

    #[error("data segment truncated: expected {expected} bytes, got {read}")]
    TruncatedData { expected: usize, read: usize },

    #[error("{segment} segment is {size} bytes, at most {max} fit")]
    SegmentTooLarge {
        segment: &'static str,
        size: usize,
        max: usize,
    },
}

/// Segments read from an image, not yet written anywhere.
#[derive(Debug, Clone)]
pub struct Image {
    pub data: Vec<u8>,
    pub code: Vec<u8>,
}

impl Image {
    /// Parse an image from `source`.
    pub fn read_from<R: Read>(mut source: R) -> Result<Self, LoadError> {
        let mut magic = [0u8; 4];
        let read = read_full(&mut source, &mut magic)?;
        if read < magic.len() {
            return Err(LoadError::TruncatedHeader { read });
        }
        if magic != FONZ_MAGIC {
            return Err(LoadError::BadMagic { found: magic });
        }

        let mut data = vec![0u8; DATA_SEGMENT_SIZE];
        let read = read_full(&mut source, &mut data)?;
        if read != DATA_SEGMENT_SIZE {
            return Err(LoadError::TruncatedData {
                expected: DATA_SEGMENT_SIZE,
                read,
            });
        }

        let mut code = vec![0u8; CODE_SEGMENT_SIZE];
        let read = read_full(&mut source, &mut code)?;
        code.truncate(read);

        tracing::debug!(data = data.len(), code = code.len(), "parsed image");
        Ok(Self { data, code })
    }

    /// Copy both segments into `memory`. The code segment is zero-filled
    /// past the bytes the image provided.
    ///
    /// Both segments are checked before anything is written, so on error
    /// `memory` is unchanged.
    pub fn write_to(&self, memory: &mut Memory) -> Result<(), LoadError> {
        check_size("data", self.data.len(), DATA_SEGMENT_SIZE)?;
        check_size("code", self.code.len(), CODE_SEGMENT_SIZE)?;

        let mut code = [0u8; CODE_SEGMENT_SIZE];
        code[..self.code.len()].copy_from_slice(&self.code);
        let written = memory.write_data(&self.data) && memory.write_code(&code);
        debug_assert!(written, "segment sizes checked above");
        Ok(())
    }
}

fn check_size(segment: &'static str, size: usize, max: usize) -> Result<(), LoadError> {
    if size > max {
        return Err(LoadError::SegmentTooLarge { segment, size, max });
    }
    Ok(())
}

/// Read until `buf` is full or the source is exhausted. Returns the number
/// of bytes read.
fn read_full<R: Read>(source: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
