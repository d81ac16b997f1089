//! Chunk records: borrowed [`Chunk`] and retained [`OwnedChunk`].

use bytes::Bytes;
use std::fmt;
use std::ops::Range;

#[cfg(feature = "hash-blake3")]
use super::ChunkHash;

/// A content-defined chunk borrowed from a [`StreamChunker`](crate::StreamChunker)'s buffer.
///
/// The `data` view is only valid until the next call to
/// [`next_chunk`](crate::StreamChunker::next_chunk); the borrow checker
/// enforces this. Use [`to_owned_chunk`](Self::to_owned_chunk) to keep it.
///
/// # Example
///
/// ```
/// use gearcdc::Chunk;
///
/// let chunk = Chunk {
///     offset: 100,
///     length: 5,
///     fingerprint: 0,
///     data: b"hello",
/// };
///
/// assert_eq!(chunk.range(), 100..105);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Absolute offset of the first byte in the stream.
    pub offset: u64,

    /// Chunk length in bytes; equal to `data.len()`.
    pub length: u32,

    /// Gear fingerprint at the boundary.
    pub fingerprint: u64,

    /// The chunk bytes.
    pub data: &'a [u8],
}

impl Chunk<'_> {
    /// Returns the length of the chunk data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the chunk has no data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the end offset (exclusive).
    pub fn end(&self) -> u64 {
        self.offset + u64::from(self.length)
    }

    /// Returns the chunk's byte range in the stream.
    pub fn range(&self) -> Range<u64> {
        self.offset..self.end()
    }

    /// Copies the data out so the chunk outlives the chunker's buffer.
    pub fn to_owned_chunk(&self) -> OwnedChunk {
        OwnedChunk {
            offset: self.offset,
            fingerprint: self.fingerprint,
            data: Bytes::copy_from_slice(self.data),
        }
    }

    /// Computes the BLAKE3 digest of the chunk data.
    #[cfg(feature = "hash-blake3")]
    pub fn strong_hash(&self) -> ChunkHash {
        crate::hash::digest(self.data)
    }
}

impl fmt::Display for Chunk<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Chunk({} bytes @ {}, fp={:#018x})",
            self.length, self.offset, self.fingerprint
        )
    }
}

/// A chunk that owns its data.
///
/// Produced by [`Chunk::to_owned_chunk`] and by
/// [`OwnedChunks`](crate::OwnedChunks). Cloning is cheap: the data is a
/// reference-counted [`Bytes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedChunk {
    /// Absolute offset of the first byte in the stream.
    pub offset: u64,

    /// Gear fingerprint at the boundary.
    pub fingerprint: u64,

    /// The chunk bytes.
    pub data: Bytes,
}

impl OwnedChunk {
    /// Returns the length of the chunk data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the chunk has no data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the end offset (exclusive).
    pub fn end(&self) -> u64 {
        self.offset + self.data.len() as u64
    }

    /// Returns the chunk's byte range in the stream.
    pub fn range(&self) -> Range<u64> {
        self.offset..self.end()
    }

    /// Borrows this chunk as a [`Chunk`].
    pub fn as_chunk(&self) -> Chunk<'_> {
        Chunk {
            offset: self.offset,
            length: self.data.len() as u32,
            fingerprint: self.fingerprint,
            data: &self.data,
        }
    }

    /// Consumes the chunk and returns the underlying data.
    pub fn into_data(self) -> Bytes {
        self.data
    }

    /// Computes the BLAKE3 digest of the chunk data.
    #[cfg(feature = "hash-blake3")]
    pub fn strong_hash(&self) -> ChunkHash {
        crate::hash::digest(&self.data)
    }
}

impl fmt::Display for OwnedChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.as_chunk(), f)
    }
}
