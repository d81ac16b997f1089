//! Buffered streaming chunker.
//!
//! [`StreamChunker`] turns any [`std::io::Read`] source into a sequence of
//! content-defined chunks:
//!
//! - `next_chunk()` - Returns the next chunk borrowed from the internal buffer
//! - `reset()` - Rebinds to a new source, keeping the buffer and gear table
//!
//! # Example
//!
//! ```
//! use gearcdc::{ChunkConfig, StreamChunker};
//! use std::io::Cursor;
//!
//! let data = vec![7u8; 100_000];
//! let config = ChunkConfig::new(1024, 4096, 16384)?;
//! let mut chunker = StreamChunker::new(Cursor::new(&data), config)?;
//!
//! let mut total = 0;
//! while let Some(chunk) = chunker.next_chunk()? {
//!     assert_eq!(chunk.offset, total);
//!     total += chunk.len() as u64;
//! }
//! assert_eq!(total, data.len() as u64);
//! # Ok::<(), gearcdc::ChunkError>(())
//! ```

use std::io::Read;

use tracing::{debug, trace};

use crate::buffer::Window;
use crate::cdc::BoundaryScanner;
use crate::chunk::{Chunk, OwnedChunk};
use crate::config::ChunkConfig;
use crate::error::ChunkError;

/// Everything a [`StreamChunker`] owns except its source.
///
/// This is what the pool recycles: the buffer and gear table survive, the
/// source does not.
#[derive(Debug)]
pub(crate) struct StreamState {
    config: ChunkConfig,
    scanner: BoundaryScanner,
    window: Window,
    offset: u64,
    eof: bool,
}

impl StreamState {
    /// Allocates state for a configuration that has already been validated.
    pub(crate) fn from_validated(config: &ChunkConfig) -> Self {
        Self {
            config: *config,
            scanner: BoundaryScanner::from_validated(config),
            window: Window::with_capacity(config.effective_buffer_size()),
            offset: 0,
            eof: false,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.scanner.reset();
        self.window.clear();
        self.offset = 0;
        self.eof = false;
    }

    fn refill<R: Read>(&mut self, reader: &mut R) -> Result<(), ChunkError> {
        if self.eof || self.window.pending_len() >= self.config.max_size() as usize {
            return Ok(());
        }

        let fill = self.window.fill_from(reader)?;
        trace!(
            read = fill.read,
            pending = self.window.pending_len(),
            eof = fill.eof,
            "refilled chunk buffer"
        );
        if fill.eof {
            self.eof = true;
            debug!(offset = self.offset, tail = self.window.pending_len(), "source exhausted");
        }
        Ok(())
    }

    fn next_chunk<R: Read>(&mut self, reader: &mut R) -> Result<Option<Chunk<'_>>, ChunkError> {
        self.refill(reader)?;

        let pending = self.window.pending();
        if pending.is_empty() {
            return Ok(None);
        }

        // With a fresh scanner, at least max_size pending bytes always yield
        // a cut, so a miss only happens on the tail of an exhausted source.
        let result = self.scanner.scan(pending);
        let len = if result.found {
            result.offset
        } else {
            pending.len()
        };

        let offset = self.offset;
        self.offset += len as u64;
        self.scanner.reset();

        Ok(Some(Chunk {
            offset,
            length: len as u32,
            fingerprint: result.fingerprint,
            data: self.window.consume(len),
        }))
    }
}

/// Streams content-defined chunks out of a byte source.
///
/// `StreamChunker` owns its source, a sliding buffer of at least `max_size`
/// bytes (default `2 * max_size`) and a [`BoundaryScanner`]. Each call to
/// [`next_chunk`](Self::next_chunk) tops the buffer up when fewer than
/// `max_size` bytes are pending, scans them, and hands out the next chunk as
/// a view into the buffer.
///
/// # Guarantees
///
/// - Chunk offsets start at 0 and are contiguous.
/// - Concatenated chunk data reproduces the input exactly.
/// - Every chunk is at most `max_size` bytes.
/// - Every chunk except possibly the last is longer than `min_size` bytes.
///
/// # Errors and retries
///
/// An I/O error from the source aborts that `next_chunk()` call only. Bytes
/// read before the error stay buffered, and calling `next_chunk()` again
/// resumes reading without dropping or duplicating data.
#[derive(Debug)]
pub struct StreamChunker<R> {
    reader: R,
    state: StreamState,
}

impl<R: Read> StreamChunker<R> {
    /// Creates a chunker over `reader`.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] if the configuration is invalid.
    pub fn new(reader: R, config: ChunkConfig) -> Result<Self, ChunkError> {
        config.validate()?;
        Ok(Self::from_state(reader, StreamState::from_validated(&config)))
    }

    /// Wraps recycled state, which must already be reset.
    pub(crate) fn from_state(reader: R, state: StreamState) -> Self {
        Self { reader, state }
    }

    /// Returns the next chunk, or `Ok(None)` once the source is exhausted
    /// and every buffered byte has been emitted.
    ///
    /// The returned chunk borrows the internal buffer; copy it with
    /// [`Chunk::to_owned_chunk`] to keep it past the next call.
    pub fn next_chunk(&mut self) -> Result<Option<Chunk<'_>>, ChunkError> {
        self.state.next_chunk(&mut self.reader)
    }

    /// Rebinds the chunker to a new source and restores its initial state
    /// without reallocating the buffer or gear table.
    ///
    /// The previous source is dropped.
    pub fn reset(&mut self, reader: R) {
        self.reader = reader;
        self.state.reset();
    }

    /// Converts the chunker into an iterator of owned chunks.
    pub fn into_owned_iter(self) -> OwnedChunks<R> {
        OwnedChunks {
            chunker: self,
            finished: false,
        }
    }
}

impl<R> StreamChunker<R> {
    /// Returns the absolute offset of the next chunk.
    pub fn offset(&self) -> u64 {
        self.state.offset
    }

    /// Returns the configuration used by this chunker.
    pub fn config(&self) -> &ChunkConfig {
        &self.state.config
    }

    /// Returns the size of the internal buffer.
    pub fn buffer_capacity(&self) -> usize {
        self.state.window.capacity()
    }

    /// Returns a reference to the underlying source.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Consumes the chunker and returns the source.
    ///
    /// Bytes already buffered but not yet emitted are lost.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Splits off the source and returns the reusable state, reset.
    pub(crate) fn into_state(self) -> StreamState {
        let Self { reader, mut state } = self;
        drop(reader);
        state.reset();
        state
    }
}

/// An iterator over [`OwnedChunk`]s, created by
/// [`StreamChunker::into_owned_iter`].
///
/// Each chunk's data is copied into its own [`bytes::Bytes`]. After the
/// first error the iterator is finished; use
/// [`StreamChunker::next_chunk`] directly to retry failed reads.
#[derive(Debug)]
pub struct OwnedChunks<R> {
    chunker: StreamChunker<R>,
    finished: bool,
}

impl<R> OwnedChunks<R> {
    /// Returns the underlying chunker.
    pub fn into_inner(self) -> StreamChunker<R> {
        self.chunker
    }
}

impl<R: Read> Iterator for OwnedChunks<R> {
    type Item = Result<OwnedChunk, ChunkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.chunker.next_chunk() {
            Ok(Some(chunk)) => Some(Ok(chunk.to_owned_chunk())),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: Read> std::iter::FusedIterator for OwnedChunks<R> {}
