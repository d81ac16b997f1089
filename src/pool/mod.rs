//! Instance pools for short-lived chunking work.
//!
//! Building a [`StreamChunker`] allocates its buffer (twice `max_size` by
//! default) and, for non-zero seeds, derives a gear table. When many small
//! streams are chunked concurrently, the pools recycle that setup:
//!
//! - [`ChunkerPool`] - Recycles [`StreamChunker`] buffers and tables
//! - [`ScannerPool`] - Recycles bare [`BoundaryScanner`]s
//!
//! A pooled instance belongs to exactly one caller between `acquire` and
//! `release`. Only the free list itself is shared, and `acquire` and
//! `release` never block on it: an empty or contended list makes `acquire`
//! build a new instance, and a full or contended list makes `release` drop
//! the instance. The `idle()` counts do wait for the lock.
//!
//! # Example
//!
//! ```
//! use gearcdc::{ChunkConfig, ChunkerPool};
//! use std::io::Cursor;
//!
//! let pool = ChunkerPool::new(ChunkConfig::new(64, 256, 1024)?)?;
//!
//! for input in [vec![1u8; 5000], vec![2u8; 300]] {
//!     let mut chunker = pool.acquire(Cursor::new(input));
//!     while let Some(chunk) = chunker.next_chunk()? {
//!         let _ = chunk.length;
//!     }
//!     pool.release(chunker);
//! }
//! assert_eq!(pool.idle(), 1);
//! # Ok::<(), gearcdc::ChunkError>(())
//! ```

mod free_list;

use std::io::Read;

use tracing::trace;

use crate::cdc::BoundaryScanner;
use crate::chunker::{StreamChunker, StreamState};
use crate::config::ChunkConfig;
use crate::error::ChunkError;

use free_list::FreeList;

/// Default number of idle instances a pool keeps.
pub const DEFAULT_MAX_IDLE: usize = 16;

/// A thread-safe pool of [`StreamChunker`] state.
///
/// The pool is not tied to a source type: the same pool can hand out a
/// `StreamChunker<File>` and a `StreamChunker<&[u8]>`.
#[derive(Debug)]
pub struct ChunkerPool {
    config: ChunkConfig,
    free: FreeList<StreamState>,
}

impl ChunkerPool {
    /// Creates a pool keeping up to [`DEFAULT_MAX_IDLE`] idle chunkers.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] if the configuration is invalid.
    /// The configuration is checked once here, so [`acquire`](Self::acquire)
    /// cannot fail.
    pub fn new(config: ChunkConfig) -> Result<Self, ChunkError> {
        Self::with_max_idle(config, DEFAULT_MAX_IDLE)
    }

    /// Creates a pool keeping up to `max_idle` idle chunkers.
    pub fn with_max_idle(config: ChunkConfig, max_idle: usize) -> Result<Self, ChunkError> {
        config.validate()?;
        Ok(Self {
            config,
            free: FreeList::new(max_idle),
        })
    }

    /// Returns a chunker bound to `reader`, recycled when possible.
    pub fn acquire<R: Read>(&self, reader: R) -> StreamChunker<R> {
        let state = self.free.pop().unwrap_or_else(|| {
            trace!("chunker pool miss");
            StreamState::from_validated(&self.config)
        });
        StreamChunker::from_state(reader, state)
    }

    /// Returns a chunker to the pool.
    ///
    /// The chunker's source is dropped immediately, whether or not the
    /// instance is kept. Chunkers built with a different configuration are
    /// not kept.
    pub fn release<R>(&self, chunker: StreamChunker<R>) {
        if *chunker.config() != self.config {
            trace!("dropping chunker with foreign config");
            return;
        }
        if self.free.push(chunker.into_state()).is_err() {
            trace!("chunker pool full or busy, dropping instance");
        }
    }

    /// Number of idle chunkers currently held.
    ///
    /// This briefly waits for the free list lock.
    pub fn idle(&self) -> usize {
        self.free.len()
    }

    /// Maximum number of idle chunkers kept.
    pub fn max_idle(&self) -> usize {
        self.free.max_idle()
    }

    /// Returns the configuration every pooled chunker uses.
    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }
}

/// A thread-safe pool of [`BoundaryScanner`]s.
///
/// Scanners are reset on the way in and on the way out.
#[derive(Debug)]
pub struct ScannerPool {
    config: ChunkConfig,
    free: FreeList<BoundaryScanner>,
}

impl ScannerPool {
    /// Creates a pool keeping up to [`DEFAULT_MAX_IDLE`] idle scanners.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] if the configuration is invalid.
    pub fn new(config: ChunkConfig) -> Result<Self, ChunkError> {
        Self::with_max_idle(config, DEFAULT_MAX_IDLE)
    }

    /// Creates a pool keeping up to `max_idle` idle scanners.
    pub fn with_max_idle(config: ChunkConfig, max_idle: usize) -> Result<Self, ChunkError> {
        config.validate()?;
        Ok(Self {
            config,
            free: FreeList::new(max_idle),
        })
    }

    /// Returns a reset scanner, recycled when possible.
    pub fn acquire(&self) -> BoundaryScanner {
        match self.free.pop() {
            Some(mut scanner) => {
                scanner.reset();
                scanner
            }
            None => {
                trace!("scanner pool miss");
                BoundaryScanner::from_validated(&self.config)
            }
        }
    }

    /// Returns a scanner to the pool.
    ///
    /// Scanners built with a different configuration are not kept.
    pub fn release(&self, mut scanner: BoundaryScanner) {
        if *scanner.config() != self.config {
            trace!("dropping scanner with foreign config");
            return;
        }
        scanner.reset();
        if self.free.push(scanner).is_err() {
            trace!("scanner pool full or busy, dropping instance");
        }
    }

    /// Number of idle scanners currently held.
    ///
    /// This briefly waits for the free list lock.
    pub fn idle(&self) -> usize {
        self.free.len()
    }

    /// Returns the configuration every pooled scanner uses.
    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }
}
