//! gearcdc
//!
//! Gear-hash content-defined chunking (CDC) for Rust.
//!
//! `gearcdc` splits a byte stream into variable-sized chunks whose boundaries
//! depend only on the content, so an insertion early in a file shifts a few
//! chunk boundaries instead of all of them. It is a small primitive for:
//!
//! - deduplication
//! - delta synchronization
//! - content-addressable storage
//!
//! Boundaries are found with a Gear rolling hash and FastCDC-style
//! normalized chunking: a looser mask (fewer bits, easier to match) before
//! the normalization threshold and a stricter one after it pull chunk sizes
//! toward the target.
//!
//! The crate has three layers:
//!
//! - [`BoundaryScanner`] - Resumable boundary detection over caller-supplied windows
//! - [`StreamChunker`] - Buffered chunking of any [`std::io::Read`] source
//! - [`ChunkerPool`] / [`ScannerPool`] - Thread-safe reuse of both
//!
//! # Example
//!
//! ```no_run
//! use std::fs::File;
//! use gearcdc::{ChunkConfig, ChunkError, StreamChunker};
//!
//! fn main() -> Result<(), ChunkError> {
//!     let file = File::open("data.bin")?;
//!     let mut chunker = StreamChunker::new(file, ChunkConfig::default())?;
//!
//!     while let Some(chunk) = chunker.next_chunk()? {
//!         println!("chunk {} bytes @ {}", chunk.length, chunk.offset);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Scanning windows directly
//!
//! ```
//! use gearcdc::{BoundaryScanner, ChunkConfig};
//!
//! let config = ChunkConfig::new(16, 64, 256)?;
//! let mut scanner = BoundaryScanner::new(&config)?;
//!
//! let data = vec![0u8; 1000];
//! let result = scanner.scan(&data);
//! assert!(result.found);
//! assert_eq!(result.offset, 256);
//! # Ok::<(), gearcdc::ChunkError>(())
//! ```
//!
//! # Features
//!
//! - `hash-blake3` (default) - BLAKE3 digests via `Chunk::strong_hash`

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cdc;
mod chunk;
mod chunker;
mod config;
mod error;
mod pool;

mod buffer; // internal sliding window
mod hash; // internal blake3 impl

pub use cdc::{BoundaryScanner, GearTable, RollingState, ScanResult};
pub use chunk::{Chunk, ChunkHash, OwnedChunk};
pub use chunker::{OwnedChunks, StreamChunker};
pub use config::{
    ChunkConfig, DEFAULT_MAX_SIZE, DEFAULT_MIN_SIZE, DEFAULT_NORMALIZATION_LEVEL,
    DEFAULT_TARGET_SIZE, MAX_NORMALIZATION_LEVEL,
};
pub use error::{ChunkError, ConfigError};
pub use pool::{ChunkerPool, DEFAULT_MAX_IDLE, ScannerPool};
