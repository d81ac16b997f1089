//! Chunk types.
//!
//! - [`Chunk`] - Borrowed chunk record with offset, length, fingerprint
//! - [`OwnedChunk`] - Retained chunk backed by `Bytes`
//! - [`ChunkHash`] - 32-byte strong content digest

mod data;
mod hash;

pub use data::{Chunk, OwnedChunk};
pub use hash::ChunkHash;
