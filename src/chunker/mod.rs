//! Streaming chunker over byte sources.
//!
//! - [`StreamChunker`] - Buffered `Read` wrapper yielding borrowed chunks
//! - [`OwnedChunks`] - Iterator adapter yielding owned chunks

mod stream;

pub use stream::{OwnedChunks, StreamChunker};
pub(crate) use stream::StreamState;
