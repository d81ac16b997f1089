//! BLAKE3-based chunk hashing.

use crate::chunk::ChunkHash;

/// Hashes `data` in one shot.
pub(crate) fn digest(data: &[u8]) -> ChunkHash {
    ChunkHash::new(blake3::hash(data).into())
}
