//! Strong hash implementations for chunk identity.
//!
//! Currently supports BLAKE3 via the `hash-blake3` feature.

#[cfg(feature = "hash-blake3")]
mod blake3;

#[cfg(feature = "hash-blake3")]
pub(crate) use self::blake3::digest;
