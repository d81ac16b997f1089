//! Internal buffer management for streaming.
//!
//! The streaming chunker reads into one fixed arena and slides the
//! unconsumed tail back to the front before each refill. It is an
//! implementation detail and not part of the public API.

mod window;

pub(crate) use window::Window;
