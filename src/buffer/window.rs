//! Fixed-capacity sliding window over a byte source.

use std::io::{self, ErrorKind, Read};

/// Result of a [`Window::fill_from`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Fill {
    /// Bytes read by this call.
    pub read: usize,
    /// Whether the source reported end of stream.
    pub eof: bool,
}

/// A byte arena with a movable unconsumed region `[cursor, filled)`.
///
/// The arena is allocated once and never resized.
#[derive(Debug)]
pub(crate) struct Window {
    buf: Box<[u8]>,
    cursor: usize,
    filled: usize,
}

impl Window {
    /// Allocates a window of `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0u8; capacity].into_boxed_slice(),
            cursor: 0,
            filled: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// The unconsumed bytes.
    pub fn pending(&self) -> &[u8] {
        &self.buf[self.cursor..self.filled]
    }

    pub fn pending_len(&self) -> usize {
        self.filled - self.cursor
    }

    /// Marks `len` pending bytes as consumed and returns them.
    pub fn consume(&mut self, len: usize) -> &[u8] {
        debug_assert!(len <= self.pending_len());
        let start = self.cursor;
        self.cursor += len;
        &self.buf[start..self.cursor]
    }

    /// Drops all pending bytes, keeping the allocation.
    pub fn clear(&mut self) {
        self.cursor = 0;
        self.filled = 0;
    }

    /// Moves pending bytes to the front of the arena.
    fn compact(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.buf.copy_within(self.cursor..self.filled, 0);
        self.filled -= self.cursor;
        self.cursor = 0;
    }

    /// Compacts, then reads until the arena is full or `reader` returns
    /// `Ok(0)`.
    ///
    /// `Interrupted` reads are retried. On any other error the bytes already
    /// read stay pending, so a later call resumes without loss.
    pub fn fill_from<R: Read>(&mut self, reader: &mut R) -> io::Result<Fill> {
        self.compact();

        let mut read = 0;
        while self.filled < self.buf.len() {
            match reader.read(&mut self.buf[self.filled..]) {
                Ok(0) => return Ok(Fill { read, eof: true }),
                Ok(n) => {
                    self.filled += n;
                    read += n;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(Fill { read, eof: false })
    }
}
