//! Resumable Gear-hash boundary scanner.
//!
//! # Algorithm Overview
//!
//! The scanner walks a chunk in four regimes selected by the number of bytes
//! consumed since the last boundary (`position`):
//!
//! - **Skip** `[0, min_size)`: bytes are consumed without hashing. No chunk
//!   can end here, so hashing them would be wasted work.
//! - **Normalized** `[min_size, normalized_threshold)`: cut when
//!   `fingerprint & mask_small == 0`.
//! - **Standard** `[normalized_threshold, max_size)`: cut when
//!   `fingerprint & mask_large == 0`. One more mask bit halves the cut
//!   probability, so chunk sizes cluster around the target.
//! - **Hard limit**: when `position` reaches `max_size` without a match, the
//!   chunk is cut there.
//!
//! Each hashed byte updates `fingerprint = (fingerprint << 1) + table[byte]`.
//! Old bytes shift out of the 64-bit word on their own, and the accumulator
//! restarts from zero at each boundary, so nothing has to be subtracted.
//!
//! # References
//!
//! Based on "FastCDC: A Fast and Efficient Content-Defined Chunking Approach for Data Deduplication"
//! by Wen Xia et al., USENIX ATC 2016.

use crate::cdc::GearTable;
use crate::config::ChunkConfig;
use crate::error::ChunkError;

/// Rolling hash state carried between [`BoundaryScanner::scan`] calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RollingState {
    /// Current Gear fingerprint.
    pub fingerprint: u64,

    /// Bytes consumed since the last boundary.
    pub position: u32,
}

/// Outcome of a single [`BoundaryScanner::scan`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScanResult {
    /// If `found`, the index in the scanned window just past the boundary
    /// byte (the chunk ends at `window[..offset]`). Otherwise the number of
    /// bytes consumed, which is the whole window.
    pub offset: usize,

    /// Fingerprint after the last hashed byte.
    pub fingerprint: u64,

    /// Whether a boundary was found in this window.
    pub found: bool,
}

impl ScanResult {
    /// Returns the boundary offset, if one was found.
    pub fn boundary(&self) -> Option<usize> {
        self.found.then_some(self.offset)
    }
}

/// Size thresholds and masks derived from a [`ChunkConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Thresholds {
    min: u32,
    normalized: u32,
    max: u32,
    mask_small: u64,
    mask_large: u64,
}

impl Thresholds {
    fn from_config(config: &ChunkConfig) -> Self {
        Self {
            min: config.min_size(),
            normalized: config.normalized_threshold(),
            max: config.max_size(),
            mask_small: config.mask_small(),
            mask_large: config.mask_large(),
        }
    }
}

/// Low-level content-defined boundary detector.
///
/// A `BoundaryScanner` owns its gear table and rolling state. It never
/// allocates after construction and never touches shared mutable state, so
/// one scanner per thread or stream needs no locking.
///
/// Scanning is resumable: feed a chunk in as many windows as convenient and
/// the boundary lands on the same byte as if it had arrived in one piece.
///
/// The scanner does **not** reset itself after reporting a boundary. Call
/// [`reset`](Self::reset) before scanning the bytes that follow it.
///
/// # Example
///
/// ```
/// use gearcdc::{BoundaryScanner, ChunkConfig};
///
/// let config = ChunkConfig::new(64, 256, 1024)?;
/// let mut scanner = BoundaryScanner::new(&config)?;
///
/// let data = vec![0u8; 4096];
/// let mut rest = &data[..];
/// let mut lengths = Vec::new();
/// while !rest.is_empty() {
///     let result = scanner.scan(rest);
///     if !result.found {
///         lengths.push(rest.len());
///         break;
///     }
///     lengths.push(result.offset);
///     rest = &rest[result.offset..];
///     scanner.reset();
/// }
/// assert_eq!(lengths.iter().sum::<usize>(), data.len());
/// assert!(lengths.iter().all(|&len| len <= 1024));
/// # Ok::<(), gearcdc::ChunkError>(())
/// ```
#[derive(Debug, Clone)]
pub struct BoundaryScanner {
    table: GearTable,
    state: RollingState,
    thresholds: Thresholds,
    config: ChunkConfig,
}

impl BoundaryScanner {
    /// Creates a scanner for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] if the configuration is invalid.
    pub fn new(config: &ChunkConfig) -> Result<Self, ChunkError> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    /// Builds a scanner from a configuration that has already passed
    /// [`ChunkConfig::validate`].
    pub(crate) fn from_validated(config: &ChunkConfig) -> Self {
        Self {
            table: GearTable::new(config.seed()),
            state: RollingState::default(),
            thresholds: Thresholds::from_config(config),
            config: *config,
        }
    }

    /// Resets the rolling state to `{fingerprint: 0, position: 0}`.
    pub fn reset(&mut self) {
        self.state = RollingState::default();
    }

    /// Scans `window`, continuing from the current state.
    ///
    /// Stops at the first byte where a boundary condition holds and reports
    /// `found = true` with `offset` just past that byte. If the window runs
    /// out first, the state is kept for the next call and `offset` equals
    /// `window.len()`.
    ///
    /// When the hard limit forces a cut, the reported fingerprint includes
    /// the last byte of the chunk (the one at position `max_size - 1`).
    ///
    /// After a boundary the state keeps the boundary fingerprint and the
    /// chunk length as its position until [`reset`](Self::reset) is called.
    pub fn scan(&mut self, window: &[u8]) -> ScanResult {
        scan_window(&self.thresholds, &self.table, &mut self.state, window)
    }

    /// Returns the current rolling state.
    pub fn state(&self) -> RollingState {
        self.state
    }

    /// Returns the number of bytes consumed since the last reset.
    pub fn position(&self) -> u32 {
        self.state.position
    }

    /// Returns the current fingerprint.
    pub fn fingerprint(&self) -> u64 {
        self.state.fingerprint
    }

    /// Returns the minimum chunk size.
    pub fn min_size(&self) -> u32 {
        self.thresholds.min
    }

    /// Returns the position where the large mask takes over.
    pub fn normalized_threshold(&self) -> u32 {
        self.thresholds.normalized
    }

    /// Returns the maximum chunk size.
    pub fn max_size(&self) -> u32 {
        self.thresholds.max
    }

    /// Returns the gear table in use.
    pub fn table(&self) -> &GearTable {
        &self.table
    }

    /// Returns the configuration this scanner was built from.
    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }
}

fn scan_window(
    t: &Thresholds,
    table: &[u64; 256],
    state: &mut RollingState,
    window: &[u8],
) -> ScanResult {
    let mut fp = state.fingerprint;
    let mut pos = state.position;
    let mut rest = window;

    if pos < t.min {
        let skip = rest.len().min((t.min - pos) as usize);
        pos += skip as u32;
        rest = &rest[skip..];
    }

    if pos < t.normalized && !rest.is_empty() {
        let span = rest.len().min((t.normalized - pos) as usize);
        if let Some(i) = find_cut(table, &mut fp, &rest[..span], t.mask_small) {
            let offset = window.len() - rest.len() + i + 1;
            return cut(state, fp, pos + (i + 1) as u32, offset);
        }
        pos += span as u32;
        rest = &rest[span..];
    }

    if pos < t.max && !rest.is_empty() {
        let span = rest.len().min((t.max - pos) as usize);
        if let Some(i) = find_cut(table, &mut fp, &rest[..span], t.mask_large) {
            let offset = window.len() - rest.len() + i + 1;
            return cut(state, fp, pos + (i + 1) as u32, offset);
        }
        pos += span as u32;
        rest = &rest[span..];
    }

    let consumed = window.len() - rest.len();
    if pos >= t.max {
        return cut(state, fp, pos, consumed);
    }

    state.fingerprint = fp;
    state.position = pos;
    ScanResult {
        offset: consumed,
        fingerprint: fp,
        found: false,
    }
}

#[inline(always)]
fn cut(state: &mut RollingState, fp: u64, pos: u32, offset: usize) -> ScanResult {
    state.fingerprint = fp;
    state.position = pos;
    ScanResult {
        offset,
        fingerprint: fp,
        found: true,
    }
}

/// Hashes `bytes` into `fp` and returns the index of the first byte after
/// which `fp & mask == 0`.
#[inline(always)]
fn find_cut(table: &[u64; 256], fp: &mut u64, bytes: &[u8], mask: u64) -> Option<usize> {
    let mut h = *fp;
    let hit = bytes.iter().position(|&b| {
        h = (h << 1).wrapping_add(table[b as usize]);
        h & mask == 0
    });
    *fp = h;
    hit
}
