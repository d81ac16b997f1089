//! Configuration for chunking behavior.
//!
//! [`ChunkConfig`] controls chunk size bounds, normalization, the gear table
//! seed and the streaming buffer size. It is a plain `Copy` value; validation
//! runs when a scanner, chunker or pool is built from it.
//!
//! # Example
//!
//! ```
//! use gearcdc::ChunkConfig;
//!
//! // Custom chunk sizes
//! let config = ChunkConfig::new(4096, 16384, 65536)?;
//!
//! // Builder pattern
//! let config = ChunkConfig::default()
//!     .with_target_size(32 * 1024)
//!     .with_normalization_level(3)
//!     .with_seed(42);
//! config.validate()?;
//!
//! # Ok::<(), gearcdc::ChunkError>(())
//! ```

use crate::error::{ChunkError, ConfigError};

/// Default minimum chunk size (16 KiB).
pub const DEFAULT_MIN_SIZE: u32 = 16 * 1024;

/// Default target chunk size (64 KiB).
pub const DEFAULT_TARGET_SIZE: u32 = 64 * 1024;

/// Default maximum chunk size (256 KiB).
pub const DEFAULT_MAX_SIZE: u32 = 256 * 1024;

/// Default normalization level.
pub const DEFAULT_NORMALIZATION_LEVEL: u8 = 2;

/// Highest accepted normalization level.
pub const MAX_NORMALIZATION_LEVEL: u8 = 8;

/// Configuration for content-defined chunking.
///
/// # Size Constraints
///
/// `0 < min_size < target_size < max_size`.
///
/// - `min_size` - no chunk except the last of a stream is shorter
/// - `target_size` - its bit length sets the boundary masks
/// - `max_size` - no chunk is longer; a cut is forced here
///
/// # Normalization
///
/// Between `min_size` and [`normalized_threshold`](Self::normalized_threshold)
/// the scanner tests the hash against a mask with one fewer bit, so cuts are
/// about twice as likely there. Level `N` in `1..=8` makes that region
/// `(target_size - min_size) >> N` bytes wide. Level 0 disables
/// normalization: the region has zero width and only the large mask is used.
/// Levels above 8 are rejected.
///
/// # Seed
///
/// Seed 0 uses the shared canonical gear table. Any other seed derives a
/// private table per scanner (2 KiB each), which decorrelates boundaries
/// between domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkConfig {
    min_size: u32,
    target_size: u32,
    max_size: u32,
    normalization_level: u8,
    seed: u64,
    buffer_size: Option<usize>,
}

impl ChunkConfig {
    /// Creates a new configuration with the specified size bounds and
    /// default normalization, seed and buffer size.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] if `min_size` is zero or the
    /// sizes are not strictly increasing.
    ///
    /// # Example
    ///
    /// ```
    /// use gearcdc::ChunkConfig;
    ///
    /// let config = ChunkConfig::new(4096, 16384, 65536)?;
    /// assert_eq!(config.min_size(), 4096);
    /// assert!(ChunkConfig::new(4096, 4096, 65536).is_err());
    /// # Ok::<(), gearcdc::ChunkError>(())
    /// ```
    pub fn new(min_size: u32, target_size: u32, max_size: u32) -> Result<Self, ChunkError> {
        let config = Self {
            min_size,
            target_size,
            max_size,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the minimum chunk size.
    ///
    /// Note: This does not validate the configuration. Use [`ChunkConfig::validate`]
    /// to check if the configuration is valid.
    pub fn with_min_size(mut self, size: u32) -> Self {
        self.min_size = size;
        self
    }

    /// Sets the target chunk size.
    pub fn with_target_size(mut self, size: u32) -> Self {
        self.target_size = size;
        self
    }

    /// Sets the maximum chunk size.
    pub fn with_max_size(mut self, size: u32) -> Self {
        self.max_size = size;
        self
    }

    /// Sets the normalization level (0 to 8).
    pub fn with_normalization_level(mut self, level: u8) -> Self {
        self.normalization_level = level;
        self
    }

    /// Sets the gear table seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the streaming buffer size.
    ///
    /// Values below `max_size` are raised to `max_size`; zero is rejected.
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = Some(size);
        self
    }

    /// Returns the minimum chunk size.
    pub fn min_size(&self) -> u32 {
        self.min_size
    }

    /// Returns the target chunk size.
    pub fn target_size(&self) -> u32 {
        self.target_size
    }

    /// Returns the maximum chunk size.
    pub fn max_size(&self) -> u32 {
        self.max_size
    }

    /// Returns the normalization level.
    pub fn normalization_level(&self) -> u8 {
        self.normalization_level
    }

    /// Returns the gear table seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the explicitly configured buffer size, if any.
    pub fn buffer_size(&self) -> Option<usize> {
        self.buffer_size
    }

    /// Returns the buffer size a [`StreamChunker`](crate::StreamChunker)
    /// actually allocates: the configured size (default `2 * max_size`),
    /// raised to at least `max_size`.
    pub fn effective_buffer_size(&self) -> usize {
        let max = self.max_size as usize;
        self.buffer_size.unwrap_or(max.saturating_mul(2)).max(max)
    }

    /// Number of low bits in the large mask: the bit length of
    /// `target_size` minus one.
    pub fn mask_bits(&self) -> u32 {
        (u32::BITS - self.target_size.leading_zeros()).saturating_sub(1)
    }

    /// Mask tested in the standard region `[normalized_threshold, max_size)`.
    pub fn mask_large(&self) -> u64 {
        (1u64 << self.mask_bits()) - 1
    }

    /// Mask tested in the normalized region `[min_size, normalized_threshold)`.
    ///
    /// One bit fewer than [`mask_large`](Self::mask_large).
    pub fn mask_small(&self) -> u64 {
        match self.mask_bits() {
            0 => 0,
            bits => (1u64 << (bits - 1)) - 1,
        }
    }

    /// Position at which the scanner switches from the small to the large mask.
    ///
    /// Equal to `min_size` when normalization is disabled (level 0).
    pub fn normalized_threshold(&self) -> u32 {
        if self.normalization_level == 0 {
            return self.min_size;
        }
        let span = self.target_size.saturating_sub(self.min_size);
        let level = u32::from(self.normalization_level.min(MAX_NORMALIZATION_LEVEL));
        self.min_size + (span >> level)
    }

    /// Validates the current configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use gearcdc::ChunkConfig;
    ///
    /// let config = ChunkConfig::default().with_min_size(0);
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ChunkError> {
        self.check().map_err(ChunkError::from)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.min_size == 0 {
            return Err(ConfigError::MinSizeZero);
        }

        if self.target_size <= self.min_size {
            return Err(ConfigError::TargetSizeNotGreaterThanMin {
                min: self.min_size,
                target: self.target_size,
            });
        }

        if self.max_size <= self.target_size {
            return Err(ConfigError::MaxSizeNotGreaterThanTarget {
                target: self.target_size,
                max: self.max_size,
            });
        }

        if self.normalization_level > MAX_NORMALIZATION_LEVEL {
            return Err(ConfigError::NormalizationLevelOutOfRange {
                level: self.normalization_level,
            });
        }

        if self.buffer_size == Some(0) {
            return Err(ConfigError::BufferSizeZero);
        }

        Ok(())
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_MIN_SIZE,
            target_size: DEFAULT_TARGET_SIZE,
            max_size: DEFAULT_MAX_SIZE,
            normalization_level: DEFAULT_NORMALIZATION_LEVEL,
            seed: 0,
            buffer_size: None,
        }
    }
}
