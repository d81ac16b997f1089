//! Error types for gearcdc.

use std::fmt;

/// Errors that can occur during chunking operations.
#[derive(Debug)]
pub enum ChunkError {
    /// An I/O error occurred while reading input data.
    ///
    /// The chunker that returned it is still usable; calling
    /// `next_chunk()` again retries the read.
    Io(std::io::Error),

    /// The configuration was rejected at construction.
    InvalidConfig(ConfigError),
}

/// Reasons a [`ChunkConfig`](crate::ChunkConfig) is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `min_size` was zero.
    MinSizeZero,

    /// `target_size` was not strictly greater than `min_size`.
    TargetSizeNotGreaterThanMin {
        /// The configured minimum size.
        min: u32,
        /// The configured target size.
        target: u32,
    },

    /// `max_size` was not strictly greater than `target_size`.
    MaxSizeNotGreaterThanTarget {
        /// The configured target size.
        target: u32,
        /// The configured maximum size.
        max: u32,
    },

    /// `normalization_level` was above 8.
    NormalizationLevelOutOfRange {
        /// The rejected level.
        level: u8,
    },

    /// An explicit buffer size of zero was given.
    BufferSizeZero,
}

impl fmt::Display for ChunkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkError::Io(e) => write!(f, "io error: {}", e),
            ChunkError::InvalidConfig(e) => write!(f, "invalid config: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MinSizeZero => write!(f, "min_size must be greater than 0"),
            ConfigError::TargetSizeNotGreaterThanMin { min, target } => write!(
                f,
                "target_size ({}) must be greater than min_size ({})",
                target, min
            ),
            ConfigError::MaxSizeNotGreaterThanTarget { target, max } => write!(
                f,
                "max_size ({}) must be greater than target_size ({})",
                max, target
            ),
            ConfigError::NormalizationLevelOutOfRange { level } => {
                write!(f, "normalization_level must be between 0 and 8, got {}", level)
            }
            ConfigError::BufferSizeZero => write!(f, "buffer_size must be greater than 0"),
        }
    }
}

impl std::error::Error for ChunkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChunkError::Io(e) => Some(e),
            ChunkError::InvalidConfig(e) => Some(e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ChunkError {
    fn from(e: std::io::Error) -> Self {
        ChunkError::Io(e)
    }
}

impl From<ConfigError> for ChunkError {
    fn from(e: ConfigError) -> Self {
        ChunkError::InvalidConfig(e)
    }
}
