//! Content-Defined Chunking (CDC) boundary detection.
//!
//! This module contains the core algorithm for identifying chunk boundaries
//! based on content patterns rather than fixed sizes.
//!
//! - [`GearTable`] - Gear hash lookup table (shared canonical or seeded)
//! - [`BoundaryScanner`] - Resumable normalized-chunking state machine

mod gear;
mod scanner;

pub use gear::GearTable;
pub use scanner::{BoundaryScanner, RollingState, ScanResult};
