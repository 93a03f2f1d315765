//! Error types for hilite-rs.

use thiserror::Error;

use crate::extent::Axis;

/// The main error type for hilite-rs operations.
///
/// Registry operations never fail; errors only come out of constructors
/// (extents, masks) and configuration loading.
#[derive(Error, Debug)]
pub enum HiliteError {
    /// An axis extent is not ordered as `min <= center <= max` or is not finite.
    #[error("invalid extent on axis {axis:?}: min={min}, center={center}, max={max}")]
    InvalidExtent {
        axis: Axis,
        min: f32,
        center: f32,
        max: f32,
    },

    /// Data size mismatch.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for hilite-rs operations.
pub type Result<T> = std::result::Result<T, HiliteError>;
