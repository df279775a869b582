//! Construction-time errors
//!
//! Runtime queries never fail: not-ready, out-of-bounds and rejected moves are
//! answered with "not walkable". Only malformed map input is surfaced.

use thiserror::Error;

/// A region, wall or pixel buffer that cannot back a collision provider
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RegionError {
    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
    #[error("polygon has zero area")]
    ZeroArea,
    #[error("polyline needs at least 2 points, got {0}")]
    TooFewPoints(usize),
    #[error("non-finite coordinate at index {0}")]
    NonFinite(usize),
    #[error("region description has no outlines")]
    EmptyRegion,
    #[error("pixel buffer must be non-empty, got {width}x{height}")]
    EmptyBuffer { width: u32, height: u32 },
    #[error("pixel buffer of {width}x{height} does not fit in memory")]
    BufferTooLarge { width: u32, height: u32 },
    #[error("pixel buffer of {width}x{height} needs {expected} bytes, got {actual}")]
    BufferLength {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("pixel buffer is {actual_width}x{actual_height}, map expects {width}x{height}")]
    SizeMismatch {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },
    #[error("grid must have equally long, non-empty rows")]
    RaggedGrid,
    #[error("cell size must be positive and finite, got {0}")]
    BadCellSize(f32),
    #[error("wall threshold must be finite, got {0}")]
    BadWallThreshold(f32),
    #[error("failed to parse SVG: {0}")]
    Svg(String),
}
