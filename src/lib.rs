//! Spatial tile organizer and navigator for folders of point-cloud files
//!
//! Per-file bounding boxes define a global frame that is cut into a grid of
//! uniform tiles. Each dataset lands in exactly one tile; a navigator moves
//! across the grid and a resident set manager plans which datasets must be
//! loaded for the active tile.

#![forbid(unsafe_code)]

/// Input/output operations, configuration, and error handling
pub mod io;
/// Navigation across the tile grid
pub mod navigation;
/// Resident set planning for the active tile
pub mod residency;
/// Session orchestration over external collaborators
pub mod session;
/// Spatial frame, tile coordinates, bucketing, and the tile store
pub mod spatial;

pub use io::error::{ExtractionError, GridError, LoadError, Result};
