//! Spatial data structures and dataset bucketing
//!
//! This module contains spatial-related functionality including:
//! - Dataset descriptors and bounding boxes
//! - Tile coordinates and grid dimensions
//! - Grid organization under the dense and fixed 3x3 policies
//! - The read-only tile store

/// Dataset descriptors, bounding boxes, and the global grid frame
pub mod bounds;
/// Tile coordinates, grid dimensions, and navigation directions
pub mod coordinate;
/// Frame computation and dataset-to-tile assignment
pub mod organizer;
/// Read-only tile catalog
pub mod store;

pub use coordinate::{Direction, TileCoordinate};
pub use organizer::{BucketingPolicy, organize};
pub use store::TileStore;
