//! Read-only catalog of which datasets live in which tile
//!
//! Only occupied tiles are kept, keyed by coordinate, each listing dataset
//! indices in assignment order. The first index of a tile is its primary
//! occupant. Grid dimensions are tracked separately, so a sparse collection
//! spread over a very wide grid costs no more than a compact one. A store is
//! built once by the organizer and never mutated; re-analysis produces a
//! fresh store.

use std::collections::BTreeMap;

use crate::spatial::bounds::{Dataset, DatasetId};
use crate::spatial::coordinate::{GridDimensions, TileCoordinate};

/// Mapping from tile coordinate to the datasets assigned to it
#[derive(Debug, Clone, PartialEq)]
pub struct TileStore {
    datasets: Vec<Dataset>,
    tiles: BTreeMap<TileCoordinate, Vec<usize>>,
    dimensions: GridDimensions,
}

impl TileStore {
    /// Build a store from datasets and their per-dataset tile assignment
    ///
    /// `assignments[i]` is the tile of `datasets[i]`. Assignments outside
    /// `dimensions` are dropped, so callers must clamp beforehand.
    pub(crate) fn from_assignments(
        datasets: Vec<Dataset>,
        assignments: &[TileCoordinate],
        dimensions: GridDimensions,
    ) -> Self {
        let mut tiles: BTreeMap<TileCoordinate, Vec<usize>> = BTreeMap::new();
        for (index, &coord) in assignments.iter().enumerate() {
            if dimensions.contains(coord) {
                tiles.entry(coord).or_default().push(index);
            }
        }

        Self {
            datasets,
            tiles,
            dimensions,
        }
    }

    /// Datasets assigned to `coord` in assignment order; empty when out of range
    pub fn get(&self, coord: TileCoordinate) -> Vec<&Dataset> {
        self.indices(coord)
            .iter()
            .filter_map(|&index| self.datasets.get(index))
            .collect()
    }

    /// Dataset indices assigned to `coord`; empty when out of range
    pub fn indices(&self, coord: TileCoordinate) -> &[usize] {
        self.tiles.get(&coord).map_or(&[][..], Vec::as_slice)
    }

    /// Whether `coord` lies inside the grid
    pub const fn has(&self, coord: TileCoordinate) -> bool {
        self.dimensions.contains(coord)
    }

    /// Whether `coord` lies inside the grid and holds at least one dataset
    pub fn is_occupied(&self, coord: TileCoordinate) -> bool {
        !self.indices(coord).is_empty()
    }

    /// Grid width and height in tiles
    pub const fn bounds(&self) -> GridDimensions {
        self.dimensions
    }

    /// All assigned datasets, indexable by the values `indices` returns
    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    /// Dataset at `index`
    pub fn dataset(&self, index: usize) -> Option<&Dataset> {
        self.datasets.get(index)
    }

    /// Identifier of the dataset at `index`
    pub fn dataset_id(&self, index: usize) -> Option<&DatasetId> {
        self.datasets.get(index).map(Dataset::id)
    }

    /// Tile holding the dataset at `index`
    pub fn tile_of(&self, index: usize) -> Option<TileCoordinate> {
        self.occupied()
            .find(|(_, indices)| indices.contains(&index))
            .map(|(coord, _)| coord)
    }

    /// Non-empty tiles with their dataset indices, column-major
    pub fn occupied(&self) -> impl Iterator<Item = (TileCoordinate, &[usize])> + '_ {
        self.tiles
            .iter()
            .map(|(&coord, indices)| (coord, indices.as_slice()))
    }

    /// Number of non-empty tiles
    pub fn occupied_count(&self) -> usize {
        self.tiles.len()
    }
}
