//! Directional movement across the tile grid
//!
//! The navigator holds the active tile and validates moves against the grid
//! bounds and, when configured, tile occupancy. It has no loading state:
//! loading is a side effect the session triggers after an accepted move.

use std::fmt;

use tracing::debug;

use crate::spatial::coordinate::{Direction, GridDimensions, TileCoordinate};
use crate::spatial::store::TileStore;

/// Why a move left the state unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Destination lies outside the grid
    OutOfBounds,
    /// Destination is in bounds but holds no datasets and empty tiles are disallowed
    EmptyTile,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds => f.write_str("destination is outside the grid"),
            Self::EmptyTile => f.write_str("destination tile is empty"),
        }
    }
}

/// Result of one move request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The navigator now sits on this tile
    Moved(TileCoordinate),
    /// The move was refused and the current tile is unchanged
    Rejected {
        /// Destination that was refused
        destination: TileCoordinate,
        /// Why it was refused
        reason: RejectReason,
    },
}

impl MoveOutcome {
    /// Whether the move was accepted
    pub const fn is_moved(&self) -> bool {
        matches!(self, Self::Moved(_))
    }
}

/// Current-tile state machine over a bounded grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    current: TileCoordinate,
    dimensions: GridDimensions,
    allow_empty_tile: bool,
}

impl Navigator {
    /// Start on `initial` within a grid of `dimensions`
    pub const fn new(
        initial: TileCoordinate,
        dimensions: GridDimensions,
        allow_empty_tile: bool,
    ) -> Self {
        Self {
            current: initial,
            dimensions,
            allow_empty_tile,
        }
    }

    /// Active tile
    pub const fn current(&self) -> TileCoordinate {
        self.current
    }

    /// Grid the navigator moves within
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Whether empty in-bounds tiles may be entered
    pub const fn allows_empty_tile(&self) -> bool {
        self.allow_empty_tile
    }

    /// Check a destination without moving
    ///
    /// # Errors
    ///
    /// Returns the [`RejectReason`] the move would be refused with
    pub fn check(
        &self,
        destination: TileCoordinate,
        store: &TileStore,
    ) -> Result<(), RejectReason> {
        if !self.dimensions.contains(destination) {
            return Err(RejectReason::OutOfBounds);
        }
        if !self.allow_empty_tile && !store.is_occupied(destination) {
            return Err(RejectReason::EmptyTile);
        }
        Ok(())
    }

    /// Move one tile in `direction` if the destination is allowed
    pub fn try_move(&mut self, direction: Direction, store: &TileStore) -> MoveOutcome {
        let destination = self.current.step(direction);

        match self.check(destination, store) {
            Ok(()) => {
                debug!(from = %self.current, to = %destination, %direction, "move accepted");
                self.current = destination;
                MoveOutcome::Moved(destination)
            }
            Err(reason) => {
                debug!(
                    from = %self.current,
                    to = %destination,
                    %direction,
                    %reason,
                    "move rejected"
                );
                MoveOutcome::Rejected {
                    destination,
                    reason,
                }
            }
        }
    }

    /// Directions whose moves would currently be accepted
    pub fn available_moves(&self, store: &TileStore) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|direction| self.check(self.current.step(*direction), store).is_ok())
            .collect()
    }
}
