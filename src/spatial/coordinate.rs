//! Integer tile addressing and navigation directions

use std::fmt;
use std::str::FromStr;

use crate::io::error::{GridError, invalid_parameter};

/// Cell address in the 2-D tile grid built over the world X/Y plane
///
/// Ordered by `x` then `y` so sorted collections iterate deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoordinate {
    /// Column, growing with world X
    pub x: i32,
    /// Row, growing with world Y
    pub y: i32,
}

impl TileCoordinate {
    /// Create a coordinate from its components
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbouring coordinate one step in `direction`
    ///
    /// Saturates at the `i32` limits; such coordinates are always outside
    /// any grid and get rejected by bounds checks.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl fmt::Display for TileCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Width and height of a tile grid in tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridDimensions {
    /// Number of columns
    pub width: usize,
    /// Number of rows
    pub height: usize,
}

impl GridDimensions {
    /// Create dimensions from a column and row count
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Check `0 <= x < width` and `0 <= y < height`
    pub const fn contains(&self, coord: TileCoordinate) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as usize) < self.width
            && (coord.y as usize) < self.height
    }

    /// Geometric centre tile, `(floor(width / 2), floor(height / 2))`
    pub const fn center(&self) -> TileCoordinate {
        TileCoordinate::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    /// Total number of tiles
    pub const fn tile_count(&self) -> usize {
        self.width * self.height
    }

    /// Every coordinate in the grid, column-major (`x` outer, `y` inner)
    pub fn coordinates(&self) -> impl Iterator<Item = TileCoordinate> + '_ {
        (0..self.width).flat_map(move |x| {
            (0..self.height).map(move |y| TileCoordinate::new(x as i32, y as i32))
        })
    }
}

impl fmt::Display for GridDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Navigation direction across the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Direction {
    /// Towards smaller `x`
    Left,
    /// Towards larger `x`
    Right,
    /// Towards larger `y`
    Up,
    /// Towards smaller `y`
    Down,
}

impl Direction {
    /// All four directions in a fixed order
    pub const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Up, Self::Down];

    /// Coordinate delta `(dx, dy)` applied by a move
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::Up => (0, 1),
            Self::Down => (0, -1),
        }
    }

    /// Recognized option string
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => Err(invalid_parameter(
                "direction",
                &other,
                &"expected one of left, right, up, down",
            )),
        }
    }
}
