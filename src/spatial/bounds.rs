//! Dataset descriptors, axis-aligned bounds, and the global grid frame

use std::fmt;
use std::path::{Path, PathBuf};

use crate::io::error::ExtractionError;
use crate::spatial::coordinate::TileCoordinate;

/// Stable, unique dataset name for the lifetime of a session
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DatasetId(String);

impl DatasetId {
    /// Create an identifier from any string-like name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the underlying name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DatasetId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// What collaborators need to locate a dataset's bytes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetHandle {
    /// Session-unique name
    pub id: DatasetId,
    /// Source file
    pub path: PathBuf,
}

impl DatasetHandle {
    /// Handle named after the file name of `path`
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .unwrap_or(path.as_os_str())
            .to_string_lossy()
            .into_owned();
        Self {
            id: DatasetId::new(name),
            path,
        }
    }

    /// Handle with an explicit name, for sources without a meaningful path
    pub fn named(name: &str) -> Self {
        Self {
            id: DatasetId::new(name),
            path: Path::new(name).to_path_buf(),
        }
    }
}

/// Axis-aligned bounding box as produced by an extractor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum X
    pub min_x: f64,
    /// Maximum X
    pub max_x: f64,
    /// Minimum Y
    pub min_y: f64,
    /// Maximum Y
    pub max_y: f64,
    /// Minimum Z
    pub min_z: f64,
    /// Maximum Z
    pub max_z: f64,
}

impl BoundingBox {
    /// Create bounds from per-axis minimum and maximum corners
    pub const fn from_corners(min: [f64; 3], max: [f64; 3]) -> Self {
        Self {
            min_x: min[0],
            max_x: max[0],
            min_y: min[1],
            max_y: max[1],
            min_z: min[2],
            max_z: max[2],
        }
    }

    /// Bounds centred on `center` with the given per-axis extent
    pub fn around(center: [f64; 3], extent: [f64; 3]) -> Self {
        let [cx, cy, cz] = center;
        let [ex, ey, ez] = extent.map(|e| e / 2.0);
        Self::from_corners([cx - ex, cy - ey, cz - ez], [cx + ex, cy + ey, cz + ez])
    }

    /// Check every component is finite and `min <= max` on each axis
    ///
    /// # Errors
    ///
    /// Returns a description of the first malformed axis
    pub fn validate(&self) -> std::result::Result<(), String> {
        let axes = [
            ("x", self.min_x, self.max_x),
            ("y", self.min_y, self.max_y),
            ("z", self.min_z, self.max_z),
        ];
        for (axis, min, max) in axes {
            if !min.is_finite() || !max.is_finite() {
                return Err(format!("non-finite {axis} bounds [{min}, {max}]"));
            }
            if min > max {
                return Err(format!("inverted {axis} bounds: min {min} > max {max}"));
            }
        }
        Ok(())
    }

    /// Per-axis centre, `(min + max) / 2`
    pub fn center(&self) -> [f64; 3] {
        [
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
            (self.min_z + self.max_z) / 2.0,
        ]
    }

    /// Per-axis extent, `max - min`
    pub fn extent(&self) -> [f64; 3] {
        [
            self.max_x - self.min_x,
            self.max_y - self.min_y,
            self.max_z - self.min_z,
        ]
    }
}

/// One input unit with validated bounds; immutable once created
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    handle: DatasetHandle,
    bounding_box: BoundingBox,
}

impl Dataset {
    /// Pair a handle with its extracted bounds
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError`] when the bounds are non-finite or inverted
    pub fn new(
        handle: DatasetHandle,
        bounding_box: BoundingBox,
    ) -> std::result::Result<Self, ExtractionError> {
        match bounding_box.validate() {
            Ok(()) => Ok(Self {
                handle,
                bounding_box,
            }),
            Err(reason) => Err(ExtractionError {
                dataset: handle.id,
                reason: format!("malformed bounding box: {reason}"),
            }),
        }
    }

    /// Session-unique name
    pub const fn id(&self) -> &DatasetId {
        &self.handle.id
    }

    /// Handle passed back to collaborators
    pub const fn handle(&self) -> &DatasetHandle {
        &self.handle
    }

    /// Extracted bounds
    pub const fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    /// Bounding box centre
    pub fn center(&self) -> [f64; 3] {
        self.bounding_box.center()
    }
}

/// Translation applied by the render collaborator to place a dataset
pub type PositionOffset = [f64; 3];

/// Global world-space region spanning all datasets, plus the tile edge length
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridFrame {
    /// Smallest X over all dataset bounds
    pub min_x: f64,
    /// Largest X over all dataset bounds
    pub max_x: f64,
    /// Smallest Y over all dataset bounds
    pub min_y: f64,
    /// Largest Y over all dataset bounds
    pub max_y: f64,
    /// Uniform tile edge length in world units, always positive
    pub tile_size: f64,
}

impl GridFrame {
    /// Offset that places `tile` relative to `origin_tile` in world units
    ///
    /// `((x - origin.x) * tile_size, (y - origin.y) * tile_size, 0)`
    pub fn position_offset(
        &self,
        tile: TileCoordinate,
        origin_tile: TileCoordinate,
    ) -> PositionOffset {
        [
            f64::from(tile.x - origin_tile.x) * self.tile_size,
            f64::from(tile.y - origin_tile.y) * self.tile_size,
            0.0,
        ]
    }

    /// World-space span `(max_x - min_x, max_y - min_y)`
    pub fn span(&self) -> (f64, f64) {
        (self.max_x - self.min_x, self.max_y - self.min_y)
    }
}
