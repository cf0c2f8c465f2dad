//! Grid policy constants and runtime configuration defaults

use crate::io::error::{Result, invalid_parameter};
use crate::residency::plan::LoadMode;
use crate::spatial::organizer::BucketingPolicy;

// Tile size multipliers observed for each bucketing policy
/// Multiplier applied to the average extent under the dense policy
pub const DEFAULT_DENSE_MULTIPLIER: f64 = 1.2;
/// Multiplier applied to the average extent under the fixed 3x3 policy
pub const DEFAULT_FIXED_MULTIPLIER: f64 = 2.0;

/// Tiles per side of the fixed grid
pub const FIXED_GRID_SIDE: usize = 3;
/// Datasets the fixed grid can hold, one per tile
pub const FIXED_GRID_CAPACITY: usize = FIXED_GRID_SIDE * FIXED_GRID_SIDE;

/// Whether navigation may enter in-bounds tiles that hold no datasets
pub const DEFAULT_ALLOW_EMPTY_TILE: bool = true;

/// File extensions treated as point-cloud datasets when scanning a folder
pub const POINT_CLOUD_EXTENSIONS: [&str; 2] = ["las", "laz"];

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;

// Tile map export settings
/// Edge length of one tile in the exported map, in pixels
pub const TILE_MAP_CELL_PIXELS: u32 = 16;
/// Largest tile map edge, in pixels, that will be rendered
pub const MAX_TILE_MAP_PIXELS: u32 = 8_192;
/// Suffix added to the folder name for the default tile map file
pub const TILE_MAP_SUFFIX: &str = "_tiles.png";

/// Caller-selectable options for one session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    /// How datasets are bucketed into tiles
    pub bucketing_policy: BucketingPolicy,
    /// Scale applied to the larger average extent to get the tile size
    pub tile_size_multiplier: f64,
    /// Whether navigation may enter empty in-bounds tiles
    pub allow_empty_tile: bool,
    /// Which datasets of the initial tile are loaded after analysis
    pub initial_load_mode: LoadMode,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::for_policy(BucketingPolicy::default())
    }
}

impl GridConfig {
    /// Defaults for `policy`, including its observed multiplier
    pub const fn for_policy(policy: BucketingPolicy) -> Self {
        Self {
            bucketing_policy: policy,
            tile_size_multiplier: policy.default_multiplier(),
            allow_empty_tile: DEFAULT_ALLOW_EMPTY_TILE,
            initial_load_mode: LoadMode::All,
        }
    }

    /// Replace the tile size multiplier
    #[must_use]
    pub const fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.tile_size_multiplier = multiplier;
        self
    }

    /// Replace the empty-tile navigation flag
    #[must_use]
    pub const fn with_allow_empty_tile(mut self, allow: bool) -> Self {
        self.allow_empty_tile = allow;
        self
    }

    /// Replace the initial load mode
    #[must_use]
    pub const fn with_initial_load_mode(mut self, mode: LoadMode) -> Self {
        self.initial_load_mode = mode;
        self
    }

    /// Check option values before an analysis pass
    ///
    /// # Errors
    ///
    /// Returns [`crate::GridError::InvalidParameter`] when the multiplier is not
    /// a positive finite number
    pub fn validate(&self) -> Result<()> {
        if !self.tile_size_multiplier.is_finite() || self.tile_size_multiplier <= 0.0 {
            return Err(invalid_parameter(
                "tile_size_multiplier",
                &self.tile_size_multiplier,
                &"must be a positive finite number",
            ));
        }
        Ok(())
    }
}
