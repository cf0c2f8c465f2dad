//! Load plans: the delta between the resident set and a tile's requirement

use std::fmt;
use std::str::FromStr;

use crate::io::error::{GridError, invalid_parameter};
use crate::spatial::coordinate::TileCoordinate;

/// Which datasets of an active tile must be resident
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum LoadMode {
    /// Only the primary (first assigned) dataset of the tile
    #[value(name = "first-only")]
    FirstOnly,
    /// Every dataset assigned to the tile
    #[default]
    #[value(name = "all")]
    All,
}

impl LoadMode {
    /// Recognized option string
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstOnly => "first-only",
            Self::All => "all",
        }
    }

    /// The part of a tile's dataset list this mode requires
    pub fn select(self, indices: &[usize]) -> &[usize] {
        match self {
            Self::FirstOnly => indices.get(..1).unwrap_or(&[]),
            Self::All => indices,
        }
    }
}

impl fmt::Display for LoadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoadMode {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "first-only" => Ok(Self::FirstOnly),
            "all" => Ok(Self::All),
            other => Err(invalid_parameter(
                "load_mode",
                &other,
                &"expected 'first-only' or 'all'",
            )),
        }
    }
}

/// Datasets to load and unload to make one tile active
///
/// Entries are dataset indices into the tile store. `generation` identifies
/// the plan among all plans issued by one manager; only the newest plan's
/// completed loads become resident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadPlan {
    /// Tile this plan activates
    pub tile: TileCoordinate,
    /// Mode the tile is activated with
    pub mode: LoadMode,
    /// Required but not yet resident, in tile assignment order
    pub load: Vec<usize>,
    /// Resident but no longer required, in ascending index order
    pub unload: Vec<usize>,
    /// Sequence number of this plan
    pub generation: u64,
}

impl LoadPlan {
    /// Whether applying the plan changes nothing
    pub fn is_empty(&self) -> bool {
        self.load.is_empty() && self.unload.is_empty()
    }
}
