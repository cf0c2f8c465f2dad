//! Grid organization: global frame, tile size, and dataset bucketing
//!
//! The organizer consumes every extracted dataset at once, derives the
//! world-space frame from their bounding boxes, picks a uniform tile size
//! from the average X/Y extents, and assigns each dataset to one tile
//! according to a [`BucketingPolicy`]. Assignment follows input order, so
//! the same input always yields the same store.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::io::configuration::{
    DEFAULT_DENSE_MULTIPLIER, DEFAULT_FIXED_MULTIPLIER, FIXED_GRID_CAPACITY, FIXED_GRID_SIDE,
};
use crate::io::error::{GridError, Result, degenerate_frame, invalid_parameter};
use crate::spatial::bounds::{Dataset, DatasetId, GridFrame};
use crate::spatial::coordinate::{GridDimensions, TileCoordinate};
use crate::spatial::store::TileStore;

/// How datasets are mapped onto tile coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum BucketingPolicy {
    /// Grid sized to the world region; tile = `floor((center - min) / tile_size)`
    #[default]
    #[value(name = "dense")]
    Dense,
    /// Static 3x3 grid filled row-major by the first nine datasets
    #[value(name = "fixed3x3")]
    Fixed3x3,
}

impl BucketingPolicy {
    /// Recognized option string
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dense => "dense",
            Self::Fixed3x3 => "fixed3x3",
        }
    }

    /// Tile size multiplier used when none is configured
    pub const fn default_multiplier(self) -> f64 {
        match self {
            Self::Dense => DEFAULT_DENSE_MULTIPLIER,
            Self::Fixed3x3 => DEFAULT_FIXED_MULTIPLIER,
        }
    }
}

impl fmt::Display for BucketingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BucketingPolicy {
    type Err = GridError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "dense" => Ok(Self::Dense),
            "fixed3x3" => Ok(Self::Fixed3x3),
            other => Err(invalid_parameter(
                "bucketing_policy",
                &other,
                &"expected 'dense' or 'fixed3x3'",
            )),
        }
    }
}

/// Result of one analysis pass
#[derive(Debug, Clone, PartialEq)]
pub struct Organization {
    /// Global bounds and tile size
    pub frame: GridFrame,
    /// Catalog of tile assignments
    pub store: TileStore,
    /// Tile the navigator starts on
    pub initial_tile: TileCoordinate,
    /// Datasets left out by the policy, in input order
    pub unassigned: Vec<DatasetId>,
    /// Policy that produced this organization
    pub policy: BucketingPolicy,
}

/// Organize `datasets` into tiles
///
/// `tile_size_multiplier` scales the larger of the average X and Y extents
/// to obtain the tile edge length.
///
/// # Errors
///
/// - [`GridError::EmptyInput`] when `datasets` is empty
/// - [`GridError::InvalidParameter`] when the multiplier is not a positive finite number
/// - [`GridError::DegenerateFrame`] when the tile size is zero or non-finite
pub fn organize(
    datasets: Vec<Dataset>,
    policy: BucketingPolicy,
    tile_size_multiplier: f64,
) -> Result<Organization> {
    if datasets.is_empty() {
        return Err(GridError::EmptyInput);
    }
    if !tile_size_multiplier.is_finite() || tile_size_multiplier <= 0.0 {
        return Err(invalid_parameter(
            "tile_size_multiplier",
            &tile_size_multiplier,
            &"must be a positive finite number",
        ));
    }

    let frame = compute_frame(&datasets, tile_size_multiplier)?;

    let organization = match policy {
        BucketingPolicy::Dense => bucket_dense(datasets, frame),
        BucketingPolicy::Fixed3x3 => bucket_fixed(datasets, frame),
    };

    debug!(
        policy = %policy,
        tile_size = frame.tile_size,
        grid = %organization.store.bounds(),
        occupied = organization.store.occupied_count(),
        initial = %organization.initial_tile,
        "organized datasets into tiles"
    );

    Ok(organization)
}

/// Component-wise bounds of all boxes and the tile size derived from them
///
/// # Errors
///
/// Returns [`GridError::DegenerateFrame`] when the tile size would not be positive and finite
pub fn compute_frame(datasets: &[Dataset], tile_size_multiplier: f64) -> Result<GridFrame> {
    let mut frame = GridFrame {
        min_x: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        min_y: f64::INFINITY,
        max_y: f64::NEG_INFINITY,
        tile_size: 0.0,
    };
    let mut extent_sum = (0.0, 0.0);

    for dataset in datasets {
        let bbox = dataset.bounding_box();
        frame.min_x = frame.min_x.min(bbox.min_x);
        frame.max_x = frame.max_x.max(bbox.max_x);
        frame.min_y = frame.min_y.min(bbox.min_y);
        frame.max_y = frame.max_y.max(bbox.max_y);

        let [extent_x, extent_y, _] = bbox.extent();
        extent_sum.0 += extent_x;
        extent_sum.1 += extent_y;
    }

    let count = datasets.len() as f64;
    let average = (extent_sum.0 / count, extent_sum.1 / count);
    frame.tile_size = average.0.max(average.1) * tile_size_multiplier;

    if !frame.tile_size.is_finite() || frame.tile_size <= 0.0 {
        return Err(degenerate_frame(&format!(
            "tile size {} from average extents ({}, {})",
            frame.tile_size, average.0, average.1
        )));
    }

    Ok(frame)
}

/// Tile coordinate of a world-space point under the dense policy
///
/// Floors towards the lower tile and clamps into `dimensions` so points on
/// the far edge of the frame stay inside the grid.
pub fn dense_tile_of(
    point: [f64; 2],
    frame: &GridFrame,
    dimensions: GridDimensions,
) -> TileCoordinate {
    let axis = |value: f64, min: f64, cells: usize| -> i32 {
        let raw = ((value - min) / frame.tile_size).floor();
        let last = cells.saturating_sub(1) as f64;
        raw.clamp(0.0, last) as i32
    };
    TileCoordinate::new(
        axis(point[0], frame.min_x, dimensions.width),
        axis(point[1], frame.min_y, dimensions.height),
    )
}

/// Dense grid extent, `ceil(span / tile_size)` per axis and at least one tile
///
/// Axes are capped at `i32::MAX` tiles so every tile has a coordinate; the
/// clamp in [`dense_tile_of`] keeps datasets beyond the cap in the last tile.
pub fn dense_dimensions(frame: &GridFrame) -> GridDimensions {
    let (span_x, span_y) = frame.span();
    let cells = |span: f64| {
        (span / frame.tile_size)
            .ceil()
            .clamp(1.0, f64::from(i32::MAX)) as usize
    };
    GridDimensions::new(cells(span_x), cells(span_y))
}

fn bucket_dense(datasets: Vec<Dataset>, frame: GridFrame) -> Organization {
    let dimensions = dense_dimensions(&frame);
    let assignments: Vec<TileCoordinate> = datasets
        .iter()
        .map(|dataset| {
            let [x, y, _] = dataset.center();
            dense_tile_of([x, y], &frame, dimensions)
        })
        .collect();

    let store = TileStore::from_assignments(datasets, &assignments, dimensions);

    Organization {
        frame,
        store,
        initial_tile: dimensions.center(),
        unassigned: Vec::new(),
        policy: BucketingPolicy::Dense,
    }
}

fn bucket_fixed(mut datasets: Vec<Dataset>, frame: GridFrame) -> Organization {
    let side = FIXED_GRID_SIDE;
    let dimensions = GridDimensions::new(side, side);

    let overflow = if datasets.len() > FIXED_GRID_CAPACITY {
        datasets.split_off(FIXED_GRID_CAPACITY)
    } else {
        Vec::new()
    };
    let unassigned: Vec<DatasetId> = overflow.iter().map(|d| d.id().clone()).collect();

    if !unassigned.is_empty() {
        warn!(
            excluded = unassigned.len(),
            capacity = FIXED_GRID_CAPACITY,
            "fixed 3x3 grid holds only the first nine datasets"
        );
    } else if datasets.len() < FIXED_GRID_CAPACITY {
        warn!(
            datasets = datasets.len(),
            empty_tiles = FIXED_GRID_CAPACITY - datasets.len(),
            "fewer datasets than fixed 3x3 tiles"
        );
    }

    let assignments: Vec<TileCoordinate> = (0..datasets.len())
        .map(|index| TileCoordinate::new((index % side) as i32, (index / side) as i32))
        .collect();

    let store = TileStore::from_assignments(datasets, &assignments, dimensions);

    Organization {
        frame,
        store,
        initial_tile: dimensions.center(),
        unassigned,
        policy: BucketingPolicy::Fixed3x3,
    }
}
