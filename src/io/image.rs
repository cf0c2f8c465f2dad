//! PNG tile map export: one square per tile, shaded by occupancy

use std::path::{Path, PathBuf};

use crate::io::configuration::{MAX_TILE_MAP_PIXELS, TILE_MAP_CELL_PIXELS, TILE_MAP_SUFFIX};
use crate::io::error::{GridError, Result, invalid_parameter};
use crate::spatial::coordinate::TileCoordinate;
use crate::spatial::store::TileStore;
use image::{ImageBuffer, Rgba, RgbaImage};

const EMPTY_COLOR: Rgba<u8> = Rgba([40, 40, 48, 255]);
const GRID_LINE_COLOR: Rgba<u8> = Rgba([20, 20, 24, 255]);
const CURRENT_OUTLINE_COLOR: Rgba<u8> = Rgba([255, 196, 0, 255]);

// Occupied tiles go from dim to bright blue as their dataset count approaches the busiest tile
fn occupancy_color(count: usize, max_count: usize) -> Rgba<u8> {
    if count == 0 {
        return EMPTY_COLOR;
    }
    let ratio = (count as f64 / max_count.max(1) as f64).clamp(0.0, 1.0);
    let level = 0.65f64.mul_add(ratio, 0.35);
    Rgba([
        (60.0 * level) as u8,
        (140.0 * level) as u8,
        (255.0 * level) as u8,
        255,
    ])
}

/// Render the store's occupancy as an image
///
/// Row 0 of the image is the top of the grid (largest `y`), so "up" moves
/// appear upwards. `current` is outlined when it lies inside the grid.
///
/// # Errors
///
/// Returns [`GridError::InvalidParameter`] when either image edge would exceed
/// [`MAX_TILE_MAP_PIXELS`]
pub fn render_tile_map(store: &TileStore, current: Option<TileCoordinate>) -> Result<RgbaImage> {
    let dimensions = store.bounds();
    let cell = TILE_MAP_CELL_PIXELS;
    let edge = |tiles: usize| {
        u32::try_from(tiles)
            .ok()
            .and_then(|tiles| tiles.checked_mul(cell))
            .filter(|&pixels| pixels <= MAX_TILE_MAP_PIXELS)
    };
    let (Some(width), Some(height)) = (edge(dimensions.width), edge(dimensions.height)) else {
        return Err(invalid_parameter(
            "tile_map",
            &dimensions,
            &format!("map would exceed {MAX_TILE_MAP_PIXELS} pixels per side"),
        ));
    };
    let max_count = store
        .occupied()
        .map(|(_, indices)| indices.len())
        .max()
        .unwrap_or(0);

    let mut img: RgbaImage = ImageBuffer::from_pixel(width, height, EMPTY_COLOR);

    for coord in dimensions.coordinates() {
        let color = occupancy_color(store.indices(coord).len(), max_count);
        let is_current = current == Some(coord);
        let left = coord.x as u32 * cell;
        let top = (dimensions.height as u32 - 1 - coord.y as u32) * cell;

        for dy in 0..cell {
            for dx in 0..cell {
                let on_edge = dx == 0 || dy == 0 || dx == cell - 1 || dy == cell - 1;
                let on_outline = dx <= 1 || dy <= 1 || dx >= cell - 2 || dy >= cell - 2;
                let pixel = if is_current && on_outline {
                    CURRENT_OUTLINE_COLOR
                } else if on_edge {
                    GRID_LINE_COLOR
                } else {
                    color
                };
                img.put_pixel(left + dx, top + dy, pixel);
            }
        }
    }

    Ok(img)
}

/// Export the tile map as a PNG file
///
/// # Errors
///
/// Returns [`GridError::InvalidParameter`] when the grid is too large to draw,
/// or [`GridError::ImageExport`] when the image cannot be saved
pub fn export_tile_map(
    store: &TileStore,
    current: Option<TileCoordinate>,
    output_path: &Path,
) -> Result<()> {
    let img = render_tile_map(store, current)?;
    img.save(output_path).map_err(|source| GridError::ImageExport {
        path: output_path.to_path_buf(),
        source,
    })
}

/// Map path used when none is given: `<folder>/<folder name>_tiles.png`
pub fn default_map_path(folder: &Path) -> PathBuf {
    let stem = folder
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("grid");
    folder.join(format!("{stem}{TILE_MAP_SUFFIX}"))
}
