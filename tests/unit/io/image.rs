//! Tests for tile map rendering and PNG export

#[cfg(test)]
mod tests {
    use crate::fixtures::{dataset, lattice};
    use cloudgrid::GridError;
    use cloudgrid::io::configuration::{MAX_TILE_MAP_PIXELS, TILE_MAP_CELL_PIXELS};
    use cloudgrid::io::image::{default_map_path, export_tile_map, render_tile_map};
    use cloudgrid::spatial::coordinate::TileCoordinate;
    use cloudgrid::spatial::organizer::{BucketingPolicy, organize};
    use cloudgrid::spatial::store::TileStore;
    use image::Rgba;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const CELL: u32 = TILE_MAP_CELL_PIXELS;

    fn fixed_store(names: &[&str]) -> TileStore {
        let datasets = names
            .iter()
            .enumerate()
            .map(|(i, name)| dataset(name, [i as f64 * 5.0, 0.0], 1.0))
            .collect();
        organize(datasets, BucketingPolicy::Fixed3x3, 2.0).unwrap().store
    }

    // Tests the image has one cell per tile with the top row holding the largest y
    // Verified by drawing row 0 at the bottom of the grid
    #[test]
    fn test_render_layout() {
        let store = fixed_store(&["a", "b"]);
        let img = render_tile_map(&store, None).unwrap();

        assert_eq!(img.dimensions(), (3 * CELL, 3 * CELL));
        // tile (0, 0) is occupied and drawn in the bottom-left cell
        let occupied = img.get_pixel(CELL / 2, 2 * CELL + CELL / 2);
        assert!(occupied.0[2] >= 254, "{occupied:?}");
        // tile (0, 2) is empty and drawn in the top-left cell
        assert_eq!(*img.get_pixel(CELL / 2, CELL / 2), Rgba([40, 40, 48, 255]));
        // cell borders use the grid line colour
        assert_eq!(*img.get_pixel(0, 2 * CELL), Rgba([20, 20, 24, 255]));
    }

    // Tests the current tile is outlined
    // Verified by ignoring the current tile
    #[test]
    fn test_current_tile_outline() {
        let store = organize(lattice(), BucketingPolicy::Fixed3x3, 2.0).unwrap().store;
        let img = render_tile_map(&store, Some(TileCoordinate::new(1, 1))).unwrap();

        assert_eq!(*img.get_pixel(CELL, CELL), Rgba([255, 196, 0, 255]));
        assert_eq!(*img.get_pixel(CELL + 1, CELL + CELL / 2), Rgba([255, 196, 0, 255]));
        assert_ne!(*img.get_pixel(CELL + CELL / 2, CELL + CELL / 2), Rgba([255, 196, 0, 255]));

        let outside = render_tile_map(&store, Some(TileCoordinate::new(7, 7))).unwrap();
        assert_eq!(outside, render_tile_map(&store, None).unwrap());
    }

    // Tests busier tiles are drawn brighter than tiles with fewer datasets
    // Verified by shading every occupied tile the same
    #[test]
    fn test_occupancy_shading() {
        let datasets = vec![
            dataset("a", [0.0, 0.0], 2.0),
            dataset("b", [0.1, 0.0], 2.0),
            dataset("c", [9.0, 0.0], 2.0),
        ];
        let store = organize(datasets, BucketingPolicy::Dense, 1.2).unwrap().store;
        let img = render_tile_map(&store, None).unwrap();

        let busy = img.get_pixel(CELL / 2, CELL / 2);
        let quiet = img.get_pixel(4 * CELL + CELL / 2, CELL / 2);
        assert!(busy.0[2] > quiet.0[2]);
    }

    // Tests export writes a readable PNG of the rendered size
    // Verified by writing an empty file
    #[test]
    fn test_export() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("grid.png");
        let store = fixed_store(&["a"]);

        export_tile_map(&store, Some(TileCoordinate::new(0, 0)), &path).unwrap();

        let reopened = image::open(&path).unwrap();
        assert_eq!((reopened.width(), reopened.height()), (3 * CELL, 3 * CELL));
    }

    // Tests export failures carry the target path
    // Verified by creating missing parent directories
    #[test]
    fn test_export_to_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no").join("such").join("grid.png");

        let error = export_tile_map(&fixed_store(&["a"]), None, &path).unwrap_err();

        assert!(matches!(&error, GridError::ImageExport { path: p, .. } if *p == path));
        assert!(std::error::Error::source(&error).is_some());
    }

    // Tests grids too wide to draw are refused before any pixels are allocated
    // Verified by rendering without the size guard
    #[test]
    fn test_oversized_map_is_refused() {
        let tiles_per_side = f64::from(MAX_TILE_MAP_PIXELS / CELL);
        let far = tiles_per_side * 1.2 * 4.0;
        let datasets = vec![dataset("a", [0.0, 0.0], 1.0), dataset("b", [far, 0.0], 1.0)];
        let store = organize(datasets, BucketingPolicy::Dense, 1.2).unwrap().store;
        assert!(store.bounds().width as f64 > tiles_per_side);

        let error = render_tile_map(&store, None).unwrap_err();
        assert!(matches!(error, GridError::InvalidParameter { parameter: "tile_map", .. }));

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wide.png");
        assert!(export_tile_map(&store, None, &path).is_err());
        assert!(!path.exists());
    }

    // Tests the default map is named after the folder and placed inside it
    // Verified by placing it next to the folder
    #[test]
    fn test_default_map_path() {
        assert_eq!(
            default_map_path(Path::new("/data/scans")),
            PathBuf::from("/data/scans/scans_tiles.png")
        );
    }
}
