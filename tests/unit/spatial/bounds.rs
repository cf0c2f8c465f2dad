//! Tests for bounding box validation, dataset construction, and frame offsets

#[cfg(test)]
mod tests {
    use crate::fixtures::square;
    use cloudgrid::spatial::bounds::{
        BoundingBox, Dataset, DatasetHandle, DatasetId, GridFrame,
    };
    use cloudgrid::spatial::coordinate::TileCoordinate;

    // Tests centre and extent derive from min and max per axis
    // Verified by swapping min and max in the centre formula
    #[test]
    fn test_center_and_extent() {
        let bbox = BoundingBox::from_corners([0.0, 10.0, -2.0], [4.0, 16.0, 2.0]);

        assert_eq!(bbox.center(), [2.0, 13.0, 0.0]);
        assert_eq!(bbox.extent(), [4.0, 6.0, 4.0]);
    }

    // Tests around() produces a box with the requested centre and extent
    // Verified by halving the extent twice
    #[test]
    fn test_around_round_trips_center_and_extent() {
        let bbox = BoundingBox::around([5.0, -5.0, 1.0], [2.0, 4.0, 6.0]);

        assert_eq!(bbox.center(), [5.0, -5.0, 1.0]);
        assert_eq!(bbox.extent(), [2.0, 4.0, 6.0]);
    }

    // Tests validation rejects inverted and non-finite bounds
    // Verified by removing the inversion check
    #[test]
    fn test_validate_rejects_malformed_boxes() {
        assert!(square([0.0, 0.0], 1.0).validate().is_ok());

        let inverted = BoundingBox::from_corners([1.0, 0.0, 0.0], [0.0, 1.0, 1.0]);
        let message = inverted.validate().unwrap_err();
        assert!(message.contains("inverted x"), "{message}");

        let nan = BoundingBox::from_corners([0.0, f64::NAN, 0.0], [1.0, 1.0, 1.0]);
        assert!(nan.validate().unwrap_err().contains("non-finite y"));

        let infinite = BoundingBox::from_corners([0.0, 0.0, 0.0], [1.0, 1.0, f64::INFINITY]);
        assert!(infinite.validate().unwrap_err().contains("non-finite z"));
    }

    // Tests zero-extent boxes are valid
    // Verified by requiring min < max
    #[test]
    fn test_point_box_is_valid() {
        let point = BoundingBox::from_corners([3.0, 3.0, 3.0], [3.0, 3.0, 3.0]);
        assert!(point.validate().is_ok());
        assert_eq!(point.extent(), [0.0, 0.0, 0.0]);
    }

    // Tests dataset construction reports the dataset name on malformed bounds
    // Verified by constructing without validation
    #[test]
    fn test_dataset_rejects_malformed_bounds() {
        let bad = BoundingBox::from_corners([0.0, 0.0, 0.0], [f64::NAN, 1.0, 1.0]);
        let error = Dataset::new(DatasetHandle::named("bad.las"), bad).unwrap_err();

        assert_eq!(error.dataset, DatasetId::from("bad.las"));
        assert!(error.reason.contains("malformed bounding box"));
    }

    // Tests dataset accessors expose handle, id, and centre
    // Verified by returning the box minimum as centre
    #[test]
    fn test_dataset_accessors() {
        let dataset = Dataset::new(DatasetHandle::named("a.las"), square([4.0, 8.0], 2.0)).unwrap();

        assert_eq!(dataset.id().as_str(), "a.las");
        assert_eq!(dataset.handle().path.to_str(), Some("a.las"));
        assert_eq!(dataset.center(), [4.0, 8.0, 0.0]);
        assert_eq!(dataset.bounding_box().extent()[0], 2.0);
    }

    // Tests handles built from paths are named after the file name
    // Verified by using the full path as the name
    #[test]
    fn test_handle_from_path_uses_file_name() {
        let handle = DatasetHandle::from_path("/data/scans/block_07.laz");

        assert_eq!(handle.id.to_string(), "block_07.laz");
        assert!(handle.path.ends_with("scans/block_07.laz"));
    }

    // Tests offsets scale tile distance from the origin tile by the tile size
    // Verified by ignoring the origin tile
    #[test]
    fn test_position_offset() {
        let frame = GridFrame {
            min_x: 0.0,
            max_x: 30.0,
            min_y: 0.0,
            max_y: 30.0,
            tile_size: 2.5,
        };
        let origin = TileCoordinate::new(1, 1);

        assert_eq!(frame.position_offset(origin, origin), [0.0, 0.0, 0.0]);
        assert_eq!(
            frame.position_offset(TileCoordinate::new(0, 3), origin),
            [-2.5, 5.0, 0.0]
        );
        assert_eq!(frame.span(), (30.0, 30.0));
    }
}
