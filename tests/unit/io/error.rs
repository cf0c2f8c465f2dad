//! Tests for error display, sources, and classification

#[cfg(test)]
mod tests {
    use cloudgrid::io::error::{degenerate_frame, file_system_error, invalid_parameter};
    use cloudgrid::spatial::bounds::DatasetId;
    use cloudgrid::{ExtractionError, GridError, LoadError};
    use std::error::Error;
    use std::io;

    // Tests messages name the failing parameter and operation
    // Verified by omitting the parameter value
    #[test]
    fn test_display() {
        assert_eq!(
            GridError::EmptyInput.to_string(),
            "No datasets available to organize into tiles"
        );
        assert_eq!(
            invalid_parameter("tile_size_multiplier", &-1.0, &"must be positive").to_string(),
            "Invalid parameter 'tile_size_multiplier' = '-1': must be positive"
        );
        assert_eq!(
            degenerate_frame(&"zero extent").to_string(),
            "Degenerate grid frame: zero extent"
        );
        assert_eq!(
            GridError::NotAnalyzed {
                operation: "navigate"
            }
            .to_string(),
            "Cannot navigate before a dataset collection is analyzed"
        );
    }

    // Tests per-dataset errors name the dataset
    // Verified by printing only the reason
    #[test]
    fn test_dataset_error_display() {
        let extraction = ExtractionError {
            dataset: DatasetId::from("a.las"),
            reason: "bad header".to_string(),
        };
        let load = LoadError {
            dataset: DatasetId::from("b.laz"),
            reason: "truncated".to_string(),
        };

        assert_eq!(
            extraction.to_string(),
            "Failed to extract bounds of 'a.las': bad header"
        );
        assert_eq!(load.to_string(), "Failed to load 'b.laz': truncated");
    }

    // Tests I/O errors keep their source and path
    // Verified by dropping the source
    #[test]
    fn test_file_system_source() {
        let error = file_system_error(
            "/tmp/scans",
            "read_dir",
            io::Error::new(io::ErrorKind::NotFound, "missing"),
        );

        assert!(error.source().is_some());
        assert!(error.to_string().contains("read_dir on '/tmp/scans'"));

        let converted: GridError = io::Error::other("boom").into();
        assert!(matches!(converted, GridError::FileSystem { .. }));
        assert!(converted.source().is_some());
        assert!(GridError::EmptyInput.source().is_none());
    }

    // Tests only collection problems count as analysis failures
    // Verified by classifying configuration errors as analysis failures
    #[test]
    fn test_is_analysis_failure() {
        assert!(GridError::EmptyInput.is_analysis_failure());
        assert!(degenerate_frame(&"x").is_analysis_failure());
        assert!(!invalid_parameter("p", &1, &"r").is_analysis_failure());
        assert!(
            !GridError::NotAnalyzed {
                operation: "navigate"
            }
            .is_analysis_failure()
        );
    }
}
