//! Tests for argument parsing and the end-to-end explorer run

#[cfg(test)]
mod tests {
    use crate::fixtures::write_las;
    use clap::Parser;
    use cloudgrid::GridError;
    use cloudgrid::io::cli::{Cli, ConsoleObserver, GridExplorer};
    use cloudgrid::residency::plan::LoadMode;
    use cloudgrid::session::collaborators::SessionObserver;
    use cloudgrid::spatial::bounds::DatasetId;
    use cloudgrid::spatial::coordinate::{Direction, TileCoordinate};
    use cloudgrid::spatial::organizer::BucketingPolicy;
    use cloudgrid::{ExtractionError, LoadError};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("cloudgrid").chain(args.iter().copied())).unwrap()
    }

    // Tests defaults select the dense policy with its multiplier
    // Verified by defaulting to the fixed policy
    #[test]
    fn test_defaults() {
        let cli = parse(&["scans"]);
        let config = cli.config();

        assert_eq!(cli.target, PathBuf::from("scans"));
        assert_eq!(config.bucketing_policy, BucketingPolicy::Dense);
        assert!((config.tile_size_multiplier - 1.2).abs() < f64::EPSILON);
        assert!(config.allow_empty_tile);
        assert_eq!(config.initial_load_mode, LoadMode::All);
        assert!(cli.moves.is_empty());
        assert!(cli.map_path().is_none());
        assert!(cli.should_show_progress());
        assert_eq!(cli.log_filter(), "info");
    }

    // Tests every option reaches the session configuration
    // Verified by ignoring the strict flag
    #[test]
    fn test_options() {
        let cli = parse(&[
            "scans",
            "--policy",
            "fixed3x3",
            "-k",
            "3.5",
            "--strict",
            "--initial-load",
            "first-only",
            "--moves",
            "left,up,up",
        ]);
        let config = cli.config();

        assert_eq!(config.bucketing_policy, BucketingPolicy::Fixed3x3);
        assert!((config.tile_size_multiplier - 3.5).abs() < f64::EPSILON);
        assert!(!config.allow_empty_tile);
        assert_eq!(config.initial_load_mode, LoadMode::FirstOnly);
        assert_eq!(cli.moves, vec![Direction::Left, Direction::Up, Direction::Up]);
    }

    // Tests the fixed policy picks its own default multiplier
    // Verified by sharing the dense default
    #[test]
    fn test_policy_default_multiplier() {
        let config = parse(&["scans", "-p", "fixed3x3"]).config();

        assert!((config.tile_size_multiplier - 2.0).abs() < f64::EPSILON);
    }

    // Tests a bare map flag writes inside the target folder
    // Verified by requiring a value for the flag
    #[test]
    fn test_map_path() {
        let bare = parse(&["/data/scans", "--map"]);
        let explicit = parse(&["/data/scans", "--map", "out.png"]);

        assert_eq!(bare.map_path(), Some(PathBuf::from("/data/scans/scans_tiles.png")));
        assert_eq!(explicit.map_path(), Some(PathBuf::from("out.png")));
    }

    // Tests verbosity flags pick the log filter and quiet conflicts with verbose
    // Verified by letting verbose win over quiet
    #[test]
    fn test_verbosity() {
        let quiet = parse(&["scans", "-q"]);
        assert_eq!(quiet.log_filter(), "warn");
        assert!(!quiet.should_show_progress());
        assert_eq!(parse(&["scans", "-v"]).log_filter(), "debug");

        assert!(Cli::try_parse_from(["cloudgrid", "scans", "-q", "-v"]).is_err());
        assert!(Cli::try_parse_from(["cloudgrid", "scans", "--moves", "north"]).is_err());
        assert!(Cli::try_parse_from(["cloudgrid", "scans", "--policy", "sparse"]).is_err());
    }

    // Tests the console observer keeps the errors it prints
    // Verified by dropping load errors
    #[test]
    fn test_console_observer_collects_errors() {
        let mut observer = ConsoleObserver::default();

        observer.on_tile_changed(TileCoordinate::new(0, 0), &[]);
        observer.on_tile_changed(TileCoordinate::new(1, 0), &[DatasetId::from("a")]);
        observer.on_extraction_error(&ExtractionError {
            dataset: DatasetId::from("x"),
            reason: "bad".to_string(),
        });
        observer.on_load_error(&LoadError {
            dataset: DatasetId::from("y"),
            reason: "gone".to_string(),
        });

        assert_eq!(observer.extraction_errors.len(), 1);
        assert_eq!(observer.load_errors.len(), 1);
    }

    // Tests a target that is not a directory is rejected
    // Verified by scanning files as folders
    #[test]
    fn test_run_requires_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("cloud.las");
        write_las(&file, &[[0.0, 0.0, 0.0]]);

        let explorer = GridExplorer::new(parse(&[file.to_str().unwrap(), "-q"]));

        assert!(matches!(
            explorer.run(),
            Err(GridError::InvalidParameter {
                parameter: "target",
                ..
            })
        ));
    }

    // Tests a full run over a folder tiles valid files, skips broken ones, and writes the map
    // Verified by aborting on the broken file
    #[test]
    fn test_run_end_to_end() {
        let dir = TempDir::new().unwrap();
        write_las(&dir.path().join("a.las"), &[[0.0, 0.0, 0.0], [2.0, 2.0, 1.0]]);
        write_las(&dir.path().join("b.las"), &[[10.0, 0.0, 0.0], [12.0, 2.0, 1.0]]);
        std::fs::write(dir.path().join("broken.laz"), b"junk").unwrap();
        let map = dir.path().join("map.png");

        let cli = parse(&[
            dir.path().to_str().unwrap(),
            "-q",
            "--policy",
            "fixed3x3",
            "--moves",
            "left,down,right",
            "--map",
            map.to_str().unwrap(),
        ]);
        let summary = GridExplorer::new(cli).run().unwrap();

        assert_eq!(summary.dataset_count, 2);
        assert_eq!(summary.excluded, vec![DatasetId::from("broken.laz")]);
        assert!(map.is_file());
    }

    // Tests a folder with no readable files fails the analysis
    // Verified by returning an empty summary
    #[test]
    fn test_run_empty_folder() {
        let dir = TempDir::new().unwrap();

        let error = GridExplorer::new(parse(&[dir.path().to_str().unwrap(), "-q"]))
            .run()
            .unwrap_err();

        assert!(matches!(error, GridError::EmptyInput));
    }
}
