//! Command-line interface for analysing a folder and walking its tile grid

use crate::io::configuration::GridConfig;
use crate::io::error::{ExtractionError, GridError, LoadError, Result, invalid_parameter};
use crate::io::image::{default_map_path, export_tile_map};
use crate::io::las::{LasHeaderExtractor, LasPointLoader, scan_folder};
use crate::io::progress::ProgressManager;
use crate::navigation::navigator::MoveOutcome;
use crate::residency::plan::LoadMode;
use crate::session::collaborators::SessionObserver;
use crate::session::controller::{GridSummary, Session};
use crate::spatial::bounds::{DatasetHandle, DatasetId};
use crate::spatial::coordinate::{Direction, TileCoordinate};
use crate::spatial::organizer::BucketingPolicy;
use clap::Parser;
use futures::executor::block_on;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cloudgrid")]
#[command(
    author,
    version,
    about = "Organize a folder of LAS/LAZ point clouds into tiles and walk the grid"
)]
/// Command-line arguments for the tile explorer
pub struct Cli {
    /// Folder containing .las/.laz files
    #[arg(value_name = "FOLDER")]
    pub target: PathBuf,

    /// How datasets are bucketed into tiles
    #[arg(short, long, value_enum, default_value_t = BucketingPolicy::Dense)]
    pub policy: BucketingPolicy,

    /// Tile size multiplier (defaults to 1.2 for dense, 2.0 for fixed3x3)
    #[arg(short = 'k', long)]
    pub multiplier: Option<f64>,

    /// Refuse moves into tiles that hold no datasets
    #[arg(short, long)]
    pub strict: bool,

    /// Datasets of the initial tile to load after analysis
    #[arg(short, long, value_enum, default_value_t = LoadMode::All)]
    pub initial_load: LoadMode,

    /// Comma-separated moves to apply in order (left, right, up, down)
    #[arg(short, long, value_enum, value_delimiter = ',')]
    pub moves: Vec<Direction>,

    /// Write a PNG tile map of the final state, inside FOLDER unless a path is given
    // Allow nested option to tell a bare --map from an absent one
    #[allow(clippy::option_option)]
    #[arg(long, value_name = "PNG", num_args = 0..=1)]
    pub map: Option<Option<PathBuf>>,

    /// Suppress progress output and informational logs
    #[arg(short, long)]
    pub quiet: bool,

    /// Log debug detail for every plan and move
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,
}

impl Cli {
    /// Session configuration selected by the arguments
    pub fn config(&self) -> GridConfig {
        let config = GridConfig::for_policy(self.policy)
            .with_allow_empty_tile(!self.strict)
            .with_initial_load_mode(self.initial_load);
        match self.multiplier {
            Some(multiplier) => config.with_multiplier(multiplier),
            None => config,
        }
    }

    /// Where to write the tile map, if one was requested
    pub fn map_path(&self) -> Option<PathBuf> {
        self.map
            .as_ref()
            .map(|path| path.clone().unwrap_or_else(|| default_map_path(&self.target)))
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Default log filter when `RUST_LOG` is unset
    pub const fn log_filter(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

/// Prints session events for the terminal user
#[derive(Debug, Default)]
pub struct ConsoleObserver {
    /// Extraction failures seen so far
    pub extraction_errors: Vec<ExtractionError>,
    /// Load failures seen so far
    pub load_errors: Vec<LoadError>,
}

// Allow print for the tool's primary output
#[allow(clippy::print_stdout)]
impl SessionObserver for ConsoleObserver {
    fn on_analysis_complete(&mut self, summary: &GridSummary) {
        println!(
            "Grid {} ({}), tile size {:.3}, {} datasets in {} tiles, start {}",
            summary.dimensions,
            summary.policy,
            summary.frame.tile_size,
            summary.dataset_count,
            summary.occupied_tiles,
            summary.initial_tile
        );
        if !summary.unassigned.is_empty() {
            println!("Unassigned: {}", join_ids(&summary.unassigned));
        }
        if !summary.excluded.is_empty() {
            println!("Excluded: {}", join_ids(&summary.excluded));
        }
    }

    fn on_tile_changed(&mut self, tile: TileCoordinate, datasets: &[DatasetId]) {
        if datasets.is_empty() {
            println!("Tile {tile}: (empty)");
        } else {
            println!("Tile {tile}: {}", join_ids(datasets));
        }
    }

    fn on_load_error(&mut self, error: &LoadError) {
        println!("Load failed: {error}");
        self.load_errors.push(error.clone());
    }

    fn on_extraction_error(&mut self, error: &ExtractionError) {
        println!("Skipped: {error}");
        self.extraction_errors.push(error.clone());
    }
}

fn join_ids(ids: &[DatasetId]) -> String {
    ids.iter()
        .map(DatasetId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Runs one analysis and move sequence as selected on the command line
pub struct GridExplorer {
    cli: Cli,
}

impl GridExplorer {
    /// Create an explorer for the given CLI arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Analyze the target folder, apply the moves, and export the map if requested
    ///
    /// # Errors
    ///
    /// Returns an error if the folder cannot be read, no dataset in it can be
    /// tiled, or the tile map cannot be written
    // Allow print for reporting each move outcome
    #[allow(clippy::print_stdout)]
    pub fn run(&self) -> Result<GridSummary> {
        if !self.cli.target.is_dir() {
            return Err(invalid_parameter(
                "target",
                &self.cli.target.display(),
                &"must be a directory",
            ));
        }

        let handles: Vec<DatasetHandle> = scan_folder(&self.cli.target)?
            .into_iter()
            .map(DatasetHandle::from_path)
            .collect();

        let extractor = if self.cli.should_show_progress() {
            let mut progress = ProgressManager::new();
            progress.initialize(handles.len());
            LasHeaderExtractor::with_progress(progress)
        } else {
            LasHeaderExtractor::new()
        };

        let mut session = Session::new(extractor, LasPointLoader::new(), self.cli.config())
            .with_observer(ConsoleObserver::default());

        let summary = block_on(async {
            let analysis = session.analyze(handles).await;
            session.extractor().finish();
            let summary = analysis?;

            for &direction in &self.cli.moves {
                let report = session.navigate(direction).await?;
                match report.outcome {
                    MoveOutcome::Moved(tile) => println!("{direction} -> {tile}"),
                    MoveOutcome::Rejected { destination, reason } => {
                        println!("{direction} rejected ({destination}): {reason}");
                    }
                }
            }
            Ok::<_, GridError>(summary)
        })?;

        println!(
            "Resident: {} points in {} buffers",
            session.renderer().resident_point_count(),
            session.renderer().buffer_count()
        );

        if let (Some(path), Some(organization)) = (self.cli.map_path(), session.organization()) {
            export_tile_map(&organization.store, session.current_tile(), &path)?;
            println!("Tile map written to {}", path.display());
        }

        Ok(summary)
    }
}
