//! Session orchestration: extract, organize, activate, navigate
//!
//! A session owns the collaborators and, once a dataset collection has been
//! analyzed, the organization, navigator, and resident set for it. Calls
//! take `&mut self`, which serializes moves; the resident set therefore
//! always reflects the last completed activation.

use futures::future::join_all;
use tracing::{info, warn};

use crate::io::configuration::GridConfig;
use crate::io::error::{ExtractionError, GridError, LoadError, Result};
use crate::navigation::navigator::{MoveOutcome, Navigator};
use crate::residency::manager::{LoadCompletion, ResidentSetManager};
use crate::residency::plan::{LoadMode, LoadPlan};
use crate::session::collaborators::{
    BoundsExtractor, NoopObserver, RenderTarget, SessionObserver,
};
use crate::spatial::bounds::{Dataset, DatasetHandle, DatasetId, GridFrame};
use crate::spatial::coordinate::{Direction, GridDimensions, TileCoordinate};
use crate::spatial::organizer::{BucketingPolicy, Organization, organize};

/// Overview of one analysis pass
#[derive(Debug, Clone, PartialEq)]
pub struct GridSummary {
    /// Policy the grid was built with
    pub policy: BucketingPolicy,
    /// Global bounds and tile size
    pub frame: GridFrame,
    /// Grid size in tiles
    pub dimensions: GridDimensions,
    /// Datasets placed in tiles
    pub dataset_count: usize,
    /// Tiles holding at least one dataset
    pub occupied_tiles: usize,
    /// Datasets dropped because extraction failed, in input order
    pub excluded: Vec<DatasetId>,
    /// Datasets the policy left without a tile, in input order
    pub unassigned: Vec<DatasetId>,
    /// Tile navigation starts on
    pub initial_tile: TileCoordinate,
}

/// What one tile activation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationReport {
    /// Tile that was activated
    pub tile: TileCoordinate,
    /// Mode it was activated with
    pub mode: LoadMode,
    /// Datasets that became resident
    pub loaded: Vec<DatasetId>,
    /// Datasets that were unloaded
    pub unloaded: Vec<DatasetId>,
    /// Loads that failed
    pub failed: Vec<LoadError>,
    /// Loads whose results were discarded as stale
    pub discarded: usize,
}

/// Result of a navigation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReport {
    /// Navigator decision
    pub outcome: MoveOutcome,
    /// Activation triggered by an accepted move
    pub activation: Option<ActivationReport>,
}

/// Per-collection state, replaced wholesale on re-analysis
#[derive(Debug)]
struct ActiveGrid<H> {
    organization: Organization,
    navigator: Navigator,
    resident: ResidentSetManager<H>,
    excluded: Vec<DatasetId>,
}

impl<H> ActiveGrid<H> {
    fn summary(&self) -> GridSummary {
        let organization = &self.organization;
        GridSummary {
            policy: organization.policy,
            frame: organization.frame,
            dimensions: organization.store.bounds(),
            dataset_count: organization.store.datasets().len(),
            occupied_tiles: organization.store.occupied_count(),
            excluded: self.excluded.clone(),
            unassigned: organization.unassigned.clone(),
            initial_tile: organization.initial_tile,
        }
    }

    fn resident_ids(&self) -> Vec<DatasetId> {
        self.resident
            .resident_indices()
            .into_iter()
            .filter_map(|index| self.organization.store.dataset_id(index).cloned())
            .collect()
    }

    fn offset_of(&self, tile: TileCoordinate) -> [f64; 3] {
        let origin = self.organization.store.bounds().center();
        self.organization.frame.position_offset(tile, origin)
    }
}

/// Drives extraction, tiling, navigation, and residency for one folder at a time
pub struct Session<E, R: RenderTarget, O = NoopObserver> {
    extractor: E,
    renderer: R,
    observer: O,
    config: GridConfig,
    grid: Option<ActiveGrid<R::Handle>>,
}

impl<E, R> Session<E, R, NoopObserver>
where
    E: BoundsExtractor,
    R: RenderTarget,
{
    /// Create a session with no observer
    pub const fn new(extractor: E, renderer: R, config: GridConfig) -> Self {
        Self {
            extractor,
            renderer,
            observer: NoopObserver,
            config,
            grid: None,
        }
    }
}

impl<E, R, O> Session<E, R, O>
where
    E: BoundsExtractor,
    R: RenderTarget,
    O: SessionObserver,
{
    /// Replace the observer
    pub fn with_observer<P: SessionObserver>(self, observer: P) -> Session<E, R, P> {
        Session {
            extractor: self.extractor,
            renderer: self.renderer,
            observer,
            config: self.config,
            grid: self.grid,
        }
    }

    /// Analyze a new dataset collection and activate its initial tile
    ///
    /// Any previous collection is discarded and its resident datasets are
    /// unloaded first. Extraction of every handle completes before the grid
    /// is computed; datasets whose extraction fails are excluded and
    /// reported to the observer.
    ///
    /// # Errors
    ///
    /// - [`GridError::InvalidParameter`] when the configuration is invalid
    /// - [`GridError::EmptyInput`] when no dataset could be extracted
    /// - [`GridError::DegenerateFrame`] when the bounds cannot form a grid
    pub async fn analyze(&mut self, handles: Vec<DatasetHandle>) -> Result<GridSummary> {
        self.config.validate()?;
        self.reset();

        let extractor = &self.extractor;
        let results = join_all(handles.iter().map(|handle| extractor.extract(handle))).await;

        let mut datasets = Vec::with_capacity(handles.len());
        let mut failures: Vec<ExtractionError> = Vec::new();
        for (handle, result) in handles.into_iter().zip(results) {
            match result.and_then(|bounding_box| Dataset::new(handle, bounding_box)) {
                Ok(dataset) => datasets.push(dataset),
                Err(error) => failures.push(error),
            }
        }

        for error in &failures {
            warn!(
                dataset = %error.dataset,
                reason = %error.reason,
                "excluding dataset from tiling"
            );
            self.observer.on_extraction_error(error);
        }

        let organization = organize(
            datasets,
            self.config.bucketing_policy,
            self.config.tile_size_multiplier,
        )?;

        let dimensions = organization.store.bounds();
        let navigator = Navigator::new(
            organization.initial_tile,
            dimensions,
            self.config.allow_empty_tile,
        );
        let resident = ResidentSetManager::new(organization.store.datasets().len());
        let grid = ActiveGrid {
            organization,
            navigator,
            resident,
            excluded: failures.into_iter().map(|error| error.dataset).collect(),
        };

        let summary = grid.summary();
        info!(
            policy = %summary.policy,
            grid = %summary.dimensions,
            tile_size = summary.frame.tile_size,
            datasets = summary.dataset_count,
            occupied = summary.occupied_tiles,
            excluded = summary.excluded.len(),
            "analysis complete"
        );
        self.grid = Some(grid);
        self.observer.on_analysis_complete(&summary);

        let _ = self.activate_current(self.config.initial_load_mode).await?;
        Ok(summary)
    }

    /// Move one tile in `direction`, activating the destination with every dataset
    ///
    /// # Errors
    ///
    /// Returns [`GridError::NotAnalyzed`] when no collection has been analyzed
    pub async fn navigate(&mut self, direction: Direction) -> Result<MoveReport> {
        let grid = self.grid.as_mut().ok_or(GridError::NotAnalyzed {
            operation: "navigate",
        })?;
        let outcome = grid
            .navigator
            .try_move(direction, &grid.organization.store);

        let activation = match outcome {
            MoveOutcome::Moved(_) => Some(self.activate_current(LoadMode::All).await?),
            MoveOutcome::Rejected { .. } => None,
        };

        Ok(MoveReport {
            outcome,
            activation,
        })
    }

    /// Re-activate the navigator's current tile under `mode`
    ///
    /// # Errors
    ///
    /// Returns [`GridError::NotAnalyzed`] when no collection has been analyzed
    pub async fn activate_current(&mut self, mode: LoadMode) -> Result<ActivationReport> {
        let Self {
            renderer,
            observer,
            grid,
            ..
        } = self;
        let grid = grid.as_mut().ok_or(GridError::NotAnalyzed {
            operation: "activate a tile",
        })?;

        let tile = grid.navigator.current();
        let plan = grid
            .resident
            .activate(&grid.organization.store, tile, mode);
        let report = apply_plan(renderer, observer, grid, &plan).await;

        renderer.focus(grid.offset_of(tile));
        observer.on_tile_changed(tile, &grid.resident_ids());
        info!(
            tile = %tile,
            mode = %mode,
            loaded = report.loaded.len(),
            unloaded = report.unloaded.len(),
            failed = report.failed.len(),
            "tile activated"
        );

        Ok(report)
    }

    /// Unload everything and forget the analyzed collection
    pub fn reset(&mut self) {
        if let Some(mut grid) = self.grid.take() {
            let released = grid.resident.drain();
            let count = released.len();
            for (_, resource) in released {
                self.renderer.unload(resource);
            }
            info!(unloaded = count, "session reset");
        }
    }

    /// Active tile, once a collection is analyzed
    pub fn current_tile(&self) -> Option<TileCoordinate> {
        self.grid.as_ref().map(|grid| grid.navigator.current())
    }

    /// Identifiers of resident datasets in store order
    pub fn resident_ids(&self) -> Vec<DatasetId> {
        self.grid
            .as_ref()
            .map(ActiveGrid::resident_ids)
            .unwrap_or_default()
    }

    /// Summary of the analyzed collection
    pub fn summary(&self) -> Option<GridSummary> {
        self.grid.as_ref().map(ActiveGrid::summary)
    }

    /// The analyzed organization
    pub fn organization(&self) -> Option<&Organization> {
        self.grid.as_ref().map(|grid| &grid.organization)
    }

    /// The navigator of the analyzed collection
    pub fn navigator(&self) -> Option<&Navigator> {
        self.grid.as_ref().map(|grid| &grid.navigator)
    }

    /// Session configuration
    pub const fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Bounds extractor
    pub const fn extractor(&self) -> &E {
        &self.extractor
    }

    /// Render collaborator
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Observer
    pub const fn observer(&self) -> &O {
        &self.observer
    }
}

/// Unload, then load, everything `plan` lists, recording outcomes
async fn apply_plan<R, O>(
    renderer: &mut R,
    observer: &mut O,
    grid: &mut ActiveGrid<R::Handle>,
    plan: &LoadPlan,
) -> ActivationReport
where
    R: RenderTarget,
    O: SessionObserver,
{
    let mut report = ActivationReport {
        tile: plan.tile,
        mode: plan.mode,
        loaded: Vec::new(),
        unloaded: Vec::new(),
        failed: Vec::new(),
        discarded: 0,
    };

    for &index in &plan.unload {
        if let Some(resource) = grid.resident.release(index) {
            renderer.unload(resource);
            if let Some(id) = grid.organization.store.dataset_id(index) {
                report.unloaded.push(id.clone());
            }
        }
    }

    let offset = grid.offset_of(plan.tile);
    for &index in &plan.load {
        let Some(dataset) = grid.organization.store.dataset(index) else {
            continue;
        };
        let outcome = renderer.load(dataset.handle(), offset).await;

        match grid.resident.complete_load(plan, index, outcome) {
            LoadCompletion::Resident => report.loaded.push(dataset.id().clone()),
            LoadCompletion::Failed(error) => {
                observer.on_load_error(&error);
                report.failed.push(error);
            }
            LoadCompletion::Stale(resource) => {
                renderer.unload(resource);
                report.discarded += 1;
            }
        }
    }

    report
}
