//! Seams to the external collaborators: bounds extraction, rendering, and UI
//!
//! Extraction and loading are asynchronous; the session awaits them but
//! needs no particular runtime. Observer callbacks are purely informational.

use crate::io::error::{ExtractionError, LoadError};
use crate::session::controller::GridSummary;
use crate::spatial::bounds::{BoundingBox, DatasetHandle, DatasetId, PositionOffset};
use crate::spatial::coordinate::TileCoordinate;

/// Determines a dataset's axis-aligned bounding box
pub trait BoundsExtractor {
    /// Decode enough of the dataset to report its bounds
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError`] when the dataset cannot be decoded
    fn extract(
        &self,
        handle: &DatasetHandle,
    ) -> impl Future<Output = Result<BoundingBox, ExtractionError>>;
}

/// Places decoded datasets in a scene and frames the camera
pub trait RenderTarget {
    /// Resource kept for a loaded dataset until it is unloaded
    type Handle;

    /// Decode a dataset and place it translated by `offset`
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] when the dataset cannot be decoded or placed
    fn load(
        &mut self,
        handle: &DatasetHandle,
        offset: PositionOffset,
    ) -> impl Future<Output = Result<Self::Handle, LoadError>>;

    /// Dispose of a previously loaded dataset
    fn unload(&mut self, resource: Self::Handle);

    /// Retarget the camera on a world point
    fn focus(&mut self, point: [f64; 3]);
}

/// Receives session events for presentation
pub trait SessionObserver {
    /// A dataset collection finished analysis
    fn on_analysis_complete(&mut self, _summary: &GridSummary) {}

    /// The active tile changed; `datasets` lists what is now resident
    fn on_tile_changed(&mut self, _tile: TileCoordinate, _datasets: &[DatasetId]) {}

    /// A planned load failed
    fn on_load_error(&mut self, _error: &LoadError) {}

    /// A dataset was excluded because its bounds could not be determined
    fn on_extraction_error(&mut self, _error: &ExtractionError) {}
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}
