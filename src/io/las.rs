//! LAS/LAZ collaborators: header bounds extraction and point buffer loading
//!
//! Extraction only reads the file header, so analysing a folder stays cheap
//! even for large clouds. Loading decodes every point record into a
//! tile-local position buffer that is held until the dataset is unloaded.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use las::Reader;
use tracing::debug;

use crate::io::configuration::POINT_CLOUD_EXTENSIONS;
use crate::io::error::{ExtractionError, LoadError, Result, file_system_error};
use crate::io::progress::ProgressManager;
use crate::session::collaborators::{BoundsExtractor, RenderTarget};
use crate::spatial::bounds::{BoundingBox, DatasetHandle, DatasetId, PositionOffset};

/// Open a LAS or LAZ file for reading
fn create_reader(path: &Path) -> std::result::Result<Reader, String> {
    let file = File::open(path).map_err(|e| format!("cannot open file: {e}"))?;
    Reader::new(BufReader::new(file)).map_err(|e| format!("invalid LAS header: {e}"))
}

/// Bounding box recorded in a LAS/LAZ header
///
/// # Errors
///
/// Returns a message when the file cannot be opened, its header is invalid,
/// or it declares no points
pub fn read_header_bounds(path: &Path) -> std::result::Result<BoundingBox, String> {
    let reader = create_reader(path)?;
    let header = reader.header();
    if header.number_of_points() == 0 {
        return Err("file declares no points".to_string());
    }

    let bounds = header.bounds();
    Ok(BoundingBox::from_corners(
        [bounds.min.x, bounds.min.y, bounds.min.z],
        [bounds.max.x, bounds.max.y, bounds.max.z],
    ))
}

/// Point-cloud files directly inside `dir`, sorted by path
///
/// # Errors
///
/// Returns [`crate::GridError::FileSystem`] when the directory cannot be read
pub fn scan_folder(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| file_system_error(dir, "read_dir", e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| file_system_error(dir, "read_dir", e))?.path();
        if path.is_file() && is_point_cloud_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Whether the extension marks a LAS or LAZ file, ignoring case
pub fn is_point_cloud_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            POINT_CLOUD_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Extracts dataset bounds from LAS/LAZ headers
#[derive(Default)]
pub struct LasHeaderExtractor {
    progress: Option<ProgressManager>,
}

impl LasHeaderExtractor {
    /// Create an extractor without progress display
    pub const fn new() -> Self {
        Self { progress: None }
    }

    /// Create an extractor that ticks `progress` once per dataset
    pub const fn with_progress(progress: ProgressManager) -> Self {
        Self {
            progress: Some(progress),
        }
    }

    /// Clear the progress display, if any
    pub fn finish(&self) {
        if let Some(progress) = &self.progress {
            progress.finish();
        }
    }
}

impl BoundsExtractor for LasHeaderExtractor {
    async fn extract(
        &self,
        handle: &DatasetHandle,
    ) -> std::result::Result<BoundingBox, ExtractionError> {
        let result = read_header_bounds(&handle.path).map_err(|reason| ExtractionError {
            dataset: handle.id.clone(),
            reason,
        });

        if let Some(progress) = &self.progress {
            progress.complete_dataset(&handle.id, result.is_ok());
        }
        result
    }
}

/// Opaque reference to a resident point buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferHandle(u64);

/// Decoded, tile-local positions of one dataset
#[derive(Debug, Clone, PartialEq)]
pub struct PointBuffer {
    /// Dataset the points came from
    pub dataset: DatasetId,
    /// Positions relative to the dataset centre, shifted by the tile offset
    pub positions: Vec<[f32; 3]>,
}

/// Headless render target that keeps decoded point buffers in memory
#[derive(Debug, Default)]
pub struct LasPointLoader {
    buffers: BTreeMap<BufferHandle, PointBuffer>,
    next_handle: u64,
    focus: Option<[f64; 3]>,
}

impl LasPointLoader {
    /// Create a loader with nothing resident
    pub const fn new() -> Self {
        Self {
            buffers: BTreeMap::new(),
            next_handle: 0,
            focus: None,
        }
    }

    /// Number of resident buffers
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Total points across resident buffers
    pub fn resident_point_count(&self) -> usize {
        self.buffers.values().map(|buffer| buffer.positions.len()).sum()
    }

    /// Buffer behind `handle`, while resident
    pub fn buffer(&self, handle: BufferHandle) -> Option<&PointBuffer> {
        self.buffers.get(&handle)
    }

    /// Last camera target
    pub const fn focus_point(&self) -> Option<[f64; 3]> {
        self.focus
    }
}

/// Decode every point of `path`, centred on its header bounds and moved by `offset`
///
/// # Errors
///
/// Returns a message when the file or any point record cannot be read
pub fn decode_points(
    path: &Path,
    offset: PositionOffset,
) -> std::result::Result<Vec<[f32; 3]>, String> {
    let mut reader = create_reader(path)?;
    let header = reader.header();
    let bounds = header.bounds();
    let center = [
        (bounds.min.x + bounds.max.x) / 2.0,
        (bounds.min.y + bounds.max.y) / 2.0,
        (bounds.min.z + bounds.max.z) / 2.0,
    ];

    // Sized by the records actually read, never by the header's point count
    reader
        .points()
        .map(|point_result| -> std::result::Result<[f32; 3], String> {
            let point = point_result.map_err(|e| format!("invalid point record: {e}"))?;
            Ok([
                (point.x - center[0] + offset[0]) as f32,
                (point.y - center[1] + offset[1]) as f32,
                (point.z - center[2] + offset[2]) as f32,
            ])
        })
        .collect()
}

impl RenderTarget for LasPointLoader {
    type Handle = BufferHandle;

    async fn load(
        &mut self,
        handle: &DatasetHandle,
        offset: PositionOffset,
    ) -> std::result::Result<BufferHandle, LoadError> {
        let positions = decode_points(&handle.path, offset).map_err(|reason| LoadError {
            dataset: handle.id.clone(),
            reason,
        })?;

        let buffer_handle = BufferHandle(self.next_handle);
        self.next_handle += 1;
        debug!(dataset = %handle.id, points = positions.len(), "point buffer resident");
        let _ = self.buffers.insert(
            buffer_handle,
            PointBuffer {
                dataset: handle.id.clone(),
                positions,
            },
        );
        Ok(buffer_handle)
    }

    fn unload(&mut self, resource: BufferHandle) {
        if let Some(buffer) = self.buffers.remove(&resource) {
            debug!(
                dataset = %buffer.dataset,
                points = buffer.positions.len(),
                "point buffer released"
            );
        }
    }

    fn focus(&mut self, point: [f64; 3]) {
        self.focus = Some(point);
    }
}
