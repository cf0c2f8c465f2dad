//! Error types for grid analysis and per-dataset failures
//!
//! Fatal errors abort a whole analysis pass and surface as [`GridError`].
//! Per-dataset failures ([`ExtractionError`], [`LoadError`]) never abort a
//! batch; they are collected into reports and forwarded to the observer.

use std::fmt;
use std::path::PathBuf;

use crate::spatial::bounds::DatasetId;

/// Main error type for analysis passes and crate operations
#[derive(Debug)]
pub enum GridError {
    /// No usable datasets were supplied to the organizer
    EmptyInput,

    /// The global bounding region cannot produce a usable tile size
    ///
    /// Occurs when every dataset has zero extent on both X and Y, or when
    /// the computed tile size is not finite.
    DegenerateFrame {
        /// Description of the degenerate quantity
        reason: String,
    },

    /// Configuration parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// An operation needed an analysed grid but none exists yet
    NotAnalyzed {
        /// Operation that was attempted
        operation: &'static str,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Failed to save the tile map image
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => {
                write!(f, "No datasets available to organize into tiles")
            }
            Self::DegenerateFrame { reason } => {
                write!(f, "Degenerate grid frame: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::NotAnalyzed { operation } => {
                write!(f, "Cannot {operation} before a dataset collection is analyzed")
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export tile map to '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for GridError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FileSystem { source, .. } => Some(source),
            Self::ImageExport { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl GridError {
    /// Whether the error came from the dataset collection itself
    ///
    /// Callers use this to decide whether retrying with a different folder
    /// makes sense, as opposed to fixing configuration or the environment.
    pub const fn is_analysis_failure(&self) -> bool {
        matches!(self, Self::EmptyInput | Self::DegenerateFrame { .. })
    }
}

/// Convenience type alias for crate results
pub type Result<T> = std::result::Result<T, GridError>;

/// Bounding box extraction failure for one dataset
///
/// The dataset is excluded from tiling for the rest of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionError {
    /// Dataset whose bounding box could not be determined
    pub dataset: DatasetId,
    /// Decoder or validation message
    pub reason: String,
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to extract bounds of '{}': {}", self.dataset, self.reason)
    }
}

impl std::error::Error for ExtractionError {}

/// Resident-set load failure for one dataset
///
/// The dataset stays non-resident; other loads in the same plan proceed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    /// Dataset that failed to load
    pub dataset: DatasetId,
    /// Decoder or renderer message
    pub reason: String,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to load '{}': {}", self.dataset, self.reason)
    }
}

impl std::error::Error for LoadError {}

impl From<std::io::Error> for GridError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> GridError {
    GridError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a degenerate frame error
pub fn degenerate_frame(reason: &impl ToString) -> GridError {
    GridError::DegenerateFrame {
        reason: reason.to_string(),
    }
}

/// Attach a path and operation to an I/O error
pub fn file_system_error(
    path: impl Into<PathBuf>,
    operation: &'static str,
    source: std::io::Error,
) -> GridError {
    GridError::FileSystem {
        path: path.into(),
        operation,
        source,
    }
}
