//! Input/output, configuration, and error handling

/// Command-line interface and console observer
pub mod cli;
/// Policy constants and session configuration
pub mod configuration;
/// Error types for analysis passes and per-dataset failures
pub mod error;
/// Tile map PNG export
pub mod image;
/// LAS/LAZ bounds extraction and point loading
pub mod las;
/// Extraction progress display
pub mod progress;
