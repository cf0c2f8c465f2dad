//! Session orchestration and collaborator seams

/// Traits for the extractor, render target, and observer collaborators
pub mod collaborators;
/// Session driving analysis, navigation, and residency
pub mod controller;

pub use collaborators::{BoundsExtractor, NoopObserver, RenderTarget, SessionObserver};
pub use controller::{ActivationReport, GridSummary, MoveReport, Session};
