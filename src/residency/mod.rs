//! Resident set management for the active tile

/// Resident bitset and load/unload bookkeeping
pub mod manager;
/// Load plans and load modes
pub mod plan;

pub use manager::ResidentSetManager;
pub use plan::{LoadMode, LoadPlan};
