//! Grid navigation state machine

/// Current-tile tracking with boundary and occupancy checks
pub mod navigator;

pub use navigator::{MoveOutcome, Navigator, RejectReason};
