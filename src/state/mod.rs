//! State module for tracking extraction progress
//!
//! # Components
//!
//! - `IdState`: The states of a single document ID (pending, fetching, extracted, written, skipped)
//! - `IdTracker`: Enforces the legal transitions between those states

mod id_state;
mod tracker;

// Re-export main types
pub use id_state::IdState;
pub use tracker::IdTracker;
