//! Test game implementations for search validation.
//!
//! These exist to verify the engine's behavior in a controlled setting; the
//! real rules engine lives with the host application.

pub mod court;

pub use court::{CourtCard, CourtState, MaterialHeuristic};
