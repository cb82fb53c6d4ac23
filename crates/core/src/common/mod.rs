//! Common types and constants shared across the simulator.

/// Architectural constants (PC base, memory sizes, register count).
pub mod constants;
/// Fault taxonomy and simulation errors.
pub mod error;

pub use error::{Fault, SimError};
