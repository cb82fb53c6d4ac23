//! Program loading and the simulation driver loop.

/// Instruction-listing parser.
pub mod loader;
/// Top-level simulator and stop reasons.
pub mod simulator;

pub use loader::{load_program, parse_listing, LoadError};
pub use simulator::{Simulator, StopReason};
