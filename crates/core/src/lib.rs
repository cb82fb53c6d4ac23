//! Cycle-accurate simulator of the APEX pipelined processor.
//!
//! This crate models a small pipelined CPU with the following:
//! 1. **Pipeline:** Fetch, decode/dispatch, three variable-latency
//!    functional units (integer, multiplier, load/store), and writeback,
//!    advanced in reverse order each cycle to emulate synchronous latches.
//! 2. **Hazards:** A per-register scoreboard stalls dispatch on data
//!    hazards; a bounded retirement queue enforces in-order commit over
//!    out-of-order-completing units.
//! 3. **Control:** Branches resolve in the integer unit, redirecting the
//!    PC and flushing not-yet-dispatched younger state.
//! 4. **Simulation:** An instruction-listing loader, a driver loop with
//!    cycle budgets and single-stepping, and run statistics.

/// Common types and constants (architectural constants, faults).
pub mod common;
/// Simulator configuration (defaults, JSON loading).
pub mod config;
/// CPU state and the pipeline.
pub mod core;
/// The APEX instruction set.
pub mod isa;
/// Program loading and the driver loop.
pub mod sim;
/// Run statistics.
pub mod stats;

pub use crate::common::{Fault, SimError};
pub use crate::config::Config;
pub use crate::core::Cpu;
pub use crate::isa::{Instruction, Opcode};
pub use crate::sim::{Simulator, StopReason};
