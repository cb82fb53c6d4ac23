//! The APEX instruction set.
//!
//! Defines the opcode space, the static [`Instruction`] record produced by
//! the loader, and the operand-role helpers (destination, sources,
//! functional-unit routing) the pipeline stages rely on.

/// Decoded instruction record with its program-order sequence number.
pub mod instruction;
/// Opcode space and per-opcode classification.
pub mod opcode;

pub use instruction::Instruction;
pub use opcode::{FuKind, Opcode};
