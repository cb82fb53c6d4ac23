//! Stage latches for the non-execute pipeline stages.
//!
//! Each latch is exclusively owned by its stage and overwritten whenever the
//! stage receives a new instruction. Instructions are copied latch-to-latch,
//! never shared, so no two stages ever alias the same in-flight state.
//! Functional-unit slots live in [`crate::core::pipeline::units`].

use crate::isa::Instruction;

/// Progress of an instruction through the dispatch logic in Decode.
///
/// Hazard and operand logic runs exactly once; a unit-busy retry re-checks
/// only unit availability.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DispatchPhase {
    /// Hazard check and operand read have not run yet.
    #[default]
    Unchecked,
    /// Hazards cleared and operands read; waiting for the target functional
    /// unit to free up. No register-file or scoreboard access on retry.
    AwaitingUnit,
}

/// Fetch stage state.
///
/// `enabled` is the latch's occupied flag: cleared when HALT is fetched so
/// nothing follows it, re-raised by a taken branch. The last fetched
/// instruction is kept for trace display.
#[derive(Clone, Copy, Debug, Default)]
pub struct FetchLatch {
    /// Whether fetch supplies instructions at all.
    pub enabled: bool,
    /// PC of the most recently fetched instruction.
    pub pc: u64,
    /// Most recently fetched instruction, for trace display.
    pub instr: Option<Instruction>,
}

/// Decode/dispatch stage latch.
#[derive(Clone, Copy, Debug, Default)]
pub struct DecodeLatch {
    /// Fetch-time PC of the held instruction.
    pub pc: u64,
    /// The held instruction; `None` means the latch is free.
    pub instr: Option<Instruction>,
    /// Dispatch progress across stall cycles.
    pub phase: DispatchPhase,
    /// Resolved rs1 value, valid once `phase` is `AwaitingUnit`.
    pub rs1_value: i64,
    /// Resolved rs2 value.
    pub rs2_value: i64,
    /// Resolved rs3 value.
    pub rs3_value: i64,
}

impl DecodeLatch {
    /// Empties the latch, e.g. when dispatch succeeds or a taken branch
    /// flushes the not-yet-dispatched instruction.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Writeback stage latch: one completed instruction per cycle at most.
#[derive(Clone, Copy, Debug, Default)]
pub struct WritebackLatch {
    /// Fetch-time PC of the retiring instruction.
    pub pc: u64,
    /// The retiring instruction; `None` means the latch is free.
    pub instr: Option<Instruction>,
    /// Result to write to the destination register, where one exists.
    pub result: i64,
    /// Effective address computed by the load/store unit, for trace display.
    pub mem_address: i64,
}

impl WritebackLatch {
    /// Empties the latch after retirement.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
