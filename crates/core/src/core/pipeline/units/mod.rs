//! Functional units: integer ALU, multiplier, load/store.
//!
//! Each unit holds at most one in-flight instruction in a [`UnitSlot`] and
//! steps a small state machine per cycle: `Busy` counts down the unit's
//! latency, `Ready` waits for the instruction's turn at the retirement
//! queue head. All three units share the queue-gating discipline; they
//! differ in latency and in what "compute" means.
//!
//! The integer unit defers computation until its instruction is at the
//! queue head (branches must resolve against the committed zero flag); the
//! multiplier and load/store unit compute at latency expiry and hold the
//! completed result in `Ready` until they reach the head.

/// Integer ALU and branch resolution.
pub mod integer;
/// Load/store unit.
pub mod load_store;
/// Multiplier.
pub mod multiplier;

use crate::common::Fault;
use crate::core::pipeline::latch::DecodeLatch;
use crate::core::Cpu;
use crate::isa::Instruction;

/// Execution state of a functional unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnitState {
    /// No instruction in flight.
    #[default]
    Idle,
    /// Executing; `remaining` cycles until the result is due.
    Busy {
        /// Cycles left including the current one.
        remaining: u64,
    },
    /// Latency elapsed; waiting for the retirement-queue head.
    Ready,
}

/// The single in-flight instruction slot of a functional unit.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnitSlot {
    /// Fetch-time PC of the held instruction.
    pub pc: u64,
    /// The held instruction; `None` means the unit is free.
    pub instr: Option<Instruction>,
    /// Resolved rs1 value.
    pub rs1_value: i64,
    /// Resolved rs2 value.
    pub rs2_value: i64,
    /// Resolved rs3 value.
    pub rs3_value: i64,
    /// Computed result, valid once the unit has executed.
    pub result: i64,
    /// Computed effective address (load/store only).
    pub mem_address: i64,
    /// State machine position.
    pub state: UnitState,
}

impl UnitSlot {
    /// Whether the unit can accept a dispatch this cycle.
    #[inline]
    pub fn is_free(&self) -> bool {
        self.instr.is_none()
    }

    /// Accepts an instruction from the decode latch with the unit's
    /// latency. The latch's resolved operands are copied in; the decode
    /// latch itself is cleared by the dispatcher.
    pub fn accept(&mut self, latch: &DecodeLatch, instr: Instruction, latency: u64) {
        *self = UnitSlot {
            pc: latch.pc,
            instr: Some(instr),
            rs1_value: latch.rs1_value,
            rs2_value: latch.rs2_value,
            rs3_value: latch.rs3_value,
            result: 0,
            mem_address: 0,
            state: UnitState::Busy { remaining: latency },
        };
    }

    /// Frees the unit after handoff to writeback.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Advances the latency countdown by one cycle. Returns `true` when the
    /// countdown expires this cycle (the unit should compute / go `Ready`).
    /// Returns `false` while still counting or when already `Ready`.
    pub fn advance(&mut self) -> bool {
        match self.state {
            UnitState::Busy { remaining } if remaining > 1 => {
                self.state = UnitState::Busy {
                    remaining: remaining - 1,
                };
                false
            }
            UnitState::Busy { .. } => {
                self.state = UnitState::Ready;
                true
            }
            UnitState::Idle | UnitState::Ready => false,
        }
    }
}

/// Copies a completed instruction into the writeback latch. At most one
/// unit can be at the queue head per cycle; a second handoff in the same
/// cycle is an internal fault. The caller clears its own slot on success.
pub(crate) fn hand_off(cpu: &mut Cpu, slot: &UnitSlot, instr: Instruction) -> Result<(), Fault> {
    if cpu.writeback.instr.is_some() {
        return Err(Fault::WritebackCollision { seq: instr.seq });
    }
    cpu.writeback.pc = slot.pc;
    cpu.writeback.instr = Some(instr);
    cpu.writeback.result = slot.result;
    cpu.writeback.mem_address = slot.mem_address;
    tracing::trace!(seq = instr.seq, "unit handoff to writeback");
    Ok(())
}
