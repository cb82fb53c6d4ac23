//! Writeback / retirement stage.
//!
//! The single point where architectural register state becomes permanently
//! visible and the only point where scoreboard bits are released. Pops the
//! retirement queue head (which must match the retiring instruction — the
//! units' queue gating guarantees it), writes the result to the destination
//! register where one exists, and counts the instruction as retired.
//! Retiring HALT signals termination to the driver loop.

use crate::common::Fault;
use crate::core::Cpu;
use crate::isa::Opcode;

/// Advances the writeback stage by one cycle. Returns `true` when HALT
/// retires.
pub fn writeback_stage(cpu: &mut Cpu) -> Result<bool, Fault> {
    let Some(instr) = cpu.writeback.instr else {
        return Ok(false);
    };

    cpu.retire.pop(instr.seq)?;

    if let Some(rd) = instr.destination() {
        cpu.regs[rd] = cpu.writeback.result;
        cpu.scoreboard.release(rd);
    }

    cpu.stats.instructions_retired += 1;
    tracing::trace!(seq = instr.seq, "retired");

    let halted = instr.opcode == Opcode::Halt;
    cpu.writeback.clear();
    Ok(halted)
}
