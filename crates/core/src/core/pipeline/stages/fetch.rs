//! Fetch stage.
//!
//! Copies the instruction at the current PC into the fetch latch, advances
//! the PC by the instruction width, and propagates the instruction into the
//! decode latch. Runs last within a cycle, so it sees decode's state from
//! this cycle: while decode holds a stalled instruction, fetch holds too
//! and re-supplies nothing, leaving the PC untouched.

use crate::common::constants::INSTRUCTION_WIDTH;
use crate::core::pipeline::latch::DispatchPhase;
use crate::core::Cpu;
use crate::isa::Opcode;

/// Advances the fetch stage by one cycle.
pub fn fetch_stage(cpu: &mut Cpu) {
    if !cpu.fetch.enabled {
        return;
    }

    // A branch redirected the PC this cycle; skip exactly one fetch so the
    // target instruction is fetched cleanly next cycle.
    if cpu.suppress_fetch {
        cpu.suppress_fetch = false;
        return;
    }

    // Decode still holds an instruction (hazard or structural stall): the
    // same instruction is re-presented next cycle instead of advancing.
    if cpu.decode.instr.is_some() {
        return;
    }

    let Some(instr) = cpu.instruction_at(cpu.pc) else {
        // PC ran past the loaded program; only possible when the listing
        // is not HALT-terminated. Nothing left to supply.
        cpu.fetch.enabled = false;
        return;
    };

    cpu.fetch.pc = cpu.pc;
    cpu.fetch.instr = Some(instr);
    cpu.pc += INSTRUCTION_WIDTH;

    cpu.decode.pc = cpu.fetch.pc;
    cpu.decode.instr = Some(instr);
    cpu.decode.phase = DispatchPhase::Unchecked;

    // HALT still flows down the pipeline, but nothing follows it.
    if instr.opcode == Opcode::Halt {
        cpu.fetch.enabled = false;
    }
}
