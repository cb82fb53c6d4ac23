//! Decode / dispatch stage.
//!
//! Runs the dispatch state machine over the decode latch:
//!
//! 1. `Unchecked` — hazard check against the scoreboard (destination and
//!    every source register the opcode actually uses). A set bit stalls
//!    dispatch for this cycle; the check re-runs next cycle. Once clear,
//!    operands are read from the register file and the stage falls through
//!    to the unit check within the same cycle.
//! 2. `AwaitingUnit` — only unit availability is re-checked; operands are
//!    not re-read and the scoreboard is untouched.
//!
//! On dispatch the destination register is reserved (only now — after the
//! unit is confirmed free, so no rollback path exists), the sequence number
//! is appended to the retirement queue, the unit slot is filled with the
//! unit's latency, and the decode latch is cleared.

use crate::common::Fault;
use crate::core::pipeline::latch::DispatchPhase;
use crate::core::Cpu;
use crate::isa::FuKind;

/// Advances the decode/dispatch stage by one cycle.
pub fn decode_stage(cpu: &mut Cpu) -> Result<(), Fault> {
    let Some(instr) = cpu.decode.instr else {
        return Ok(());
    };

    if cpu.decode.phase == DispatchPhase::Unchecked {
        let hazard = instr
            .destination()
            .into_iter()
            .chain(instr.sources().into_iter().flatten())
            .any(|reg| cpu.scoreboard.is_busy(reg));
        if hazard {
            cpu.stats.stalls_data += 1;
            return Ok(());
        }

        // Hazards clear: read operands once. MOVC and the branches read
        // nothing; their slots stay zero.
        let [s1, s2, s3] = instr.sources();
        cpu.decode.rs1_value = s1.map_or(0, |r| cpu.regs[r]);
        cpu.decode.rs2_value = s2.map_or(0, |r| cpu.regs[r]);
        cpu.decode.rs3_value = s3.map_or(0, |r| cpu.regs[r]);
        cpu.decode.phase = DispatchPhase::AwaitingUnit;
    }

    let (unit_free, latency) = match instr.opcode.unit() {
        FuKind::Integer => (cpu.integer.is_free(), cpu.timing.integer),
        FuKind::Multiplier => (cpu.multiplier.is_free(), cpu.timing.multiplier),
        FuKind::LoadStore => (cpu.load_store.is_free(), cpu.timing.load_store),
    };
    if !unit_free {
        cpu.stats.stalls_structural += 1;
        return Ok(());
    }

    if let Some(rd) = instr.destination() {
        if !cpu.scoreboard.reserve(rd) {
            return Err(Fault::ScoreboardDoubleReserve {
                reg: rd,
                seq: instr.seq,
            });
        }
    }
    cpu.retire.push(instr.seq)?;

    let latch = cpu.decode;
    match instr.opcode.unit() {
        FuKind::Integer => cpu.integer.accept(&latch, instr, latency),
        FuKind::Multiplier => cpu.multiplier.accept(&latch, instr, latency),
        FuKind::LoadStore => cpu.load_store.accept(&latch, instr, latency),
    }
    cpu.decode.clear();

    tracing::trace!(seq = instr.seq, unit = ?instr.opcode.unit(), "dispatched");
    Ok(())
}
