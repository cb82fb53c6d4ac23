//! Multiplier unit.
//!
//! Fixed multi-cycle latency from dispatch (3 cycles by default). On the
//! final cycle it computes rs1 × rs2 and sets the zero flag; the completed
//! result is then held until the instruction reaches the retirement queue
//! head, re-checked every cycle.

use crate::common::Fault;
use crate::core::pipeline::units::{hand_off, UnitState};
use crate::core::Cpu;

/// Advances the multiplier by one cycle.
pub fn multiplier_stage(cpu: &mut Cpu) -> Result<(), Fault> {
    let Some(instr) = cpu.multiplier.instr else {
        return Ok(());
    };

    if cpu.multiplier.advance() {
        // Latency expired this cycle: compute now, commit later.
        cpu.multiplier.result = cpu
            .multiplier
            .rs1_value
            .wrapping_mul(cpu.multiplier.rs2_value);
        cpu.zero_flag = cpu.multiplier.result == 0;
    }
    if !matches!(cpu.multiplier.state, UnitState::Ready) {
        return Ok(());
    }

    if cpu.retire.is_empty() {
        return Err(Fault::RetireQueueUnderflow { seq: instr.seq });
    }
    if !cpu.retire.at_head(instr.seq) {
        return Ok(());
    }

    let slot = cpu.multiplier;
    hand_off(cpu, &slot, instr)?;
    cpu.multiplier.clear();
    Ok(())
}
