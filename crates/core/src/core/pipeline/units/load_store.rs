//! Load/store unit.
//!
//! Fixed multi-cycle latency from dispatch (4 cycles by default). On the
//! final cycle it computes the effective address — base + immediate for
//! LOAD/STORE, base + index for LDR/STR — and performs the memory access.
//! Loads carry the read value to writeback; a store writes memory at
//! computation time, has no result, but still waits for its turn at the
//! retirement queue head before the unit is freed.
//!
//! Addresses outside data memory fault the simulation; memory is never
//! silently wrapped.

use crate::common::Fault;
use crate::core::pipeline::units::{hand_off, UnitState};
use crate::core::Cpu;
use crate::isa::{Instruction, Opcode};

/// Advances the load/store unit by one cycle.
pub fn load_store_stage(cpu: &mut Cpu) -> Result<(), Fault> {
    let Some(instr) = cpu.load_store.instr else {
        return Ok(());
    };

    if cpu.load_store.advance() {
        access_memory(cpu, &instr)?;
    }
    if !matches!(cpu.load_store.state, UnitState::Ready) {
        return Ok(());
    }

    if cpu.retire.is_empty() {
        return Err(Fault::RetireQueueUnderflow { seq: instr.seq });
    }
    if !cpu.retire.at_head(instr.seq) {
        return Ok(());
    }

    let slot = cpu.load_store;
    hand_off(cpu, &slot, instr)?;
    cpu.load_store.clear();
    Ok(())
}

/// Computes the effective address and performs the access.
fn access_memory(cpu: &mut Cpu, instr: &Instruction) -> Result<(), Fault> {
    let rs1 = cpu.load_store.rs1_value;
    let rs2 = cpu.load_store.rs2_value;
    let rs3 = cpu.load_store.rs3_value;

    match instr.opcode {
        Opcode::Load => {
            let addr = rs1.wrapping_add(instr.imm);
            cpu.load_store.mem_address = addr;
            cpu.load_store.result = cpu.read_memory(addr, instr.seq)?;
        }
        Opcode::Store => {
            let addr = rs2.wrapping_add(instr.imm);
            cpu.load_store.mem_address = addr;
            cpu.write_memory(addr, rs1, instr.seq)?;
        }
        Opcode::Ldr => {
            let addr = rs1.wrapping_add(rs2);
            cpu.load_store.mem_address = addr;
            cpu.load_store.result = cpu.read_memory(addr, instr.seq)?;
        }
        Opcode::Str => {
            let addr = rs1.wrapping_add(rs2);
            cpu.load_store.mem_address = addr;
            cpu.write_memory(addr, rs3, instr.seq)?;
        }
        _ => unreachable!("{} is not routed to the load/store unit", instr.opcode),
    }
    Ok(())
}
