//! Integer ALU.
//!
//! Executes every opcode not routed to the multiplier or load/store unit:
//! the binary/immediate arithmetic and logic operations, CMP (flag only),
//! MOVC, DIV, the conditional branches, NOP and HALT. One cycle of latency,
//! but computation is deferred until the instruction is at the retirement
//! queue head: branches must resolve against a zero flag that no older
//! in-flight instruction can still change, and the redirect they may
//! trigger (see [`crate::core::pipeline::branch`]) happens at resolution
//! time. Handoff to writeback follows in the same cycle the unit computes.

use crate::common::Fault;
use crate::core::pipeline::branch;
use crate::core::pipeline::units::{hand_off, UnitState};
use crate::core::Cpu;
use crate::isa::{Instruction, Opcode};

/// Advances the integer unit by one cycle.
pub fn integer_stage(cpu: &mut Cpu) -> Result<(), Fault> {
    let Some(instr) = cpu.integer.instr else {
        return Ok(());
    };

    let _ = cpu.integer.advance();
    if !matches!(cpu.integer.state, UnitState::Ready) {
        return Ok(());
    }

    if cpu.retire.is_empty() {
        return Err(Fault::RetireQueueUnderflow { seq: instr.seq });
    }
    if !cpu.retire.at_head(instr.seq) {
        // Holding state: re-check the head condition every cycle.
        return Ok(());
    }

    cpu.integer.result = execute(cpu, &instr)?;
    let slot = cpu.integer;
    hand_off(cpu, &slot, instr)?;
    cpu.integer.clear();
    Ok(())
}

/// Computes the instruction's result, updates the zero flag, and resolves
/// branches. Returns the value carried to writeback (0 for opcodes with no
/// result).
fn execute(cpu: &mut Cpu, instr: &Instruction) -> Result<i64, Fault> {
    let rs1 = cpu.integer.rs1_value;
    let rs2 = cpu.integer.rs2_value;

    let result = match instr.opcode {
        Opcode::Add => rs1.wrapping_add(rs2),
        Opcode::Addl => rs1.wrapping_add(instr.imm),
        Opcode::Sub => rs1.wrapping_sub(rs2),
        Opcode::Subl => rs1.wrapping_sub(instr.imm),
        Opcode::And => rs1 & rs2,
        Opcode::Or => rs1 | rs2,
        Opcode::Xor => rs1 ^ rs2,
        Opcode::Movc => instr.imm,
        Opcode::Div => {
            if rs2 == 0 {
                return Err(Fault::DivideByZero { seq: instr.seq });
            }
            rs1.wrapping_div(rs2)
        }
        Opcode::Cmp => {
            cpu.zero_flag = rs1 == rs2;
            return Ok(0);
        }
        Opcode::Bz => {
            if cpu.zero_flag {
                let branch_pc = cpu.integer.pc;
                branch::redirect(cpu, branch_pc, instr.imm);
            }
            return Ok(0);
        }
        Opcode::Bnz => {
            if !cpu.zero_flag {
                let branch_pc = cpu.integer.pc;
                branch::redirect(cpu, branch_pc, instr.imm);
            }
            return Ok(0);
        }
        Opcode::Nop | Opcode::Halt => return Ok(0),
        Opcode::Mul | Opcode::Load | Opcode::Store | Opcode::Ldr | Opcode::Str => {
            unreachable!("{} is not routed to the integer unit", instr.opcode)
        }
    };

    cpu.zero_flag = result == 0;
    Ok(result)
}
