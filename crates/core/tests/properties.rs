//! Property tests: random straight-line programs through the pipeline must
//! produce exactly the architectural state of a sequential interpreter.

use apex_core::isa::{Instruction, Opcode};
use apex_core::{Config, Simulator, StopReason};
use proptest::prelude::*;

const REGS: usize = 16;

fn arb_op() -> impl Strategy<Value = (Opcode, usize, usize, usize, i64)> {
    (
        prop::sample::select(vec![
            Opcode::Movc,
            Opcode::Add,
            Opcode::Addl,
            Opcode::Sub,
            Opcode::Subl,
            Opcode::And,
            Opcode::Or,
            Opcode::Xor,
            Opcode::Mul,
            Opcode::Cmp,
            Opcode::Nop,
        ]),
        0..REGS,
        0..REGS,
        0..REGS,
        -1000i64..1000,
    )
}

fn assemble(ops: &[(Opcode, usize, usize, usize, i64)]) -> Vec<Instruction> {
    let mut program: Vec<Instruction> = ops
        .iter()
        .enumerate()
        .map(|(seq, &(opcode, rd, rs1, rs2, imm))| Instruction {
            opcode,
            rd,
            rs1,
            rs2,
            rs3: 0,
            imm,
            seq: seq as u32,
        })
        .collect();
    program.push(Instruction {
        opcode: Opcode::Halt,
        rd: 0,
        rs1: 0,
        rs2: 0,
        rs3: 0,
        imm: 0,
        seq: ops.len() as u32,
    });
    program
}

/// One-instruction-at-a-time execution, the ground truth for programs
/// without branches or memory traffic.
fn reference_regs(program: &[Instruction]) -> [i64; REGS] {
    let mut regs = [0i64; REGS];
    for instr in program {
        let rs1 = regs[instr.rs1];
        let rs2 = regs[instr.rs2];
        match instr.opcode {
            Opcode::Movc => regs[instr.rd] = instr.imm,
            Opcode::Add => regs[instr.rd] = rs1.wrapping_add(rs2),
            Opcode::Addl => regs[instr.rd] = rs1.wrapping_add(instr.imm),
            Opcode::Sub => regs[instr.rd] = rs1.wrapping_sub(rs2),
            Opcode::Subl => regs[instr.rd] = rs1.wrapping_sub(instr.imm),
            Opcode::And => regs[instr.rd] = rs1 & rs2,
            Opcode::Or => regs[instr.rd] = rs1 | rs2,
            Opcode::Xor => regs[instr.rd] = rs1 ^ rs2,
            Opcode::Mul => regs[instr.rd] = rs1.wrapping_mul(rs2),
            Opcode::Cmp | Opcode::Nop => {}
            Opcode::Halt => break,
            other => unreachable!("{other} not generated here"),
        }
    }
    regs
}

proptest! {
    #[test]
    fn straight_line_matches_sequential_execution(
        ops in prop::collection::vec(arb_op(), 1..40)
    ) {
        let program = assemble(&ops);
        let expected = reference_regs(&program);

        let mut sim = Simulator::new(program.clone(), &Config::default());
        let reason = sim.run(Some(100_000)).expect("no faults on ALU-only programs");

        prop_assert_eq!(reason, StopReason::Halted);
        prop_assert_eq!(sim.cpu.regs, expected);
        prop_assert_eq!(sim.cpu.retired(), program.len() as u64);
        prop_assert_eq!(sim.cpu.in_flight(), 0);
        prop_assert_eq!(sim.cpu.scoreboard.pending(), 0);
    }

    #[test]
    fn repeated_runs_are_deterministic(
        ops in prop::collection::vec(arb_op(), 1..20)
    ) {
        let program = assemble(&ops);

        let mut first = Simulator::new(program.clone(), &Config::default());
        first.run(None).expect("no faults on ALU-only programs");

        let mut second = Simulator::new(program, &Config::default());
        second.run(None).expect("no faults on ALU-only programs");

        prop_assert_eq!(first.cpu.regs, second.cpu.regs);
        prop_assert_eq!(first.cpu.clock, second.cpu.clock);
        prop_assert_eq!(first.cpu.stats.stalls_data, second.cpu.stats.stalls_data);
    }
}
