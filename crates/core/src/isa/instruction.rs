//! The static instruction record.
//!
//! An [`Instruction`] is immutable once produced by the loader. The pipeline
//! copies it between stage latches; nothing downstream ever mutates it.
//! The `Display` impl renders the listing form used in per-cycle traces.

use std::fmt;

use crate::isa::opcode::Opcode;

/// One loaded instruction with resolved fields and its program-order
/// sequence number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    /// Operation.
    pub opcode: Opcode,
    /// Destination register index.
    pub rd: usize,
    /// First source register index.
    pub rs1: usize,
    /// Second source register index.
    pub rs2: usize,
    /// Third source register index (STR's store-data register).
    pub rs3: usize,
    /// Sign-extended immediate.
    pub imm: i64,
    /// Sequence number assigned at load time, monotonically increasing in
    /// program order.
    pub seq: u32,
}

impl Instruction {
    /// The destination register, if this opcode writes one.
    pub fn destination(&self) -> Option<usize> {
        self.opcode.writes_dest().then_some(self.rd)
    }

    /// The source registers this instruction actually reads, in rs1/rs2/rs3
    /// slot order. Unused slots are `None`; the hazard check must not look
    /// at them.
    pub fn sources(&self) -> [Option<usize>; 3] {
        match self.opcode {
            Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Div
            | Opcode::And
            | Opcode::Or
            | Opcode::Xor
            | Opcode::Cmp
            | Opcode::Store
            | Opcode::Ldr => [Some(self.rs1), Some(self.rs2), None],
            Opcode::Addl | Opcode::Subl | Opcode::Load => [Some(self.rs1), None, None],
            Opcode::Str => [Some(self.rs1), Some(self.rs2), Some(self.rs3)],
            Opcode::Movc | Opcode::Bz | Opcode::Bnz | Opcode::Nop | Opcode::Halt => {
                [None, None, None]
            }
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.opcode.mnemonic();
        match self.opcode {
            Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Div
            | Opcode::And
            | Opcode::Or
            | Opcode::Xor
            | Opcode::Ldr => {
                write!(f, "{m},R{},R{},R{}", self.rd, self.rs1, self.rs2)?;
            }
            Opcode::Addl | Opcode::Subl => {
                write!(f, "{m},R{},R{},#{}", self.rd, self.rs1, self.imm)?;
            }
            Opcode::Cmp => write!(f, "{m},R{},R{}", self.rs1, self.rs2)?,
            Opcode::Movc => write!(f, "{m},R{},#{}", self.rd, self.imm)?,
            Opcode::Load => write!(f, "{m},R{},R{},#{}", self.rd, self.rs1, self.imm)?,
            Opcode::Store => write!(f, "{m},R{},R{},#{}", self.rs1, self.rs2, self.imm)?,
            Opcode::Str => write!(f, "{m},R{},R{},R{}", self.rs3, self.rs1, self.rs2)?,
            Opcode::Bz | Opcode::Bnz => write!(f, "{m},#{}", self.imm)?,
            Opcode::Nop | Opcode::Halt => write!(f, "{m}")?,
        }
        write!(f, "  I{}", self.seq)
    }
}
