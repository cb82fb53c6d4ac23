//! APEX opcodes and their static classification.
//!
//! Everything the pipeline needs to know about an opcode that does not
//! depend on operand values lives here: which functional unit executes it,
//! whether it writes a destination register, and whether it is a branch.

use std::fmt;
use std::str::FromStr;

/// The functional unit an opcode executes on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FuKind {
    /// Single-cycle integer ALU; also resolves branches and HALT/NOP.
    Integer,
    /// Multi-cycle multiplier.
    Multiplier,
    /// Multi-cycle load/store unit.
    LoadStore,
}

/// The APEX opcode space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Opcode {
    Add,
    Addl,
    Sub,
    Subl,
    Mul,
    Div,
    And,
    Or,
    Xor,
    Cmp,
    Movc,
    Load,
    Store,
    Ldr,
    Str,
    Bz,
    Bnz,
    Nop,
    Halt,
}

impl Opcode {
    /// The functional unit this opcode is routed to at dispatch.
    pub fn unit(self) -> FuKind {
        match self {
            Opcode::Mul => FuKind::Multiplier,
            Opcode::Load | Opcode::Store | Opcode::Ldr | Opcode::Str => FuKind::LoadStore,
            _ => FuKind::Integer,
        }
    }

    /// Whether this opcode writes a destination register at retirement.
    /// Only these opcodes reserve a scoreboard bit at dispatch.
    pub fn writes_dest(self) -> bool {
        matches!(
            self,
            Opcode::Add
                | Opcode::Addl
                | Opcode::Sub
                | Opcode::Subl
                | Opcode::Mul
                | Opcode::Div
                | Opcode::And
                | Opcode::Or
                | Opcode::Xor
                | Opcode::Movc
                | Opcode::Load
                | Opcode::Ldr
        )
    }

    /// Whether this opcode is a conditional branch resolved in the integer
    /// unit.
    pub fn is_branch(self) -> bool {
        matches!(self, Opcode::Bz | Opcode::Bnz)
    }

    /// The mnemonic as it appears in instruction listings.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Add => "ADD",
            Opcode::Addl => "ADDL",
            Opcode::Sub => "SUB",
            Opcode::Subl => "SUBL",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Xor => "XOR",
            Opcode::Cmp => "CMP",
            Opcode::Movc => "MOVC",
            Opcode::Load => "LOAD",
            Opcode::Store => "STORE",
            Opcode::Ldr => "LDR",
            Opcode::Str => "STR",
            Opcode::Bz => "BZ",
            Opcode::Bnz => "BNZ",
            Opcode::Nop => "NOP",
            Opcode::Halt => "HALT",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl FromStr for Opcode {
    type Err = ();

    /// Parses a mnemonic, case-insensitively. The loader wraps the unit
    /// error with line context.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s.to_ascii_uppercase().as_str() {
            "ADD" => Opcode::Add,
            "ADDL" => Opcode::Addl,
            "SUB" => Opcode::Sub,
            "SUBL" => Opcode::Subl,
            "MUL" => Opcode::Mul,
            "DIV" => Opcode::Div,
            "AND" => Opcode::And,
            "OR" => Opcode::Or,
            "XOR" => Opcode::Xor,
            "CMP" => Opcode::Cmp,
            "MOVC" => Opcode::Movc,
            "LOAD" => Opcode::Load,
            "STORE" => Opcode::Store,
            "LDR" => Opcode::Ldr,
            "STR" => Opcode::Str,
            "BZ" => Opcode::Bz,
            "BNZ" => Opcode::Bnz,
            "NOP" => Opcode::Nop,
            "HALT" => Opcode::Halt,
            _ => return Err(()),
        };
        Ok(op)
    }
}
