//! Instruction-listing loader.
//!
//! Parses a text listing into the static instruction table the CPU is
//! constructed from. One instruction per line, mnemonic first, then comma-
//! or whitespace-separated operands: `R<n>` for registers, `#<imm>` for
//! immediates. Blank lines and lines starting with `;` or `//` are skipped.
//! Sequence numbers are assigned in listing order.
//!
//! Every malformed input is rejected here, before a CPU exists; the core
//! assumes a well-formed table and does not re-validate it.

use std::path::Path;

use thiserror::Error;

use crate::common::constants::REG_FILE_SIZE;
use crate::isa::{Instruction, Opcode};

/// A listing that could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read `{path}`: {source}")]
    Io {
        /// Path of the listing.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A line began with something that is not a known mnemonic.
    #[error("line {line}: unknown opcode `{text}`")]
    UnknownOpcode {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        text: String,
    },

    /// Wrong number of operands for the opcode.
    #[error("line {line}: {opcode} expects {expected} operand(s), found {found}")]
    OperandCount {
        /// 1-based line number.
        line: usize,
        /// The mnemonic.
        opcode: &'static str,
        /// Required operand count.
        expected: usize,
        /// Operands present.
        found: usize,
    },

    /// An operand did not have the required shape.
    #[error("line {line}: expected {expected}, found `{text}`")]
    BadOperand {
        /// 1-based line number.
        line: usize,
        /// What the opcode required here (`a register`, `an immediate`).
        expected: &'static str,
        /// The offending token.
        text: String,
    },

    /// A register index at or above the register-file size.
    #[error("line {line}: R{reg} out of range (register file has {REG_FILE_SIZE} registers)")]
    RegisterOutOfRange {
        /// 1-based line number.
        line: usize,
        /// The out-of-range index.
        reg: u64,
    },

    /// The listing contained no instructions.
    #[error("listing contains no instructions")]
    EmptyProgram,
}

/// Loads and parses an instruction listing from disk.
pub fn load_program(path: &Path) -> Result<Vec<Instruction>, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_listing(&text)
}

/// Parses an instruction listing from a string.
pub fn parse_listing(text: &str) -> Result<Vec<Instruction>, LoadError> {
    let mut program = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with("//") {
            continue;
        }
        let seq = program.len() as u32;
        program.push(parse_line(line, index + 1, seq)?);
    }
    if program.is_empty() {
        return Err(LoadError::EmptyProgram);
    }
    Ok(program)
}

fn parse_line(line: &str, line_no: usize, seq: u32) -> Result<Instruction, LoadError> {
    let mut tokens = line.split(|c: char| c == ',' || c.is_whitespace());
    let mnemonic = tokens.next().unwrap_or_default();
    let operands: Vec<&str> = tokens.filter(|t| !t.is_empty()).collect();

    let opcode: Opcode = mnemonic.parse().map_err(|()| LoadError::UnknownOpcode {
        line: line_no,
        text: mnemonic.to_string(),
    })?;

    let expected = operand_count(opcode);
    if operands.len() != expected {
        return Err(LoadError::OperandCount {
            line: line_no,
            opcode: opcode.mnemonic(),
            expected,
            found: operands.len(),
        });
    }

    let reg = |i: usize| parse_register(operands[i], line_no);
    let imm = |i: usize| parse_immediate(operands[i], line_no);

    let mut instr = Instruction {
        opcode,
        rd: 0,
        rs1: 0,
        rs2: 0,
        rs3: 0,
        imm: 0,
        seq,
    };
    match opcode {
        Opcode::Add
        | Opcode::Sub
        | Opcode::Mul
        | Opcode::Div
        | Opcode::And
        | Opcode::Or
        | Opcode::Xor
        | Opcode::Ldr => {
            instr.rd = reg(0)?;
            instr.rs1 = reg(1)?;
            instr.rs2 = reg(2)?;
        }
        Opcode::Addl | Opcode::Subl | Opcode::Load => {
            instr.rd = reg(0)?;
            instr.rs1 = reg(1)?;
            instr.imm = imm(2)?;
        }
        // STORE <source>,<base>,#<offset>
        Opcode::Store => {
            instr.rs1 = reg(0)?;
            instr.rs2 = reg(1)?;
            instr.imm = imm(2)?;
        }
        // STR <source>,<base>,<index>
        Opcode::Str => {
            instr.rs3 = reg(0)?;
            instr.rs1 = reg(1)?;
            instr.rs2 = reg(2)?;
        }
        Opcode::Cmp => {
            instr.rs1 = reg(0)?;
            instr.rs2 = reg(1)?;
        }
        Opcode::Movc => {
            instr.rd = reg(0)?;
            instr.imm = imm(1)?;
        }
        Opcode::Bz | Opcode::Bnz => instr.imm = imm(0)?,
        Opcode::Nop | Opcode::Halt => {}
    }
    Ok(instr)
}

fn operand_count(opcode: Opcode) -> usize {
    match opcode {
        Opcode::Nop | Opcode::Halt => 0,
        Opcode::Bz | Opcode::Bnz => 1,
        Opcode::Cmp | Opcode::Movc => 2,
        _ => 3,
    }
}

fn parse_register(token: &str, line: usize) -> Result<usize, LoadError> {
    let index = token
        .strip_prefix(['R', 'r'])
        .and_then(|digits| digits.parse::<u64>().ok())
        .ok_or_else(|| LoadError::BadOperand {
            line,
            expected: "a register",
            text: token.to_string(),
        })?;
    if index >= REG_FILE_SIZE as u64 {
        return Err(LoadError::RegisterOutOfRange { line, reg: index });
    }
    Ok(index as usize)
}

fn parse_immediate(token: &str, line: usize) -> Result<i64, LoadError> {
    token
        .strip_prefix('#')
        .and_then(|digits| digits.parse::<i64>().ok())
        .ok_or_else(|| LoadError::BadOperand {
            line,
            expected: "an immediate",
            text: token.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_parses_each_operand_shape() {
        let program = parse_listing(
            "MOVC,R0,#5\n\
             ADD,R2,R0,R1\n\
             ADDL,R3,R2,#-4\n\
             LOAD,R4,R0,#8\n\
             STORE,R4,R0,#8\n\
             LDR,R5,R0,R1\n\
             STR,R5,R0,R1\n\
             CMP,R4,R5\n\
             BNZ,#-8\n\
             NOP\n\
             HALT\n",
        )
        .unwrap();

        assert_eq!(program.len(), 11);
        assert_eq!(program[0].opcode, Opcode::Movc);
        assert_eq!((program[0].rd, program[0].imm), (0, 5));
        assert_eq!(
            (program[1].rd, program[1].rs1, program[1].rs2),
            (2, 0, 1)
        );
        assert_eq!(program[2].imm, -4);
        // STORE: first operand is the source, second the base.
        assert_eq!((program[4].rs1, program[4].rs2, program[4].imm), (4, 0, 8));
        // STR: first operand is the source (rs3).
        assert_eq!(
            (program[6].rs3, program[6].rs1, program[6].rs2),
            (5, 0, 1)
        );
        assert_eq!(program[8].imm, -8);
        // Sequence numbers follow listing order.
        assert_eq!(program[10].seq, 10);
    }

    #[test]
    fn test_whitespace_comments_and_case() {
        let program = parse_listing(
            "; constants first\n\
             movc r1 #10\n\
             // then stop\n\
             \n\
             halt\n",
        )
        .unwrap();
        assert_eq!(program.len(), 2);
        assert_eq!(program[0].opcode, Opcode::Movc);
        assert_eq!(program[0].seq, 0);
        assert_eq!(program[1].seq, 1);
    }

    #[rstest]
    #[case::unknown_opcode("FOO,R1,R2,R3\n")]
    #[case::too_few_operands("ADD,R1,R2\n")]
    #[case::too_many_operands("HALT,R1\n")]
    #[case::immediate_for_register("ADD,R1,#2,R3\n")]
    #[case::register_for_immediate("MOVC,R1,R2\n")]
    #[case::register_out_of_range("MOVC,R16,#0\n")]
    fn test_rejects_malformed_line(#[case] listing: &str) {
        assert!(parse_listing(listing).is_err());
    }

    #[test]
    fn test_error_carries_line_number() {
        let err = parse_listing("MOVC,R0,#1\nADD,R1,R0\n").unwrap_err();
        match err {
            LoadError::OperandCount { line, found, .. } => {
                assert_eq!(line, 2);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_listing_rejected() {
        assert!(matches!(
            parse_listing("; nothing here\n"),
            Err(LoadError::EmptyProgram)
        ));
    }
}
