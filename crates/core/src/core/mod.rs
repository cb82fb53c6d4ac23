//! The CPU: architectural state, stage latches, and the per-cycle tick.

/// Pipeline machinery (latches, scoreboard, retirement queue, stages,
/// functional units, branch control).
pub mod pipeline;

use crate::common::constants::{INSTRUCTION_WIDTH, PC_BASE, REG_FILE_SIZE};
use crate::common::Fault;
use crate::config::Config;
use crate::core::pipeline::stages::{decode_stage, fetch_stage, writeback_stage};
use crate::core::pipeline::units::integer::integer_stage;
use crate::core::pipeline::units::load_store::load_store_stage;
use crate::core::pipeline::units::multiplier::multiplier_stage;
use crate::core::pipeline::{
    DecodeLatch, FetchLatch, RetireQueue, Scoreboard, UnitSlot, WritebackLatch,
};
use crate::isa::Instruction;
use crate::stats::SimStats;

/// Functional-unit latencies, in cycles.
#[derive(Clone, Copy, Debug)]
pub struct Timing {
    /// Integer ALU latency.
    pub integer: u64,
    /// Multiplier latency.
    pub multiplier: u64,
    /// Load/store unit latency.
    pub load_store: u64,
}

/// The aggregate CPU state: program counter, clock, register file, data
/// memory, zero flag, scoreboard, retirement queue, and one latch per
/// pipeline stage. Constructed once from the loaded instruction table and
/// mutated once per cycle by [`Cpu::tick`].
#[derive(Clone, Debug)]
pub struct Cpu {
    /// Program counter (byte-addressed, word-aligned, starting at 4000).
    pub pc: u64,
    /// Clock cycles elapsed.
    pub clock: u64,
    /// Architectural register file.
    pub regs: [i64; REG_FILE_SIZE],
    /// Flat data memory, one word per address.
    pub data_memory: Vec<i64>,
    /// Zero flag, set by every ALU/CMP-class result.
    pub zero_flag: bool,
    /// Register scoreboard.
    pub scoreboard: Scoreboard,
    /// Retirement queue.
    pub retire: RetireQueue,
    /// Fetch stage latch.
    pub fetch: FetchLatch,
    /// Decode/dispatch stage latch.
    pub decode: DecodeLatch,
    /// Writeback stage latch.
    pub writeback: WritebackLatch,
    /// Integer ALU slot.
    pub integer: UnitSlot,
    /// Multiplier slot.
    pub multiplier: UnitSlot,
    /// Load/store unit slot.
    pub load_store: UnitSlot,
    /// One-cycle fetch suppression after a taken branch.
    pub suppress_fetch: bool,
    /// Unit latencies.
    pub timing: Timing,
    /// Run statistics.
    pub stats: SimStats,
    code: Vec<Instruction>,
}

impl Cpu {
    /// Builds a CPU over a loaded instruction table: PC at base, registers
    /// and memory zeroed, retirement queue empty, fetch enabled.
    pub fn new(code: Vec<Instruction>, config: &Config) -> Self {
        Self {
            pc: PC_BASE,
            clock: 0,
            regs: [0; REG_FILE_SIZE],
            data_memory: vec![0; config.data_memory_size],
            zero_flag: false,
            scoreboard: Scoreboard::new(),
            retire: RetireQueue::new(config.retire_queue_capacity),
            fetch: FetchLatch {
                enabled: true,
                ..Default::default()
            },
            decode: DecodeLatch::default(),
            writeback: WritebackLatch::default(),
            integer: UnitSlot::default(),
            multiplier: UnitSlot::default(),
            load_store: UnitSlot::default(),
            suppress_fetch: false,
            timing: Timing {
                integer: config.integer_latency,
                multiplier: config.multiplier_latency,
                load_store: config.load_store_latency,
            },
            stats: SimStats::default(),
            code,
        }
    }

    /// Advances every stage by one cycle, in reverse pipeline order so each
    /// stage sees its downstream neighbor's state from the previous cycle.
    /// Returns `true` when HALT retires; the clock does not advance past a
    /// halt or a fault.
    pub fn tick(&mut self) -> Result<bool, Fault> {
        if writeback_stage(self)? {
            return Ok(true);
        }
        load_store_stage(self)?;
        multiplier_stage(self)?;
        integer_stage(self)?;
        decode_stage(self)?;
        fetch_stage(self);

        self.clock += 1;
        self.stats.cycles = self.clock;
        Ok(false)
    }

    /// The instruction at a given PC, or `None` outside the loaded program.
    pub fn instruction_at(&self, pc: u64) -> Option<Instruction> {
        if pc < PC_BASE {
            return None;
        }
        let index = ((pc - PC_BASE) / INSTRUCTION_WIDTH) as usize;
        self.code.get(index).copied()
    }

    /// Reads a data-memory word, faulting outside `[0, size)`.
    pub fn read_memory(&self, addr: i64, seq: u32) -> Result<i64, Fault> {
        let cell = usize::try_from(addr)
            .ok()
            .and_then(|a| self.data_memory.get(a));
        cell.copied().ok_or(Fault::AddressOutOfBounds {
            seq,
            addr,
            size: self.data_memory.len(),
        })
    }

    /// Writes a data-memory word, faulting outside `[0, size)`.
    pub fn write_memory(&mut self, addr: i64, value: i64, seq: u32) -> Result<(), Fault> {
        let size = self.data_memory.len();
        let cell = usize::try_from(addr)
            .ok()
            .and_then(|a| self.data_memory.get_mut(a));
        match cell {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Fault::AddressOutOfBounds { seq, addr, size }),
        }
    }

    /// Number of instructions retired so far.
    pub fn retired(&self) -> u64 {
        self.stats.instructions_retired
    }

    /// Number of dispatched-but-not-retired instructions.
    pub fn in_flight(&self) -> usize {
        self.retire.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::Opcode;

    fn movc(rd: usize, imm: i64, seq: u32) -> Instruction {
        Instruction {
            opcode: Opcode::Movc,
            rd,
            rs1: 0,
            rs2: 0,
            rs3: 0,
            imm,
            seq,
        }
    }

    #[test]
    fn test_construction_zeroes_state() {
        let cpu = Cpu::new(vec![movc(0, 1, 0)], &Config::default());
        assert_eq!(cpu.pc, PC_BASE);
        assert_eq!(cpu.clock, 0);
        assert!(cpu.regs.iter().all(|r| *r == 0));
        assert_eq!(cpu.data_memory.len(), 4096);
        assert!(cpu.retire.is_empty());
        assert!(cpu.fetch.enabled);
    }

    #[test]
    fn test_instruction_addressing() {
        let cpu = Cpu::new(vec![movc(0, 1, 0), movc(1, 2, 1)], &Config::default());
        assert_eq!(cpu.instruction_at(4000).unwrap().seq, 0);
        assert_eq!(cpu.instruction_at(4004).unwrap().seq, 1);
        assert_eq!(cpu.instruction_at(4008), None);
        assert_eq!(cpu.instruction_at(3996), None);
    }

    #[test]
    fn test_memory_bounds() {
        let mut cpu = Cpu::new(vec![movc(0, 1, 0)], &Config::default());
        cpu.write_memory(10, 42, 0).unwrap();
        assert_eq!(cpu.read_memory(10, 1).unwrap(), 42);

        let err = cpu.write_memory(4096, 1, 2).unwrap_err();
        assert_eq!(
            err,
            Fault::AddressOutOfBounds {
                seq: 2,
                addr: 4096,
                size: 4096
            }
        );
        assert!(cpu.read_memory(-1, 3).is_err());
    }
}
