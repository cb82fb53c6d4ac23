//! Top-level simulator: owns the CPU and drives the cycle loop.
//!
//! The driver (CLI or library user) controls the loop from outside: run to
//! completion, single-step, or impose a cycle budget. A budget stop is a
//! clean external stop, not a fault; architectural state stays inspectable
//! through [`Simulator::cpu`].

use crate::common::SimError;
use crate::config::Config;
use crate::core::Cpu;
use crate::isa::Instruction;

/// Why a run loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// HALT retired; the program is complete.
    Halted,
    /// The externally requested cycle budget was exhausted.
    CycleLimit,
}

/// The simulator: a CPU plus the driver-facing loop.
#[derive(Clone, Debug)]
pub struct Simulator {
    /// The simulated CPU; all architectural and pipeline state.
    pub cpu: Cpu,
}

impl Simulator {
    /// Builds a simulator over a loaded instruction table.
    pub fn new(code: Vec<Instruction>, config: &Config) -> Self {
        Self {
            cpu: Cpu::new(code, config),
        }
    }

    /// Advances one cycle. Returns `true` when HALT retires. A fault stops
    /// the simulation at the current cycle and is reported with it.
    pub fn tick(&mut self) -> Result<bool, SimError> {
        let cycle = self.cpu.clock;
        self.cpu.tick().map_err(|fault| SimError { cycle, fault })
    }

    /// Runs until HALT retires or, if `max_cycles` is given, until the
    /// clock reaches that value.
    pub fn run(&mut self, max_cycles: Option<u64>) -> Result<StopReason, SimError> {
        loop {
            if let Some(limit) = max_cycles {
                if self.cpu.clock >= limit {
                    return Ok(StopReason::CycleLimit);
                }
            }
            if self.tick()? {
                return Ok(StopReason::Halted);
            }
        }
    }
}
