//! Fault taxonomy for the pipeline core.
//!
//! Two families share the [`Fault`] enum:
//! 1. **Simulated-program faults** — the running program did something the
//!    machine cannot execute (bad address, division by zero).
//! 2. **Internal-consistency faults** — a pipeline invariant was violated.
//!    These indicate a bug in the core, not in the simulated program, and
//!    abort the run loudly instead of being recovered.
//!
//! [`SimError`] wraps a fault with the clock value at which the run stopped;
//! no fault is ever retried.

use thiserror::Error;

/// A condition that stops the simulation at the current cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Fault {
    /// A load or store computed an effective address outside data memory.
    /// Memory is never silently wrapped or corrupted.
    #[error("I{seq}: memory address {addr} outside data memory of {size} words")]
    AddressOutOfBounds {
        /// Sequence number of the offending instruction.
        seq: u32,
        /// The computed effective address.
        addr: i64,
        /// Size of data memory in words.
        size: usize,
    },

    /// DIV with a zero divisor.
    #[error("I{seq}: division by zero")]
    DivideByZero {
        /// Sequence number of the offending instruction.
        seq: u32,
    },

    /// Dispatch found the retirement queue full. Internal: the queue is
    /// sized above the maximum number of in-flight instructions.
    #[error("internal: retirement queue full while dispatching I{seq}")]
    RetireQueueOverflow {
        /// Sequence number of the instruction being dispatched.
        seq: u32,
    },

    /// A unit held a completed instruction while the retirement queue was
    /// empty. Internal: every in-flight instruction has a queue entry.
    #[error("internal: retirement queue empty while I{seq} awaits commit")]
    RetireQueueUnderflow {
        /// Sequence number of the waiting instruction.
        seq: u32,
    },

    /// Writeback retired an instruction that was not at the queue head.
    #[error("internal: I{seq} retired while I{head} was at the queue head")]
    CommitOutOfOrder {
        /// Sequence number at the queue head.
        head: u32,
        /// Sequence number that reached writeback.
        seq: u32,
    },

    /// Dispatch reserved a register whose busy bit was already set. The
    /// hazard check is supposed to have stalled first.
    #[error("internal: R{reg} already reserved when dispatching I{seq}")]
    ScoreboardDoubleReserve {
        /// The doubly-reserved register.
        reg: usize,
        /// Sequence number of the instruction being dispatched.
        seq: u32,
    },

    /// Two functional units handed off to writeback in the same cycle.
    /// Queue-head gating admits at most one per cycle.
    #[error("internal: writeback latch occupied when I{seq} completed")]
    WritebackCollision {
        /// Sequence number of the instruction that found the latch full.
        seq: u32,
    },
}

impl Fault {
    /// True for internal-consistency faults (core bugs), false for faults
    /// raised by the simulated program itself.
    pub fn is_internal(&self) -> bool {
        !matches!(
            self,
            Fault::AddressOutOfBounds { .. } | Fault::DivideByZero { .. }
        )
    }
}

/// A fault together with the cycle at which the simulation stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("cycle {cycle}: {fault}")]
pub struct SimError {
    /// Clock value when the fault was raised.
    pub cycle: u64,
    /// The underlying fault.
    #[source]
    pub fault: Fault,
}
