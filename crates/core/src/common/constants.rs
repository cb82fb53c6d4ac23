//! Architectural constants of the APEX machine.
//!
//! These are fixed properties of the modeled hardware. Tunable parameters
//! (memory size, unit latencies, queue depth) live in [`crate::config`].

/// Address of the first instruction. Code memory is byte-addressed starting
/// here; instruction slots are found by `(pc - PC_BASE) / INSTRUCTION_WIDTH`.
pub const PC_BASE: u64 = 4000;

/// Width of one instruction in bytes. The PC advances by this per fetch.
pub const INSTRUCTION_WIDTH: u64 = 4;

/// Number of architectural general-purpose registers (R0..R15).
pub const REG_FILE_SIZE: usize = 16;

/// Default size of the flat data memory, in words. One word per address.
pub const DATA_MEMORY_SIZE: usize = 4096;

/// Default capacity of the retirement queue. Must be at least the number of
/// instructions that can be in flight at once (one per functional unit plus
/// the writeback latch); sized with plenty of headroom.
pub const RETIRE_QUEUE_CAPACITY: usize = 64;
