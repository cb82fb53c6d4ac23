//! Branch redirect controller.
//!
//! Invoked from the integer unit when BZ/BNZ resolves taken. Redirects the
//! program counter to the branch's own fetch-time PC plus its immediate,
//! suppresses fetch for exactly one cycle so the target is fetched cleanly,
//! and flushes the decode latch — the only younger in-flight state that can
//! exist, since nothing past an unresolved branch is dispatched.

use crate::core::Cpu;

/// Redirects the PC and flushes not-yet-dispatched younger state.
pub fn redirect(cpu: &mut Cpu, branch_pc: u64, imm: i64) {
    let target = (branch_pc as i64).wrapping_add(imm) as u64;
    tracing::debug!(from = branch_pc, to = target, "taken branch redirect");

    cpu.pc = target;

    // Stages run in reverse pipeline order, so without this flag fetch
    // would grab the target instruction in the same cycle the branch
    // resolves.
    cpu.suppress_fetch = true;

    // Discard the instruction that followed the branch in program order,
    // along with any stall it was holding.
    cpu.decode.clear();

    // A branch may jump backwards past a fetched HALT; fetching resumes
    // from the target.
    cpu.fetch.enabled = true;

    cpu.stats.branches_taken += 1;
}
