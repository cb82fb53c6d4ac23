//! Shared helpers for the pipeline integration tests.

use apex_core::sim::loader::parse_listing;
use apex_core::{Config, Simulator, StopReason};

/// Generous cycle ceiling; every test program finishes well under this.
pub const BUDGET: u64 = 10_000;

/// Builds a simulator from a text listing with the default configuration.
pub fn simulator(listing: &str) -> Simulator {
    let program = parse_listing(listing).expect("test listing parses");
    Simulator::new(program, &Config::default())
}

/// Runs a listing to HALT and returns the finished simulator.
pub fn run_to_halt(listing: &str) -> Simulator {
    let mut sim = simulator(listing);
    let reason = sim.run(Some(BUDGET)).expect("program runs without fault");
    assert_eq!(reason, StopReason::Halted, "program must retire HALT");
    sim
}
