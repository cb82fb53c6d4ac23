//! The APEX pipeline: latches, hazard tracking, in-order retirement,
//! stages and functional units.

/// Branch redirect controller.
pub mod branch;
/// Stage latches and the dispatch phase tag.
pub mod latch;
/// Retirement queue (in-order commit FIFO).
pub mod retire;
/// Register scoreboard.
pub mod scoreboard;
/// Fetch, decode/dispatch and writeback stages.
pub mod stages;
/// Functional units (integer, multiplier, load/store).
pub mod units;

pub use latch::{DecodeLatch, DispatchPhase, FetchLatch, WritebackLatch};
pub use retire::RetireQueue;
pub use scoreboard::Scoreboard;
pub use units::{UnitSlot, UnitState};
