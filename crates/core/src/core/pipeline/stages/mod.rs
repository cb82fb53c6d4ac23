//! Non-execute pipeline stages.

/// Decode, hazard check and dispatch.
pub mod decode;
/// Instruction fetch.
pub mod fetch;
/// Writeback and retirement.
pub mod writeback;

pub use decode::decode_stage;
pub use fetch::fetch_stage;
pub use writeback::writeback_stage;
