//! Simulation statistics.
//!
//! Tracked by the core as it runs and exposed to the driver after every
//! tick alongside the architectural state.

/// Counters accumulated over a simulation run.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimStats {
    /// Clock cycles elapsed.
    pub cycles: u64,
    /// Instructions retired in program order.
    pub instructions_retired: u64,
    /// Cycles dispatch stalled on a data hazard (scoreboard bit set).
    pub stalls_data: u64,
    /// Cycles dispatch stalled on a busy functional unit.
    pub stalls_structural: u64,
    /// Conditional branches that resolved taken.
    pub branches_taken: u64,
}

impl SimStats {
    /// Cycles per retired instruction. `None` before anything retires.
    pub fn cpi(&self) -> Option<f64> {
        (self.instructions_retired > 0)
            .then(|| self.cycles as f64 / self.instructions_retired as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpi_undefined_until_first_retire() {
        let mut stats = SimStats {
            cycles: 10,
            ..Default::default()
        };
        assert_eq!(stats.cpi(), None);
        stats.instructions_retired = 5;
        assert_eq!(stats.cpi(), Some(2.0));
    }
}
