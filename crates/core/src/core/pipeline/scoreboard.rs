//! Register scoreboard for data-hazard detection.
//!
//! One busy bit per architectural register. A bit is set in the cycle its
//! producing instruction dispatches and cleared in the cycle that
//! instruction retires; at most one in-flight instruction may hold a
//! register's bit. All set/clear paths go through [`Scoreboard::reserve`]
//! and [`Scoreboard::release`] so the invariant is mechanically checkable.

use crate::common::constants::REG_FILE_SIZE;

/// Per-register busy-bit table.
#[derive(Clone, Debug)]
pub struct Scoreboard {
    busy: [bool; REG_FILE_SIZE],
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Scoreboard {
    /// Creates a scoreboard with no pending producers.
    pub fn new() -> Self {
        Self {
            busy: [false; REG_FILE_SIZE],
        }
    }

    /// Whether `reg` has a pending producer.
    #[inline]
    pub fn is_busy(&self, reg: usize) -> bool {
        self.busy[reg]
    }

    /// Marks `reg` as having a pending producer. Returns `false` if the bit
    /// was already set — the caller raises an internal-consistency fault,
    /// since the hazard check should have stalled first.
    #[must_use]
    pub fn reserve(&mut self, reg: usize) -> bool {
        if self.busy[reg] {
            return false;
        }
        self.busy[reg] = true;
        true
    }

    /// Clears `reg`'s pending producer at retirement.
    pub fn release(&mut self, reg: usize) {
        self.busy[reg] = false;
    }

    /// Number of registers with pending producers.
    pub fn pending(&self) -> usize {
        self.busy.iter().filter(|b| **b).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_all_clear() {
        let sb = Scoreboard::new();
        for reg in 0..REG_FILE_SIZE {
            assert!(!sb.is_busy(reg));
        }
        assert_eq!(sb.pending(), 0);
    }

    #[test]
    fn test_reserve_and_release() {
        let mut sb = Scoreboard::new();
        assert!(sb.reserve(5));
        assert!(sb.is_busy(5));
        assert!(!sb.is_busy(6));

        sb.release(5);
        assert!(!sb.is_busy(5));
    }

    #[test]
    fn test_double_reserve_rejected() {
        let mut sb = Scoreboard::new();
        assert!(sb.reserve(3));
        assert!(!sb.reserve(3));
        // The original reservation survives the failed attempt.
        assert!(sb.is_busy(3));
    }

    #[test]
    fn test_pending_counts_set_bits() {
        let mut sb = Scoreboard::new();
        assert!(sb.reserve(0));
        assert!(sb.reserve(15));
        assert_eq!(sb.pending(), 2);
        sb.release(0);
        assert_eq!(sb.pending(), 1);
    }
}
