//! SimClock - Logical Ticks
//!
//! TigerStyle: Deterministic, controllable time for simulation.
//! Every page access is stamped with the tick this clock reports.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::constants::DST_TIME_ADVANCE_TICKS_MAX;
use crate::page_table::Tick;

/// A logical clock for deterministic simulation.
///
/// TigerStyle:
/// - Time only moves forward
/// - All time operations are explicit
/// - No reliance on system time
///
/// Clones share the same tick counter.
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    current: Arc<AtomicU64>,
}

impl SimClock {
    /// Create a clock at tick zero.
    ///
    /// # Example
    /// ```
    /// use pagesim_core::dst::SimClock;
    /// let clock = SimClock::new();
    /// assert_eq!(clock.now(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current tick.
    #[must_use]
    pub fn now(&self) -> Tick {
        self.current.load(Ordering::SeqCst)
    }

    /// Advance by `ticks` and return the new tick.
    ///
    /// # Panics
    /// Panics if `ticks` exceeds `DST_TIME_ADVANCE_TICKS_MAX`.
    pub fn advance(&self, ticks: Tick) -> Tick {
        // Precondition
        assert!(
            ticks <= DST_TIME_ADVANCE_TICKS_MAX,
            "advance({}) exceeds max ({})",
            ticks,
            DST_TIME_ADVANCE_TICKS_MAX
        );

        let old = self.current.fetch_add(ticks, Ordering::SeqCst);
        let new = old.saturating_add(ticks);

        // Postcondition
        assert!(new >= old, "time must not go backwards");
        new
    }

    /// Advance by one tick and return the new tick.
    pub fn tick(&self) -> Tick {
        self.advance(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_tick() {
        assert_eq!(SimClock::new().now(), 0);
    }

    #[test]
    fn test_advance_and_tick() {
        let clock = SimClock::new();
        assert_eq!(clock.advance(10), 10);
        assert_eq!(clock.tick(), 11);
        assert_eq!(clock.now(), 11);
    }

    #[test]
    #[should_panic(expected = "advance")]
    fn test_advance_exceeds_max() {
        SimClock::new().advance(DST_TIME_ADVANCE_TICKS_MAX + 1);
    }

    #[test]
    fn test_clone_shares_ticks() {
        let clock1 = SimClock::new();
        let clock2 = clock1.clone();
        clock1.advance(3);
        assert_eq!(clock2.now(), 3);
    }
}
