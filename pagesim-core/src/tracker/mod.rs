//! Trackers - Victim selection order for each replacement policy
//!
//! A page table owns exactly one tracker, chosen from its policy:
//!
//! ```text
//! ┌──────────────┬────────────────────┬──────────────────────┐
//! │ Policy       │ Tracker            │ Mutated by           │
//! ├──────────────┼────────────────────┼──────────────────────┤
//! │ lru          │ RecencyTracker     │ hit, load, evict     │
//! │ fifo         │ ArrivalTracker     │ load, evict          │
//! │ clock        │ (none)             │ UnsupportedPolicy    │
//! └──────────────┴────────────────────┴──────────────────────┘
//! ```

mod arrival;
mod recency;

pub use arrival::ArrivalTracker;
pub use recency::RecencyTracker;

use crate::config::ReplacementPolicy;
use crate::error::{PageTableError, PageTableResult};
use crate::page_table::PageNumber;

/// The single active tracker of a page table.
#[derive(Debug, Clone)]
pub enum ReplacementTracker {
    /// LRU order
    Recency(RecencyTracker),
    /// FIFO order
    Arrival(ArrivalTracker),
}

impl ReplacementTracker {
    /// Create the tracker for `policy` covering pages `0..capacity`.
    ///
    /// # Errors
    /// Returns `UnsupportedPolicy` for policies without a tracker.
    pub fn for_policy(policy: ReplacementPolicy, capacity: usize) -> PageTableResult<Self> {
        match policy {
            ReplacementPolicy::Lru => Ok(Self::Recency(RecencyTracker::with_capacity(capacity))),
            ReplacementPolicy::Fifo => Ok(Self::Arrival(ArrivalTracker::with_capacity(capacity))),
            ReplacementPolicy::Clock => Err(PageTableError::UnsupportedPolicy {
                policy: policy.to_string(),
            }),
        }
    }

    /// Policy this tracker implements.
    #[must_use]
    pub fn policy(&self) -> ReplacementPolicy {
        match self {
            Self::Recency(_) => ReplacementPolicy::Lru,
            Self::Arrival(_) => ReplacementPolicy::Fifo,
        }
    }

    /// Number of tracked pages.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Recency(t) => t.len(),
            Self::Arrival(t) => t.len(),
        }
    }

    /// Whether no pages are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `page` is tracked.
    #[must_use]
    pub fn contains(&self, page: PageNumber) -> bool {
        match self {
            Self::Recency(t) => t.contains(page),
            Self::Arrival(t) => t.contains(page),
        }
    }

    /// Tracked pages in victim order reversed: the last element is the
    /// next victim.
    #[must_use]
    pub fn pages(&self) -> Vec<PageNumber> {
        match self {
            Self::Recency(t) => t.iter().collect(),
            Self::Arrival(t) => {
                let mut pages: Vec<_> = t.iter().collect();
                pages.reverse();
                pages
            }
        }
    }

    /// Bookkeeping for an access to a resident page.
    ///
    /// # Errors
    /// Returns `InvariantViolation` if the resident page is not tracked.
    pub fn on_hit(&mut self, page: PageNumber) -> PageTableResult<()> {
        if !self.contains(page) {
            return Err(PageTableError::invariant(format!(
                "resident page {page} missing from {} tracker",
                self.policy()
            )));
        }
        if let Self::Recency(t) = self {
            t.touch(page);
        }
        Ok(())
    }

    /// Bookkeeping for a page just loaded into a frame.
    ///
    /// # Errors
    /// Returns `InvariantViolation` if the page was already tracked.
    pub fn on_load(&mut self, page: PageNumber) -> PageTableResult<()> {
        match self {
            Self::Recency(t) => {
                if t.contains(page) {
                    return Err(PageTableError::invariant(format!(
                        "page {page} loaded while already tracked for lru"
                    )));
                }
                t.touch(page);
                Ok(())
            }
            Self::Arrival(t) => t.record_load(page),
        }
    }

    /// Remove and return the next victim.
    ///
    /// # Errors
    /// Returns `EmptyTracker` if no pages are tracked.
    pub fn select_victim(&mut self) -> PageTableResult<PageNumber> {
        match self {
            Self::Recency(t) => t.evict_least_recent(),
            Self::Arrival(t) => t.evict_earliest(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_policy() {
        let lru = ReplacementTracker::for_policy(ReplacementPolicy::Lru, 4).unwrap();
        assert_eq!(lru.policy(), ReplacementPolicy::Lru);
        let fifo = ReplacementTracker::for_policy(ReplacementPolicy::Fifo, 4).unwrap();
        assert_eq!(fifo.policy(), ReplacementPolicy::Fifo);
        assert!(matches!(
            ReplacementTracker::for_policy(ReplacementPolicy::Clock, 4),
            Err(PageTableError::UnsupportedPolicy { .. })
        ));
    }

    #[test]
    fn test_hit_reorders_only_recency() {
        let mut lru = ReplacementTracker::for_policy(ReplacementPolicy::Lru, 3).unwrap();
        let mut fifo = ReplacementTracker::for_policy(ReplacementPolicy::Fifo, 3).unwrap();
        for page in [0, 1, 2] {
            lru.on_load(page).unwrap();
            fifo.on_load(page).unwrap();
        }
        lru.on_hit(0).unwrap();
        fifo.on_hit(0).unwrap();

        assert_eq!(lru.select_victim(), Ok(1));
        assert_eq!(fifo.select_victim(), Ok(0));
    }

    #[test]
    fn test_hit_on_untracked_page_is_invariant_violation() {
        let mut lru = ReplacementTracker::for_policy(ReplacementPolicy::Lru, 2).unwrap();
        assert!(matches!(
            lru.on_hit(1),
            Err(PageTableError::InvariantViolation { .. })
        ));
    }

    #[test]
    fn test_pages_ends_with_next_victim() {
        let mut fifo = ReplacementTracker::for_policy(ReplacementPolicy::Fifo, 3).unwrap();
        for page in [2, 0, 1] {
            fifo.on_load(page).unwrap();
        }
        assert_eq!(fifo.pages(), vec![1, 0, 2]);

        let mut lru = ReplacementTracker::for_policy(ReplacementPolicy::Lru, 3).unwrap();
        for page in [2, 0, 1] {
            lru.on_load(page).unwrap();
        }
        assert_eq!(lru.pages(), vec![1, 0, 2]);
    }
}
