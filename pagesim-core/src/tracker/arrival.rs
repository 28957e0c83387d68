//! Arrival Tracker - FIFO order over resident pages
//!
//! Fixed-capacity ring indexed by position, plus a membership bitmap
//! indexed by page number. Each page is queued at most once, so a ring
//! sized to the page count never overflows.

use crate::error::{PageTableError, PageTableResult};
use crate::page_table::PageNumber;

/// Load-order queue, front = earliest loaded.
#[derive(Debug, Clone)]
pub struct ArrivalTracker {
    ring: Vec<PageNumber>,
    queued: Vec<bool>,
    front: usize,
    len: usize,
}

impl ArrivalTracker {
    /// Create a tracker able to hold pages `0..capacity`.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ring: vec![0; capacity],
            queued: vec![false; capacity],
            front: 0,
            len: 0,
        }
    }

    /// Number of queued pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no pages are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether `page` is queued.
    #[must_use]
    pub fn contains(&self, page: PageNumber) -> bool {
        self.queued.get(page).copied().unwrap_or(false)
    }

    /// Earliest loaded page, the next victim.
    #[must_use]
    pub fn earliest(&self) -> Option<PageNumber> {
        (self.len > 0).then(|| self.ring[self.front])
    }

    /// Append `page` as the latest arrival.
    ///
    /// # Errors
    /// Returns `InvariantViolation` if `page` is already queued.
    ///
    /// # Panics
    /// Panics if `page` is outside the tracker's capacity.
    pub fn record_load(&mut self, page: PageNumber) -> PageTableResult<()> {
        // Precondition
        assert!(
            page < self.queued.len(),
            "page {} outside tracker capacity {}",
            page,
            self.queued.len()
        );

        if self.queued[page] {
            return Err(PageTableError::invariant(format!(
                "page {page} loaded while already queued for fifo"
            )));
        }

        let capacity = self.ring.len();
        let back = (self.front + self.len) % capacity;
        self.ring[back] = page;
        self.queued[page] = true;
        self.len += 1;

        // Postcondition
        assert!(self.len <= capacity, "ring must not overflow");
        Ok(())
    }

    /// Remove and return the earliest loaded page.
    ///
    /// # Errors
    /// Returns `EmptyTracker` if no pages are queued.
    pub fn evict_earliest(&mut self) -> PageTableResult<PageNumber> {
        if self.len == 0 {
            return Err(PageTableError::empty_tracker("fifo"));
        }

        let victim = self.ring[self.front];
        self.queued[victim] = false;
        self.front = (self.front + 1) % self.ring.len();
        self.len -= 1;
        Ok(victim)
    }

    /// Pages from earliest to latest arrival.
    pub fn iter(&self) -> impl Iterator<Item = PageNumber> + '_ {
        let capacity = self.ring.len();
        (0..self.len).map(move |i| self.ring[(self.front + i) % capacity])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_in_load_order() {
        let mut tracker = ArrivalTracker::with_capacity(3);
        for page in [2, 0, 1] {
            tracker.record_load(page).unwrap();
        }

        assert_eq!(tracker.iter().collect::<Vec<_>>(), vec![2, 0, 1]);
        assert_eq!(tracker.evict_earliest(), Ok(2));
        assert_eq!(tracker.evict_earliest(), Ok(0));
        assert_eq!(tracker.evict_earliest(), Ok(1));
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_evict_empty_fails() {
        let mut tracker = ArrivalTracker::with_capacity(2);
        assert_eq!(
            tracker.evict_earliest(),
            Err(PageTableError::empty_tracker("fifo"))
        );
    }

    #[test]
    fn test_duplicate_load_rejected() {
        let mut tracker = ArrivalTracker::with_capacity(2);
        tracker.record_load(1).unwrap();
        let err = tracker.record_load(1).unwrap_err();
        assert!(matches!(err, PageTableError::InvariantViolation { .. }));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_ring_wraps_around() {
        let mut tracker = ArrivalTracker::with_capacity(3);
        for page in [0, 1, 2] {
            tracker.record_load(page).unwrap();
        }
        for round in 0..10 {
            let victim = tracker.evict_earliest().unwrap();
            assert_eq!(victim, round % 3);
            tracker.record_load(victim).unwrap();
        }
        assert_eq!(tracker.len(), 3);
        assert_eq!(tracker.earliest(), Some(1));
    }

    #[test]
    fn test_contains_tracks_membership() {
        let mut tracker = ArrivalTracker::with_capacity(2);
        assert!(!tracker.contains(0));
        tracker.record_load(0).unwrap();
        assert!(tracker.contains(0));
        tracker.evict_earliest().unwrap();
        assert!(!tracker.contains(0));
        assert!(!tracker.contains(99));
    }
}
