//! Recency Tracker - LRU order over resident pages
//!
//! TigerStyle: Fixed arena of slots indexed by page number. Links are
//! indices, so touch and evict rewire slots without allocating.

use crate::error::{PageTableError, PageTableResult};
use crate::page_table::PageNumber;

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    /// Neighbour towards the head (more recent)
    prev: Option<PageNumber>,
    /// Neighbour towards the tail (less recent)
    next: Option<PageNumber>,
    linked: bool,
}

/// Doubly-linked recency list, head = most recent, tail = least recent.
#[derive(Debug, Clone)]
pub struct RecencyTracker {
    slots: Vec<Slot>,
    head: Option<PageNumber>,
    tail: Option<PageNumber>,
    len: usize,
}

impl RecencyTracker {
    /// Create a tracker able to hold pages `0..capacity`.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![Slot::default(); capacity],
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Number of tracked pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no pages are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether `page` is tracked.
    #[must_use]
    pub fn contains(&self, page: PageNumber) -> bool {
        self.slots.get(page).is_some_and(|slot| slot.linked)
    }

    /// Most recently touched page.
    #[must_use]
    pub fn most_recent(&self) -> Option<PageNumber> {
        self.head
    }

    /// Least recently touched page, the next victim.
    #[must_use]
    pub fn least_recent(&self) -> Option<PageNumber> {
        self.tail
    }

    /// Move `page` to the most-recent end, inserting it if absent.
    ///
    /// # Panics
    /// Panics if `page` is outside the tracker's capacity.
    pub fn touch(&mut self, page: PageNumber) {
        // Precondition
        assert!(
            page < self.slots.len(),
            "page {} outside tracker capacity {}",
            page,
            self.slots.len()
        );

        if self.head == Some(page) {
            return;
        }
        if self.slots[page].linked {
            self.unlink(page);
        }
        self.push_front(page);

        // Postcondition
        assert_eq!(self.head, Some(page), "touched page must be at head");
    }

    /// Remove and return the least recently touched page.
    ///
    /// # Errors
    /// Returns `EmptyTracker` if no pages are tracked.
    pub fn evict_least_recent(&mut self) -> PageTableResult<PageNumber> {
        let victim = self
            .tail
            .ok_or_else(|| PageTableError::empty_tracker("lru"))?;
        self.unlink(victim);
        Ok(victim)
    }

    /// Pages from most to least recent.
    pub fn iter(&self) -> impl Iterator<Item = PageNumber> + '_ {
        std::iter::successors(self.head, move |&page| self.slots[page].next)
    }

    fn push_front(&mut self, page: PageNumber) {
        let old_head = self.head;
        self.slots[page] = Slot {
            prev: None,
            next: old_head,
            linked: true,
        };
        match old_head {
            Some(h) => self.slots[h].prev = Some(page),
            None => self.tail = Some(page),
        }
        self.head = Some(page);
        self.len += 1;
    }

    fn unlink(&mut self, page: PageNumber) {
        let Slot { prev, next, linked } = self.slots[page];
        debug_assert!(linked, "unlink of untracked page {page}");

        match prev {
            Some(p) => self.slots[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n].prev = prev,
            None => self.tail = prev,
        }
        self.slots[page] = Slot::default();
        self.len -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(tracker: &RecencyTracker) -> Vec<PageNumber> {
        tracker.iter().collect()
    }

    #[test]
    fn test_touch_inserts_at_head() {
        let mut tracker = RecencyTracker::with_capacity(4);
        tracker.touch(0);
        tracker.touch(1);
        tracker.touch(2);

        assert_eq!(order(&tracker), vec![2, 1, 0]);
        assert_eq!(tracker.most_recent(), Some(2));
        assert_eq!(tracker.least_recent(), Some(0));
        assert_eq!(tracker.len(), 3);
    }

    #[test]
    fn test_touch_moves_existing_page() {
        let mut tracker = RecencyTracker::with_capacity(4);
        for page in [0, 1, 2] {
            tracker.touch(page);
        }
        tracker.touch(0);

        assert_eq!(order(&tracker), vec![0, 2, 1]);
        assert_eq!(tracker.len(), 3);
    }

    #[test]
    fn test_touch_middle_page() {
        let mut tracker = RecencyTracker::with_capacity(4);
        for page in [0, 1, 2, 3] {
            tracker.touch(page);
        }
        tracker.touch(2);

        assert_eq!(order(&tracker), vec![2, 3, 1, 0]);
    }

    #[test]
    fn test_touch_head_is_noop() {
        let mut tracker = RecencyTracker::with_capacity(2);
        tracker.touch(1);
        tracker.touch(1);

        assert_eq!(order(&tracker), vec![1]);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_evict_least_recent() {
        let mut tracker = RecencyTracker::with_capacity(3);
        for page in [0, 1, 2] {
            tracker.touch(page);
        }
        tracker.touch(0);

        assert_eq!(tracker.evict_least_recent(), Ok(1));
        assert_eq!(tracker.evict_least_recent(), Ok(2));
        assert_eq!(tracker.evict_least_recent(), Ok(0));
        assert!(tracker.is_empty());
        assert_eq!(tracker.most_recent(), None);
    }

    #[test]
    fn test_evict_empty_fails() {
        let mut tracker = RecencyTracker::with_capacity(1);
        assert_eq!(
            tracker.evict_least_recent(),
            Err(PageTableError::empty_tracker("lru"))
        );
    }

    #[test]
    fn test_evicted_page_can_return() {
        let mut tracker = RecencyTracker::with_capacity(2);
        tracker.touch(0);
        tracker.touch(1);
        assert_eq!(tracker.evict_least_recent(), Ok(0));
        assert!(!tracker.contains(0));

        tracker.touch(0);
        assert!(tracker.contains(0));
        assert_eq!(order(&tracker), vec![0, 1]);
    }

    #[test]
    #[should_panic(expected = "outside tracker capacity")]
    fn test_touch_out_of_range_panics() {
        let mut tracker = RecencyTracker::with_capacity(2);
        tracker.touch(2);
    }
}
