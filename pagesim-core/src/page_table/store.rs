//! Page Table Store - Fixed array of page table entries
//!
//! TigerStyle: Allocated once, indexed by page number, every operation O(1).

use super::entry::{AccessMode, FrameId, PageNumber, PageStatus, PageTableEntry, Tick};
use crate::error::{PageTableError, PageTableResult};

/// Fixed-size array of per-page state.
#[derive(Debug, Clone)]
pub struct PageTableStore {
    entries: Vec<PageTableEntry>,
}

impl PageTableStore {
    /// Allocate `pages_count` unmapped entries.
    ///
    /// # Errors
    /// Returns `Configuration` if the entry storage cannot be reserved.
    pub fn initialize(pages_count: usize) -> PageTableResult<Self> {
        let mut entries = Vec::new();
        entries.try_reserve_exact(pages_count).map_err(|e| {
            PageTableError::configuration(format!(
                "cannot allocate {pages_count} page table entries: {e}"
            ))
        })?;
        entries.resize_with(pages_count, PageTableEntry::default);

        // Postcondition
        assert_eq!(entries.len(), pages_count, "all entries must be allocated");

        Ok(Self { entries })
    }

    /// Number of pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no pages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fail with `InvalidReference` unless `page` is in range.
    ///
    /// # Errors
    /// Returns `InvalidReference` for pages outside `[0, len)`.
    pub fn validate(&self, page: PageNumber) -> PageTableResult<()> {
        if page < self.entries.len() {
            Ok(())
        } else {
            Err(PageTableError::InvalidReference {
                page,
                pages_count: self.entries.len(),
            })
        }
    }

    /// Get the entry for `page`.
    ///
    /// # Errors
    /// Returns `InvalidReference` for pages out of range.
    pub fn entry(&self, page: PageNumber) -> PageTableResult<&PageTableEntry> {
        self.validate(page)?;
        Ok(&self.entries[page])
    }

    /// Get the status of `page`.
    ///
    /// # Errors
    /// Returns `InvalidReference` for pages out of range.
    pub fn status_of(&self, page: PageNumber) -> PageTableResult<PageStatus> {
        self.entry(page).map(PageTableEntry::status)
    }

    /// Record that `page` was loaded into `frame` at `time`.
    pub(crate) fn mark_resident(&mut self, page: PageNumber, frame: FrameId, time: Tick) {
        let entry = &mut self.entries[page];
        entry.status = PageStatus::Resident;
        entry.modified = false;
        entry.frame = Some(frame);
        entry.last_load = Some(time);
        entry.last_access = Some(time);
    }

    /// Record that `page` was evicted to the backing store.
    ///
    /// Lifetime counters are untouched.
    pub(crate) fn mark_evicted(&mut self, page: PageNumber) {
        let entry = &mut self.entries[page];
        entry.status = PageStatus::Swapped;
        entry.modified = false;
        entry.frame = None;
        entry.last_load = None;
        entry.last_access = None;
    }

    /// Record a read or write of a resident page.
    pub(crate) fn record_access(&mut self, page: PageNumber, mode: AccessMode, time: Tick) {
        let entry = &mut self.entries[page];
        debug_assert!(entry.is_resident(), "page {page} accessed while not resident");

        entry.last_access = Some(time);
        match mode {
            AccessMode::Read => entry.read_count += 1,
            AccessMode::Write => {
                entry.write_count += 1;
                entry.modified = true;
            }
        }
    }

    /// Iterate over `(page, entry)` in ascending page order.
    pub fn iter(&self) -> impl Iterator<Item = (PageNumber, &PageTableEntry)> {
        self.entries.iter().enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_all_unmapped() {
        let store = PageTableStore::initialize(4).unwrap();
        assert_eq!(store.len(), 4);
        assert!(store
            .iter()
            .all(|(_, e)| *e == PageTableEntry::default()));
    }

    #[test]
    fn test_status_of_out_of_range() {
        let store = PageTableStore::initialize(2).unwrap();
        assert_eq!(store.status_of(1), Ok(PageStatus::Unmapped));
        assert_eq!(
            store.status_of(2),
            Err(PageTableError::InvalidReference {
                page: 2,
                pages_count: 2
            })
        );
    }

    #[test]
    fn test_mark_resident_sets_timestamps() {
        let mut store = PageTableStore::initialize(3).unwrap();
        store.mark_resident(1, 7, 42);

        let entry = store.entry(1).unwrap();
        assert_eq!(entry.status(), PageStatus::Resident);
        assert_eq!(entry.frame(), Some(7));
        assert_eq!(entry.last_load(), Some(42));
        assert_eq!(entry.last_access(), Some(42));
        assert!(!entry.is_modified());
    }

    #[test]
    fn test_write_sets_modified_and_counts() {
        let mut store = PageTableStore::initialize(1).unwrap();
        store.mark_resident(0, 0, 1);
        store.record_access(0, AccessMode::Read, 2);
        store.record_access(0, AccessMode::Write, 3);

        let entry = store.entry(0).unwrap();
        assert_eq!(entry.read_count(), 1);
        assert_eq!(entry.write_count(), 1);
        assert!(entry.is_modified());
        assert_eq!(entry.last_access(), Some(3));
        assert_eq!(entry.last_load(), Some(1));
    }

    #[test]
    fn test_evict_keeps_counters() {
        let mut store = PageTableStore::initialize(1).unwrap();
        store.mark_resident(0, 3, 1);
        store.record_access(0, AccessMode::Write, 1);
        store.mark_evicted(0);

        let entry = store.entry(0).unwrap();
        assert_eq!(entry.status(), PageStatus::Swapped);
        assert_eq!(entry.frame(), None);
        assert_eq!(entry.last_access(), None);
        assert_eq!(entry.last_load(), None);
        assert!(!entry.is_modified());
        assert_eq!(entry.write_count(), 1);
        assert!(entry.check(0).is_ok());
    }

    #[test]
    fn test_reload_clears_modified() {
        let mut store = PageTableStore::initialize(1).unwrap();
        store.mark_resident(0, 0, 1);
        store.record_access(0, AccessMode::Write, 1);
        store.mark_evicted(0);
        store.mark_resident(0, 1, 5);
        assert!(!store.entry(0).unwrap().is_modified());
    }
}
