//! PagingModel - Property-testable page table workload
//!
//! Drives a `PageTable` with random references (including out-of-range
//! ones) and checks it against shadow counters after every access.

use super::clock::SimClock;
use super::memory::SimMemory;
use super::property::PropertyTestable;
use super::rng::DeterministicRng;
use crate::config::{PageTableConfig, ReplacementPolicy};
use crate::error::{PageTableError, PageTableResult};
use crate::page_table::{AccessMode, PageNumber, PageStatus, PageTable};

/// Probability that a generated reference is out of range.
const INVALID_REFERENCE_PROBABILITY: f64 = 0.05;

/// Probability that a generated reference is a write.
const WRITE_PROBABILITY: f64 = 0.3;

/// Probability that a reference falls in the hot set.
const HOT_SET_PROBABILITY: f64 = 0.7;

/// A generated reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagingOp {
    /// Valid page access
    Access {
        /// Page referenced
        page: PageNumber,
        /// Read or write
        mode: AccessMode,
    },
    /// Reference past the end of the table
    Invalid {
        /// Page referenced
        page: PageNumber,
    },
}

/// Page table plus simulated memory plus shadow counters.
#[derive(Debug)]
pub struct PagingModel {
    table: PageTable,
    memory: SimMemory,
    reads: Vec<u64>,
    writes: Vec<u64>,
    written_since_load: Vec<bool>,
}

impl PagingModel {
    /// Create a model over `pages_count` pages and `frames_count` frames.
    ///
    /// # Errors
    /// Returns the page table construction error.
    pub fn new(
        policy: ReplacementPolicy,
        pages_count: usize,
        frames_count: usize,
    ) -> PageTableResult<Self> {
        let table = PageTable::new(PageTableConfig::new(policy, pages_count))?;
        Ok(Self {
            table,
            memory: SimMemory::new(frames_count),
            reads: vec![0; pages_count],
            writes: vec![0; pages_count],
            written_since_load: vec![false; pages_count],
        })
    }

    /// The page table under test.
    #[must_use]
    pub fn table(&self) -> &PageTable {
        &self.table
    }

    /// The simulated memory.
    #[must_use]
    pub fn memory(&self) -> &SimMemory {
        &self.memory
    }

    fn apply_access(
        &mut self,
        page: PageNumber,
        mode: AccessMode,
        clock: &SimClock,
    ) -> Result<(), String> {
        let was_resident = self.table.status_of(page).map_err(|e| e.to_string())?
            == PageStatus::Resident;

        let outcome = self
            .table
            .request_page_detailed(&mut self.memory, page, mode, clock.now())
            .map_err(|e| e.to_string())?;

        if outcome.is_hit() != was_resident {
            return Err(format!(
                "page {page} resident={was_resident} but outcome {outcome:?}"
            ));
        }
        if let Some(eviction) = outcome.evicted() {
            if eviction.written_back != self.written_since_load[eviction.page] {
                return Err(format!(
                    "victim {} written_back={} but written since load={}",
                    eviction.page, eviction.written_back, self.written_since_load[eviction.page]
                ));
            }
            self.written_since_load[eviction.page] = false;
        }
        if self.memory.page_in(outcome.frame()) != Some(page) {
            return Err(format!(
                "frame {} holds {:?}, expected page {page}",
                outcome.frame(),
                self.memory.page_in(outcome.frame())
            ));
        }

        match mode {
            AccessMode::Read => self.reads[page] += 1,
            AccessMode::Write => {
                self.writes[page] += 1;
                self.written_since_load[page] = true;
            }
        }
        Ok(())
    }

    fn apply_invalid(&mut self, page: PageNumber, clock: &SimClock) -> Result<(), String> {
        let before = self.table.dump_status();
        let stats = self.memory.stats();

        match self
            .table
            .request_page(&mut self.memory, page, AccessMode::Write, clock.now())
        {
            Err(PageTableError::InvalidReference { .. }) => {}
            other => return Err(format!("page {page} out of range returned {other:?}")),
        }

        if self.table.dump_status() != before || self.memory.stats() != stats {
            return Err(format!("invalid reference to page {page} mutated state"));
        }
        Ok(())
    }

    /// Most-recent-first order must match descending access (LRU) or
    /// load (FIFO) ticks.
    fn check_victim_order(&self) -> Result<(), String> {
        let mut previous = None;
        for page in self.table.tracker().pages() {
            let entry = self.table.entry(page).map_err(|e| e.to_string())?;
            let stamp = match self.table.policy() {
                ReplacementPolicy::Lru => entry.last_access(),
                _ => entry.last_load(),
            };
            if let (Some(prev), Some(cur)) = (previous, stamp) {
                if cur > prev {
                    return Err(format!(
                        "{} order broken at page {page}: tick {cur} after {prev}",
                        self.table.policy()
                    ));
                }
            }
            previous = stamp;
        }
        Ok(())
    }
}

impl PropertyTestable for PagingModel {
    type Operation = PagingOp;

    fn generate_operation(&self, rng: &mut DeterministicRng) -> PagingOp {
        let pages_count = self.table.pages_count();
        if rng.next_bool(INVALID_REFERENCE_PROBABILITY) {
            return PagingOp::Invalid {
                page: rng.next_usize(pages_count, pages_count * 2),
            };
        }
        let hot_pages = (pages_count / 4).max(1);
        PagingOp::Access {
            page: rng.next_page(pages_count, hot_pages, HOT_SET_PROBABILITY),
            mode: rng.next_access_mode(WRITE_PROBABILITY),
        }
    }

    fn apply_operation(&mut self, op: &PagingOp, clock: &SimClock) -> Result<(), String> {
        match *op {
            PagingOp::Access { page, mode } => self.apply_access(page, mode, clock),
            PagingOp::Invalid { page } => self.apply_invalid(page, clock),
        }
    }

    fn check_invariants(&self) -> Result<(), String> {
        self.table.check_invariants().map_err(|e| e.to_string())?;

        let resident = self.table.resident_count();
        if resident > self.memory.frames_count() {
            return Err(format!(
                "{resident} resident pages exceed {} frames",
                self.memory.frames_count()
            ));
        }

        for (page, row) in self.table.dump_status().rows().iter().enumerate() {
            if row.read_count != self.reads[page] || row.write_count != self.writes[page] {
                return Err(format!(
                    "page {page} counters r={} w={}, expected r={} w={}",
                    row.read_count, row.write_count, self.reads[page], self.writes[page]
                ));
            }
            if row.modified != self.written_since_load[page] {
                return Err(format!(
                    "page {page} modified={} but written since load={}",
                    row.modified, self.written_since_load[page]
                ));
            }
            if let Some(frame) = row.frame {
                if self.memory.page_in(frame) != Some(page) {
                    return Err(format!("resident page {page} not in its frame {frame}"));
                }
            }
            if row.status == PageStatus::Unmapped && row.read_count + row.write_count > 0 {
                return Err(format!("page {page} accessed but still unmapped"));
            }
        }

        self.check_victim_order()
    }

    fn describe_state(&self) -> String {
        format!("{:?}\n{}", self.memory.stats(), self.table.dump_status())
    }
}
