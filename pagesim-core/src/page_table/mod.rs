//! Page Table - Residency state machine and access coordinator
//!
//! TigerStyle: One explicit instance per simulation, no global state.
//!
//! # Access Flow
//!
//! ```text
//! request_page(page, mode, time)
//!        │
//!        ├── out of range ─────────────────────► InvalidReference
//!        │
//!        ├── resident (hit) ── record_access ──► frame
//!        │                     tracker.on_hit
//!        │
//!        └── unmapped/swapped (fault)
//!              find_free_frame ── none ──► tracker.select_victim
//!                    │                      save_frame if modified
//!                    │                      mark_evicted(victim)
//!                    ▼
//!              load_frame ── mark_resident ── tracker.on_load
//!                    │
//!                    └── record_access ────────► frame
//! ```
//!
//! Per-page states: `Unmapped → Resident → Swapped → Resident → …`

mod entry;
mod report;
mod store;

pub use entry::{AccessMode, FrameId, PageNumber, PageStatus, PageTableEntry, Tick};
pub use report::{StatusReport, StatusRow};
pub use store::PageTableStore;

use std::collections::HashMap;

use crate::backend::PagingBackend;
use crate::config::{PageTableConfig, ReplacementPolicy};
use crate::error::{PageTableError, PageTableResult};
use crate::tracker::ReplacementTracker;

/// A page removed from its frame to make room for a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eviction {
    /// The victim page
    pub page: PageNumber,
    /// Whether the victim's frame was saved before reuse
    pub written_back: bool,
}

/// What a single access did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessOutcome {
    /// Page was already resident
    Hit {
        /// Frame holding the page
        frame: FrameId,
    },
    /// Page had to be loaded
    Fault {
        /// Frame the page was loaded into
        frame: FrameId,
        /// Page evicted to free the frame, if memory was full
        evicted: Option<Eviction>,
    },
}

impl AccessOutcome {
    /// Frame now holding the requested page.
    #[must_use]
    pub fn frame(&self) -> FrameId {
        match self {
            Self::Hit { frame } | Self::Fault { frame, .. } => *frame,
        }
    }

    /// Whether the access was a hit.
    #[must_use]
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit { .. })
    }

    /// Page evicted by this access, if any.
    #[must_use]
    pub fn evicted(&self) -> Option<Eviction> {
        match self {
            Self::Hit { .. } => None,
            Self::Fault { evicted, .. } => *evicted,
        }
    }
}

/// Page table with its single active replacement tracker.
///
/// # Example
///
/// ```rust
/// use pagesim_core::dst::SimMemory;
/// use pagesim_core::{AccessMode, PageTable, PageTableConfig, ReplacementPolicy};
///
/// let mut table = PageTable::new(PageTableConfig::new(ReplacementPolicy::Lru, 4)).unwrap();
/// let mut memory = SimMemory::new(2);
///
/// let frame = table.request_page(&mut memory, 3, AccessMode::Read, 0).unwrap();
/// assert_eq!(frame, 0);
/// assert_eq!(memory.stats().faults, 1);
/// ```
#[derive(Debug, Clone)]
pub struct PageTable {
    store: PageTableStore,
    tracker: ReplacementTracker,
}

impl PageTable {
    /// Create a page table with every page unmapped.
    ///
    /// # Errors
    /// Returns `Configuration` for an invalid page count or failed
    /// allocation, `UnsupportedPolicy` for `clock`.
    pub fn new(config: PageTableConfig) -> PageTableResult<Self> {
        config.validate()?;

        let store = PageTableStore::initialize(config.pages_count)?;
        let tracker = ReplacementTracker::for_policy(config.policy, config.pages_count)?;

        tracing::info!(
            policy = %config.policy,
            pages_count = config.pages_count,
            "page table initialized"
        );

        Ok(Self { store, tracker })
    }

    /// Active replacement policy.
    #[must_use]
    pub fn policy(&self) -> ReplacementPolicy {
        self.tracker.policy()
    }

    /// Number of virtual pages.
    #[must_use]
    pub fn pages_count(&self) -> usize {
        self.store.len()
    }

    /// Number of pages currently held in frames.
    #[must_use]
    pub fn resident_count(&self) -> usize {
        self.store.iter().filter(|(_, e)| e.is_resident()).count()
    }

    /// Get the entry for `page`.
    ///
    /// # Errors
    /// Returns `InvalidReference` for pages out of range.
    pub fn entry(&self, page: PageNumber) -> PageTableResult<&PageTableEntry> {
        self.store.entry(page)
    }

    /// Get the status of `page`.
    ///
    /// # Errors
    /// Returns `InvalidReference` for pages out of range.
    pub fn status_of(&self, page: PageNumber) -> PageTableResult<PageStatus> {
        self.store.status_of(page)
    }

    /// The active tracker.
    #[must_use]
    pub fn tracker(&self) -> &ReplacementTracker {
        &self.tracker
    }

    /// Access `page` and return the frame holding it.
    ///
    /// # Errors
    /// Every error is fatal to the run: `InvalidReference` (nothing is
    /// mutated), `EmptyTracker` when memory is full but nothing is
    /// resident, `InvariantViolation` when table and tracker disagree.
    pub fn request_page<B: PagingBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        page: PageNumber,
        mode: AccessMode,
        time: Tick,
    ) -> PageTableResult<FrameId> {
        self.request_page_detailed(backend, page, mode, time)
            .map(|outcome| outcome.frame())
    }

    /// Access `page` and report whether it hit, faulted, or evicted.
    ///
    /// # Errors
    /// Same as [`PageTable::request_page`].
    #[tracing::instrument(level = "trace", skip(self, backend), fields(policy = %self.policy()))]
    pub fn request_page_detailed<B: PagingBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        page: PageNumber,
        mode: AccessMode,
        time: Tick,
    ) -> PageTableResult<AccessOutcome> {
        let entry = self.store.entry(page)?;

        if entry.is_resident() {
            let frame = entry.frame().ok_or_else(|| {
                PageTableError::invariant(format!("resident page {page} has no frame"))
            })?;
            self.tracker.on_hit(page)?;
            backend.report_hit();
            self.store.record_access(page, mode, time);

            tracing::trace!(page, frame, "hit");
            return Ok(AccessOutcome::Hit { frame });
        }

        if self.tracker.contains(page) {
            return Err(PageTableError::invariant(format!(
                "{} page {page} still tracked by {}",
                entry.status(),
                self.policy()
            )));
        }

        backend.report_fault();
        let (frame, evicted) = match backend.find_free_frame() {
            Some(frame) => (frame, None),
            None => {
                let (frame, eviction) = self.evict(backend)?;
                (frame, Some(eviction))
            }
        };

        tracing::debug!(page, frame, time, "page given frame");
        backend.load_frame(frame, page, time);
        self.store.mark_resident(page, frame, time);
        self.tracker.on_load(page)?;
        self.store.record_access(page, mode, time);

        Ok(AccessOutcome::Fault { frame, evicted })
    }

    /// Evict the active tracker's victim and return its frame.
    fn evict<B: PagingBackend + ?Sized>(
        &mut self,
        backend: &mut B,
    ) -> PageTableResult<(FrameId, Eviction)> {
        let victim = self.tracker.select_victim()?;
        let entry = self.store.entry(victim)?;
        let frame = match (entry.status(), entry.frame()) {
            (PageStatus::Resident, Some(frame)) => frame,
            (status, _) => {
                return Err(PageTableError::invariant(format!(
                    "victim page {victim} is {status}, not resident"
                )))
            }
        };

        let written_back = entry.is_modified();
        if written_back {
            backend.save_frame(frame);
        }
        self.store.mark_evicted(victim);

        tracing::debug!(victim, frame, written_back, policy = %self.policy(), "evicted page");
        Ok((
            frame,
            Eviction {
                page: victim,
                written_back,
            },
        ))
    }

    /// Snapshot every page in ascending order.
    #[must_use]
    pub fn dump_status(&self) -> StatusReport {
        StatusReport::new(
            self.store
                .iter()
                .map(|(page, entry)| StatusRow::from_entry(page, entry))
                .collect(),
        )
    }

    /// Verify that every entry is self-consistent, that the tracker holds
    /// exactly the resident pages, and that no frame is shared.
    ///
    /// # Errors
    /// Returns `InvariantViolation` describing the first broken rule.
    pub fn check_invariants(&self) -> PageTableResult<()> {
        let mut frames: HashMap<FrameId, PageNumber> = HashMap::new();
        let mut resident = 0;

        for (page, entry) in self.store.iter() {
            entry.check(page)?;

            if entry.is_resident() != self.tracker.contains(page) {
                return Err(PageTableError::invariant(format!(
                    "page {page} is {} but tracked={}",
                    entry.status(),
                    self.tracker.contains(page)
                )));
            }

            if let Some(frame) = entry.frame() {
                resident += 1;
                if let Some(other) = frames.insert(frame, page) {
                    return Err(PageTableError::invariant(format!(
                        "frame {frame} held by pages {other} and {page}"
                    )));
                }
            }
        }

        if resident != self.tracker.len() {
            return Err(PageTableError::invariant(format!(
                "{resident} resident pages but {} tracked",
                self.tracker.len()
            )));
        }
        Ok(())
    }
}
