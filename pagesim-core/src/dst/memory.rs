//! SimMemory - Simulated physical memory and backing store
//!
//! TigerStyle: In-memory stand-in for every paging backend, recording each
//! call so tests can assert on exactly what the page table asked for.

use crate::backend::{BackingStore, FrameAllocator, StatsSink};
use crate::constants::MEMORY_FRAMES_COUNT_MAX;
use crate::page_table::{FrameId, PageNumber, Tick};

/// Hit/fault/load/save counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimStats {
    /// Accesses to resident pages
    pub hits: u64,
    /// Accesses to unmapped or swapped pages
    pub faults: u64,
    /// Pages brought into a frame
    pub loads: u64,
    /// Frames written back
    pub saves: u64,
}

impl SimStats {
    /// Hits over all accesses, or 0.0 before the first access.
    #[must_use]
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.faults;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// A backing-store operation issued by the page table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    /// `load_frame(frame, page, time)`
    Load {
        /// Target frame
        frame: FrameId,
        /// Page loaded
        page: PageNumber,
        /// Tick of the load
        time: Tick,
    },
    /// `save_frame(frame)`
    Save {
        /// Frame written back
        frame: FrameId,
        /// Page the frame held
        page: Option<PageNumber>,
    },
}

/// Simulated memory with a fixed number of frames.
///
/// Free frames are handed out in ascending order and never returned: once
/// every frame has been given out, the page table must evict to make room.
#[derive(Debug, Clone)]
pub struct SimMemory {
    frames: Vec<Option<PageNumber>>,
    next_free: usize,
    stats: SimStats,
    log: Vec<StoreOp>,
    log_enabled: bool,
}

impl SimMemory {
    /// Create memory with `frames_count` frames.
    ///
    /// # Panics
    /// Panics if `frames_count` exceeds `MEMORY_FRAMES_COUNT_MAX`.
    #[must_use]
    pub fn new(frames_count: usize) -> Self {
        // Precondition
        assert!(
            frames_count <= MEMORY_FRAMES_COUNT_MAX,
            "frames_count {} exceeds max {}",
            frames_count,
            MEMORY_FRAMES_COUNT_MAX
        );

        Self {
            frames: vec![None; frames_count],
            next_free: 0,
            stats: SimStats::default(),
            log: Vec::new(),
            log_enabled: true,
        }
    }

    /// Enable or disable the store-op log (on by default).
    ///
    /// Long runs such as benchmarks turn it off; stats are kept either way.
    #[must_use]
    pub fn with_log(mut self, enabled: bool) -> Self {
        self.log_enabled = enabled;
        if !enabled {
            self.log = Vec::new();
        }
        self
    }

    /// Number of frames.
    #[must_use]
    pub fn frames_count(&self) -> usize {
        self.frames.len()
    }

    /// Page most recently loaded into `frame`.
    #[must_use]
    pub fn page_in(&self, frame: FrameId) -> Option<PageNumber> {
        self.frames.get(frame).copied().flatten()
    }

    /// Counters so far.
    #[must_use]
    pub fn stats(&self) -> SimStats {
        self.stats
    }

    /// Every load and save, in call order. Empty when logging is off.
    #[must_use]
    pub fn log(&self) -> &[StoreOp] {
        &self.log
    }
}

impl FrameAllocator for SimMemory {
    fn find_free_frame(&mut self) -> Option<FrameId> {
        if self.next_free < self.frames.len() {
            let frame = self.next_free;
            self.next_free += 1;
            Some(frame)
        } else {
            None
        }
    }
}

impl BackingStore for SimMemory {
    fn load_frame(&mut self, frame: FrameId, page: PageNumber, time: Tick) {
        // Precondition
        assert!(
            frame < self.frames.len(),
            "load into frame {} of {}",
            frame,
            self.frames.len()
        );

        self.frames[frame] = Some(page);
        self.stats.loads += 1;
        if self.log_enabled {
            self.log.push(StoreOp::Load { frame, page, time });
        }
    }

    fn save_frame(&mut self, frame: FrameId) {
        let page = self.page_in(frame);
        self.stats.saves += 1;
        if self.log_enabled {
            self.log.push(StoreOp::Save { frame, page });
        }
        tracing::trace!(frame, ?page, "frame saved");
    }
}

impl StatsSink for SimMemory {
    fn report_hit(&mut self) {
        self.stats.hits += 1;
    }

    fn report_fault(&mut self) {
        self.stats.faults += 1;
    }
}
