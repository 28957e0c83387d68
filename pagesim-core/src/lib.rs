//! Pagesim Core - Page Table Simulator with DST
//!
//! TigerStyle simulation-first model of a virtual-memory page table with
//! pluggable page replacement.
//!
//! # Philosophy
//!
//! Pagesim is built simulation-first:
//! 1. Frame allocation, backing-store I/O and statistics go through traits
//! 2. Every component is testable under a deterministic simulation
//! 3. Seeds are logged for reproducibility
//! 4. Contract violations are errors, never silent fallbacks
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 PageTable                     │
//! ├──────────────────────────────────────────────┤
//! │  PageTableStore       │ one entry per page    │
//! │  ReplacementTracker   │ LRU list / FIFO ring  │
//! ├──────────────────────────────────────────────┤
//! │  PagingBackend        │ frames, store, stats  │
//! ├──────────────────────────────────────────────┤
//! │  DST Framework        │ SimMemory, PropertyTest│
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust
//! use pagesim_core::dst::SimMemory;
//! use pagesim_core::{AccessMode, PageTable, PageTableConfig, ReplacementPolicy};
//!
//! let mut table = PageTable::new(PageTableConfig::new(ReplacementPolicy::Lru, 4)).unwrap();
//! let mut memory = SimMemory::new(2);
//!
//! table.request_page(&mut memory, 0, AccessMode::Read, 0).unwrap();
//! table.request_page(&mut memory, 1, AccessMode::Write, 1).unwrap();
//! table.request_page(&mut memory, 0, AccessMode::Read, 2).unwrap();
//!
//! // Page 1 is least recently used and gets evicted.
//! let frame = table.request_page(&mut memory, 2, AccessMode::Read, 3).unwrap();
//! assert_eq!(frame, 1);
//! assert_eq!(memory.stats().saves, 1);
//! println!("{}", table.dump_status());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod config;
pub mod constants;
pub mod dst;
pub mod error;
pub mod page_table;
pub mod telemetry;
pub mod tracker;

// Re-export common types
pub use backend::{BackingStore, FrameAllocator, PagingBackend, StatsSink};
pub use config::{PageTableConfig, ReplacementPolicy};
pub use constants::*;
pub use dst::{
    create_simulation,
    run_property_tests,
    test_seeds,
    DeterministicRng,
    PagingModel,
    // Property-based testing
    PropertyTest,
    PropertyTestFailure,
    PropertyTestResult,
    PropertyTestable,
    SimClock,
    SimConfig,
    SimEnvironment,
    SimMemory,
    SimStats,
    Simulation,
    TimeAdvanceConfig,
};
pub use error::{PageTableError, PageTableResult};
pub use page_table::{
    AccessMode, AccessOutcome, Eviction, FrameId, PageNumber, PageStatus, PageTable,
    PageTableEntry, StatusReport, StatusRow, Tick,
};
pub use telemetry::{init_tracing, TelemetryConfig, TelemetryError};
pub use tracker::{ArrivalTracker, RecencyTracker, ReplacementTracker};
