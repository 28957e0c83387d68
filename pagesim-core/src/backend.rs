//! Paging Backend Traits
//!
//! TigerStyle: Abstract interface for everything the page table does not own.
//!
//! # Simulation-First
//!
//! The page table only decides which page lives where. Frame allocation,
//! backing-store I/O and statistics are reached through these traits.
//! `dst::SimMemory` implements all of them for tests and simulations.

use crate::page_table::{FrameId, PageNumber, Tick};

/// Source of free physical frames.
pub trait FrameAllocator {
    /// Hand out a frame nobody holds, or `None` when memory is full.
    fn find_free_frame(&mut self) -> Option<FrameId>;
}

/// Backing store that pages are loaded from and saved to.
pub trait BackingStore {
    /// Bring `page` into `frame` at `time`.
    fn load_frame(&mut self, frame: FrameId, page: PageNumber, time: Tick);

    /// Write the contents of `frame` back before it is reused.
    ///
    /// Only called for frames whose page was modified.
    fn save_frame(&mut self, frame: FrameId);
}

/// Receiver of hit/fault events.
pub trait StatsSink {
    /// An access found its page resident.
    fn report_hit(&mut self);

    /// An access found its page unmapped or swapped.
    fn report_fault(&mut self);
}

/// Everything an access needs from the outside world.
pub trait PagingBackend: FrameAllocator + BackingStore + StatsSink {}

impl<T: FrameAllocator + BackingStore + StatsSink + ?Sized> PagingBackend for T {}
