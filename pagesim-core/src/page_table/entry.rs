//! Page Table Entry - Per-page state
//!
//! TigerStyle: Optional fields are `Option`, never sentinel integers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PageTableError;

/// Index of a virtual page.
pub type PageNumber = usize;

/// Index of a physical frame.
pub type FrameId = usize;

/// Logical clock tick supplied by the caller.
pub type Tick = u64;

/// Where a page currently lives.
///
/// `Unmapped` is the initial state and is never re-entered; pages cycle
/// between `Resident` and `Swapped` afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    /// Never loaded
    #[default]
    Unmapped,
    /// Held in a physical frame
    Resident,
    /// Evicted to the backing store
    Swapped,
}

impl PageStatus {
    /// Get the status label used in reports.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unmapped => "unmapped",
            Self::Resident => "resident",
            Self::Swapped => "swapped",
        }
    }
}

impl fmt::Display for PageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of access made by a trace reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessMode {
    /// Read ("peek")
    Read,
    /// Write ("poke"), marks the page modified
    Write,
}

impl AccessMode {
    /// Trace character for this mode.
    #[must_use]
    pub fn as_char(&self) -> char {
        match self {
            Self::Read => 'r',
            Self::Write => 'w',
        }
    }
}

impl TryFrom<char> for AccessMode {
    type Error = PageTableError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'r' | 'R' => Ok(Self::Read),
            'w' | 'W' => Ok(Self::Write),
            other => Err(PageTableError::configuration(format!(
                "invalid access mode: {other:?}"
            ))),
        }
    }
}

/// State of a single virtual page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageTableEntry {
    pub(crate) status: PageStatus,
    pub(crate) modified: bool,
    pub(crate) frame: Option<FrameId>,
    pub(crate) last_access: Option<Tick>,
    pub(crate) last_load: Option<Tick>,
    pub(crate) read_count: u64,
    pub(crate) write_count: u64,
}

impl PageTableEntry {
    /// Current status.
    #[must_use]
    pub fn status(&self) -> PageStatus {
        self.status
    }

    /// Written since it was last loaded.
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Frame holding the page, present iff resident.
    #[must_use]
    pub fn frame(&self) -> Option<FrameId> {
        self.frame
    }

    /// Tick of the most recent access while resident.
    #[must_use]
    pub fn last_access(&self) -> Option<Tick> {
        self.last_access
    }

    /// Tick of the most recent load.
    #[must_use]
    pub fn last_load(&self) -> Option<Tick> {
        self.last_load
    }

    /// Lifetime number of reads.
    #[must_use]
    pub fn read_count(&self) -> u64 {
        self.read_count
    }

    /// Lifetime number of writes.
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.write_count
    }

    /// Whether the page is held in a frame.
    #[must_use]
    pub fn is_resident(&self) -> bool {
        self.status == PageStatus::Resident
    }

    /// Check the per-entry invariants.
    ///
    /// # Errors
    /// Returns `InvariantViolation` describing the first broken rule.
    pub fn check(&self, page: PageNumber) -> Result<(), PageTableError> {
        let resident = self.is_resident();
        if self.frame.is_some() != resident {
            return Err(PageTableError::invariant(format!(
                "page {page}: frame {:?} inconsistent with status {}",
                self.frame, self.status
            )));
        }
        if self.modified && !resident {
            return Err(PageTableError::invariant(format!(
                "page {page}: modified while {}",
                self.status
            )));
        }
        if !resident && (self.last_access.is_some() || self.last_load.is_some()) {
            return Err(PageTableError::invariant(format!(
                "page {page}: timestamps set while {}",
                self.status
            )));
        }
        Ok(())
    }
}
