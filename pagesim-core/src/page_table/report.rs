//! Status Report - Per-page dump of the page table

use std::fmt;

use serde::Serialize;

use super::entry::{FrameId, PageNumber, PageStatus, PageTableEntry, Tick};
use crate::constants::STATUS_ABSENT_MARKER;

/// One row of the status dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRow {
    /// Page number
    pub page: PageNumber,
    /// Current status
    pub status: PageStatus,
    /// Written since last load
    pub modified: bool,
    /// Frame holding the page
    pub frame: Option<FrameId>,
    /// Tick of the last access
    pub last_access: Option<Tick>,
    /// Tick of the last load
    pub last_load: Option<Tick>,
    /// Lifetime reads
    pub read_count: u64,
    /// Lifetime writes
    pub write_count: u64,
}

impl StatusRow {
    pub(crate) fn from_entry(page: PageNumber, entry: &PageTableEntry) -> Self {
        Self {
            page,
            status: entry.status(),
            modified: entry.is_modified(),
            frame: entry.frame(),
            last_access: entry.last_access(),
            last_load: entry.last_load(),
            read_count: entry.read_count(),
            write_count: entry.write_count(),
        }
    }
}

/// Snapshot of every page, in ascending page order.
///
/// `Display` renders a fixed-width table with `-` for absent fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StatusReport {
    rows: Vec<StatusRow>,
}

impl StatusReport {
    pub(crate) fn new(rows: Vec<StatusRow>) -> Self {
        Self { rows }
    }

    /// Rows in ascending page order.
    #[must_use]
    pub fn rows(&self) -> &[StatusRow] {
        &self.rows
    }

    /// Render the rows as a JSON array.
    ///
    /// # Errors
    /// Returns the serializer error, which cannot occur for these types.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn or_absent<T: fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| STATUS_ABSENT_MARKER.to_string(), |v| v.to_string())
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>4} {:>8} {:>4} {:>6} {:>7} {:>7} {:>7} {:>7}",
            "Page", "Status", "Mod?", "Frame", "Acc(t)", "Load(t)", "#Reads", "#Writes"
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "[{:02}] {:>8} {:>4} {:>6} {:>7} {:>7} {:>7} {:>7}",
                row.page,
                row.status.as_str(),
                if row.modified { "yes" } else { "no" },
                or_absent(row.frame),
                or_absent(row.last_access),
                or_absent(row.last_load),
                row.read_count,
                row.write_count,
            )?;
        }
        Ok(())
    }
}
