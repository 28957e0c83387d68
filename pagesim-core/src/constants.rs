//! TigerStyle Constants
//!
//! All limits use big-endian naming: CATEGORY_SPECIFICS_UNIT_LIMIT
//! Example: PAGE_TABLE_PAGES_COUNT_MAX (not MAX_PAGES)
//!
//! Every constant includes units in the name:
//! - _COUNT_MAX/MIN for quantity limits
//! - _TICKS_MAX for logical time
//! - _DEFAULT for defaults

// =============================================================================
// Page Table Limits
// =============================================================================

/// Maximum number of pages in a single page table (enforced by
/// `PageTableConfig::validate`)
pub const PAGE_TABLE_PAGES_COUNT_MAX: usize = 1 << 24;

/// Minimum number of pages in a page table
pub const PAGE_TABLE_PAGES_COUNT_MIN: usize = 1;

/// Default number of pages for a simulation
pub const PAGE_TABLE_PAGES_COUNT_DEFAULT: usize = 64;

// =============================================================================
// Physical Memory Limits
// =============================================================================

/// Maximum number of physical frames in a simulated memory
pub const MEMORY_FRAMES_COUNT_MAX: usize = 1 << 20;

/// Default number of physical frames for a simulation
pub const MEMORY_FRAMES_COUNT_DEFAULT: usize = 8;

// =============================================================================
// Status Report
// =============================================================================

/// Marker printed for absent frame/timestamp fields
pub const STATUS_ABSENT_MARKER: &str = "-";

// =============================================================================
// DST (Deterministic Simulation Testing) Limits
// =============================================================================

/// Maximum number of simulation steps
pub const DST_SIMULATION_STEPS_MAX: u64 = 1_000_000;

/// Maximum tick advance per step
pub const DST_TIME_ADVANCE_TICKS_MAX: u64 = 1_000_000;

/// Default number of operations per property test
pub const DST_PROPERTY_OPERATIONS_COUNT_DEFAULT: u64 = 100;

// =============================================================================
// Telemetry
// =============================================================================

/// Default log filter directive
pub const TELEMETRY_FILTER_DEFAULT: &str = "pagesim_core=info";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_table_limits_valid() {
        assert!(PAGE_TABLE_PAGES_COUNT_MIN > 0);
        assert!(PAGE_TABLE_PAGES_COUNT_MIN <= PAGE_TABLE_PAGES_COUNT_DEFAULT);
        assert!(PAGE_TABLE_PAGES_COUNT_DEFAULT <= PAGE_TABLE_PAGES_COUNT_MAX);
    }

    #[test]
    fn test_memory_limits_valid() {
        assert!(MEMORY_FRAMES_COUNT_DEFAULT > 0);
        assert!(MEMORY_FRAMES_COUNT_DEFAULT <= MEMORY_FRAMES_COUNT_MAX);
        // A default simulation must be able to force evictions.
        assert!(MEMORY_FRAMES_COUNT_DEFAULT < PAGE_TABLE_PAGES_COUNT_DEFAULT);
    }

    #[test]
    fn test_dst_limits_valid() {
        assert!(DST_PROPERTY_OPERATIONS_COUNT_DEFAULT <= DST_SIMULATION_STEPS_MAX);
        assert!(DST_TIME_ADVANCE_TICKS_MAX > 0);
    }
}
