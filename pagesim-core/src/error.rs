//! Page Table Errors
//!
//! `TigerStyle`: Explicit error types with context.
//!
//! Every variant is fatal to a simulation run. The library reports them
//! through `Result` and the driver decides how to abort.

use thiserror::Error;

use crate::page_table::PageNumber;

/// Errors from page table operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageTableError {
    /// Invalid configuration or entry storage could not be obtained
    #[error("configuration error: {message}")]
    Configuration {
        /// What was wrong with the configuration
        message: String,
    },

    /// Replacement policy is declared but not implemented
    #[error("unsupported replacement policy: {policy}")]
    UnsupportedPolicy {
        /// Name of the policy
        policy: String,
    },

    /// Page number outside the declared range
    #[error("invalid page reference: {page} (page table has {pages_count} pages)")]
    InvalidReference {
        /// The requested page
        page: PageNumber,
        /// Number of pages in the table
        pages_count: usize,
    },

    /// Victim requested from a tracker with no pages
    #[error("no resident pages to evict under {policy} policy")]
    EmptyTracker {
        /// Name of the active policy
        policy: String,
    },

    /// Page table and tracker disagree
    #[error("invariant violation: {message}")]
    InvariantViolation {
        /// Description of the broken invariant
        message: String,
    },
}

impl PageTableError {
    /// Create a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an invariant violation error.
    #[must_use]
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }

    /// Create an empty tracker error.
    #[must_use]
    pub fn empty_tracker(policy: impl Into<String>) -> Self {
        Self::EmptyTracker {
            policy: policy.into(),
        }
    }

    /// Whether this error stems from the caller's trace rather than a bug.
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::InvalidReference { .. } | Self::EmptyTracker { .. }
        )
    }
}

/// Result type for page table operations.
pub type PageTableResult<T> = Result<T, PageTableError>;
