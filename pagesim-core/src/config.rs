//! Page Table Configuration
//!
//! `TigerStyle`: Sensible defaults, builder pattern, explicit over implicit.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    PAGE_TABLE_PAGES_COUNT_DEFAULT, PAGE_TABLE_PAGES_COUNT_MAX, PAGE_TABLE_PAGES_COUNT_MIN,
};
use crate::error::{PageTableError, PageTableResult};

// =============================================================================
// ReplacementPolicy
// =============================================================================

/// Page replacement policy, fixed when the page table is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplacementPolicy {
    /// Evict the least recently accessed resident page
    #[default]
    #[serde(alias = "recency")]
    Lru,
    /// Evict the earliest loaded resident page
    #[serde(alias = "arrival")]
    Fifo,
    /// Reference-bit circular scan (not implemented)
    Clock,
}

impl ReplacementPolicy {
    /// Get the policy name as a string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lru => "lru",
            Self::Fifo => "fifo",
            Self::Clock => "clock",
        }
    }

    /// Whether a victim tracker exists for this policy.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Clock)
    }
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReplacementPolicy {
    type Err = PageTableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lru" | "recency" => Ok(Self::Lru),
            "fifo" | "arrival" => Ok(Self::Fifo),
            "clock" => Ok(Self::Clock),
            other => Err(PageTableError::configuration(format!(
                "unknown replacement policy: {other}"
            ))),
        }
    }
}

// =============================================================================
// PageTableConfig
// =============================================================================

/// Configuration for a page table.
///
/// # Example
///
/// ```rust
/// use pagesim_core::{PageTableConfig, ReplacementPolicy};
///
/// let config = PageTableConfig::default()
///     .with_policy(ReplacementPolicy::Fifo)
///     .with_pages_count(16);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageTableConfig {
    /// Replacement policy.
    ///
    /// Default: LRU
    pub policy: ReplacementPolicy,

    /// Number of virtual pages.
    ///
    /// Default: 64
    pub pages_count: usize,
}

impl Default for PageTableConfig {
    fn default() -> Self {
        Self {
            policy: ReplacementPolicy::default(),
            pages_count: PAGE_TABLE_PAGES_COUNT_DEFAULT,
        }
    }
}

impl PageTableConfig {
    /// Create a config with the given policy and page count.
    #[must_use]
    pub fn new(policy: ReplacementPolicy, pages_count: usize) -> Self {
        Self {
            policy,
            pages_count,
        }
    }

    /// Set the replacement policy.
    #[must_use]
    pub fn with_policy(mut self, policy: ReplacementPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the number of virtual pages.
    #[must_use]
    pub fn with_pages_count(mut self, pages_count: usize) -> Self {
        self.pages_count = pages_count;
        self
    }

    /// Check the configuration before any storage is allocated.
    ///
    /// The page count is capped at `PAGE_TABLE_PAGES_COUNT_MAX` even when
    /// the allocation would succeed. Allocation failure below the cap is
    /// reported by `PageTableStore::initialize`.
    ///
    /// # Errors
    /// Returns `Configuration` if the page count is out of range and
    /// `UnsupportedPolicy` for policies without a tracker.
    pub fn validate(&self) -> PageTableResult<()> {
        if self.pages_count < PAGE_TABLE_PAGES_COUNT_MIN {
            return Err(PageTableError::configuration(format!(
                "pages_count {} below minimum {}",
                self.pages_count, PAGE_TABLE_PAGES_COUNT_MIN
            )));
        }
        if self.pages_count > PAGE_TABLE_PAGES_COUNT_MAX {
            return Err(PageTableError::configuration(format!(
                "pages_count {} exceeds maximum {}",
                self.pages_count, PAGE_TABLE_PAGES_COUNT_MAX
            )));
        }
        if !self.policy.is_supported() {
            return Err(PageTableError::UnsupportedPolicy {
                policy: self.policy.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PageTableConfig::default();
        assert_eq!(config.policy, ReplacementPolicy::Lru);
        assert_eq!(config.pages_count, PAGE_TABLE_PAGES_COUNT_DEFAULT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_chaining() {
        let config = PageTableConfig::default()
            .with_policy(ReplacementPolicy::Fifo)
            .with_pages_count(3);
        assert_eq!(config, PageTableConfig::new(ReplacementPolicy::Fifo, 3));
    }

    #[test]
    fn test_zero_pages_rejected() {
        let err = PageTableConfig::default()
            .with_pages_count(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, PageTableError::Configuration { .. }));
    }

    #[test]
    fn test_too_many_pages_rejected() {
        let err = PageTableConfig::default()
            .with_pages_count(PAGE_TABLE_PAGES_COUNT_MAX + 1)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("exceeds maximum"));
    }

    #[test]
    fn test_clock_rejected() {
        let err = PageTableConfig::default()
            .with_policy(ReplacementPolicy::Clock)
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            PageTableError::UnsupportedPolicy {
                policy: "clock".to_string()
            }
        );
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("lru".parse::<ReplacementPolicy>(), Ok(ReplacementPolicy::Lru));
        assert_eq!(" FIFO ".parse::<ReplacementPolicy>(), Ok(ReplacementPolicy::Fifo));
        assert_eq!("arrival".parse::<ReplacementPolicy>(), Ok(ReplacementPolicy::Fifo));
        assert_eq!("Clock".parse::<ReplacementPolicy>(), Ok(ReplacementPolicy::Clock));
        assert!("random".parse::<ReplacementPolicy>().is_err());
    }

    #[test]
    fn test_config_deserialize() {
        let config: PageTableConfig =
            serde_json::from_str(r#"{"policy":"fifo","pages_count":5}"#).unwrap();
        assert_eq!(config, PageTableConfig::new(ReplacementPolicy::Fifo, 5));
    }
}
