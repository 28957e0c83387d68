//! Tracing Setup
//!
//! `TigerStyle`: Optional logging with graceful fallback. Never panics if a
//! subscriber is already installed.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pagesim_core::telemetry::{init_tracing, TelemetryConfig};
//!
//! let config = TelemetryConfig::builder().filter("pagesim_core=debug").build();
//! init_tracing(&config).expect("tracing init");
//! ```
//!
//! ## Environment Variables
//!
//! - `RUST_LOG` - Overrides the configured filter when set

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::constants::TELEMETRY_FILTER_DEFAULT;

/// Tracing setup errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Filter directive could not be parsed
    #[error("invalid filter directive {directive:?}: {reason}")]
    InvalidFilter {
        /// The rejected directive
        directive: String,
        /// Parser message
        reason: String,
    },

    /// A global subscriber is already installed
    #[error("tracing initialization failed: {reason}")]
    InitFailed {
        /// The reason for the failure
        reason: String,
    },
}

/// Result type for tracing setup
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Configuration for the fmt subscriber
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
    /// Include span enter/exit in output
    pub with_span_events: bool,
    /// Print the event target (module path)
    pub with_target: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            filter: TELEMETRY_FILTER_DEFAULT.to_string(),
            with_span_events: false,
            with_target: true,
        }
    }
}

impl TelemetryConfig {
    /// Create a builder for `TelemetryConfig`
    #[must_use]
    pub fn builder() -> TelemetryConfigBuilder {
        TelemetryConfigBuilder::default()
    }

    /// Resolve the filter, preferring `RUST_LOG`.
    ///
    /// # Errors
    ///
    /// Returns `TelemetryError::InvalidFilter` if the configured directive
    /// does not parse.
    pub fn env_filter(&self) -> Result<EnvFilter> {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
        EnvFilter::try_new(&self.filter).map_err(|e| TelemetryError::InvalidFilter {
            directive: self.filter.clone(),
            reason: e.to_string(),
        })
    }
}

/// Builder for `TelemetryConfig`
#[derive(Debug, Default)]
pub struct TelemetryConfigBuilder {
    filter: Option<String>,
    with_span_events: Option<bool>,
    with_target: Option<bool>,
}

impl TelemetryConfigBuilder {
    /// Set the filter directive
    #[must_use]
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Log span enter/exit (shows every `request_page` at trace level)
    #[must_use]
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.with_span_events = Some(enabled);
        self
    }

    /// Print event targets
    #[must_use]
    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = Some(enabled);
        self
    }

    /// Build the `TelemetryConfig`
    #[must_use]
    pub fn build(self) -> TelemetryConfig {
        let default = TelemetryConfig::default();
        TelemetryConfig {
            filter: self.filter.unwrap_or(default.filter),
            with_span_events: self.with_span_events.unwrap_or(default.with_span_events),
            with_target: self.with_target.unwrap_or(default.with_target),
        }
    }
}

/// Install a global fmt subscriber.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidFilter` for a bad directive and
/// `TelemetryError::InitFailed` if a global subscriber already exists.
pub fn init_tracing(config: &TelemetryConfig) -> Result<()> {
    use tracing_subscriber::fmt::format::FmtSpan;

    let span_events = if config.with_span_events {
        FmtSpan::ENTER | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    tracing_subscriber::fmt()
        .with_env_filter(config.env_filter()?)
        .with_target(config.with_target)
        .with_span_events(span_events)
        .try_init()
        .map_err(|e| TelemetryError::InitFailed {
            reason: e.to_string(),
        })?;

    tracing::debug!(filter = %config.filter, "tracing initialized");
    Ok(())
}
