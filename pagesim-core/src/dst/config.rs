//! SimConfig - Simulation Configuration
//!
//! TigerStyle: Seed management for deterministic testing.

use rand::Rng;
use std::env;

use crate::config::{PageTableConfig, ReplacementPolicy};
use crate::constants::{DST_SIMULATION_STEPS_MAX, MEMORY_FRAMES_COUNT_DEFAULT};

/// Configuration for a simulation run.
///
/// TigerStyle:
/// - Immutable after creation
/// - Seed logged for reproducibility
/// - All limits explicit
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Random seed for deterministic execution
    seed: u64,
    /// Maximum trace length accepted by `replay` and `random_trace`
    steps_max: u64,
    /// Page table under test
    table: PageTableConfig,
    /// Physical frames available
    frames_count: usize,
}

impl SimConfig {
    /// Create config with explicit seed and default table.
    ///
    /// # Example
    /// ```
    /// use pagesim_core::dst::SimConfig;
    /// let config = SimConfig::with_seed(12345);
    /// assert_eq!(config.seed(), 12345);
    /// ```
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            steps_max: DST_SIMULATION_STEPS_MAX,
            table: PageTableConfig::default(),
            frames_count: MEMORY_FRAMES_COUNT_DEFAULT,
        }
    }

    /// Create config from DST_SEED env var or random.
    ///
    /// If DST_SEED is set, uses that value.
    /// Otherwise, generates a random seed and prints it for reproducibility.
    #[must_use]
    pub fn from_env_or_random() -> Self {
        let seed = match env::var("DST_SEED") {
            Ok(seed_str) => {
                // Precondition: DST_SEED must be valid u64
                seed_str.parse::<u64>().unwrap_or_else(|_| {
                    panic!("DST_SEED must be a valid u64, got: {}", seed_str);
                })
            }
            Err(_) => {
                let seed = rand::thread_rng().gen::<u64>();
                eprintln!("DST: Generated random seed (replay with DST_SEED={})", seed);
                seed
            }
        };

        Self::with_seed(seed)
    }

    /// Get the seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Get the maximum number of steps.
    #[must_use]
    pub fn steps_max(&self) -> u64 {
        self.steps_max
    }

    /// Get the page table configuration.
    #[must_use]
    pub fn table(&self) -> &PageTableConfig {
        &self.table
    }

    /// Get the number of physical frames.
    #[must_use]
    pub fn frames_count(&self) -> usize {
        self.frames_count
    }

    /// Set the maximum number of steps.
    #[must_use]
    pub fn with_steps_max(mut self, steps_max: u64) -> Self {
        // Precondition
        assert!(steps_max > 0, "steps_max must be positive");
        self.steps_max = steps_max;
        self
    }

    /// Set the replacement policy.
    #[must_use]
    pub fn with_policy(mut self, policy: ReplacementPolicy) -> Self {
        self.table.policy = policy;
        self
    }

    /// Set the number of virtual pages.
    #[must_use]
    pub fn with_pages_count(mut self, pages_count: usize) -> Self {
        self.table.pages_count = pages_count;
        self
    }

    /// Set the number of physical frames.
    #[must_use]
    pub fn with_frames_count(mut self, frames_count: usize) -> Self {
        self.frames_count = frames_count;
        self
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::from_env_or_random()
    }
}
