//! Simulation - DST Test Harness
//!
//! TigerStyle: Simulation harness that provides a deterministic environment
//! with a page table, simulated memory, a clock, and a seeded RNG.

use super::clock::SimClock;
use super::config::SimConfig;
use super::memory::SimMemory;
use super::rng::DeterministicRng;
use crate::constants::MEMORY_FRAMES_COUNT_MAX;
use crate::error::{PageTableError, PageTableResult};
use crate::page_table::{AccessMode, AccessOutcome, PageNumber, PageTable};

/// One reference in an access trace.
pub type TraceRecord = (PageNumber, AccessMode);

/// Environment provided to simulation tests.
///
/// TigerStyle: All simulation resources in one place.
#[derive(Debug)]
pub struct SimEnvironment {
    /// Simulation configuration
    pub config: SimConfig,
    /// Logical clock stamping every access
    pub clock: SimClock,
    /// Deterministic RNG
    pub rng: DeterministicRng,
    /// Page table under test
    pub table: PageTable,
    /// Simulated frames, backing store and stats
    pub memory: SimMemory,
}

impl SimEnvironment {
    /// Access `page` at the current tick, then advance the clock.
    ///
    /// # Errors
    /// Returns any page table error.
    pub fn access(&mut self, page: PageNumber, mode: AccessMode) -> PageTableResult<AccessOutcome> {
        let now = self.clock.now();
        let outcome = self
            .table
            .request_page_detailed(&mut self.memory, page, mode, now)?;
        self.clock.tick();
        Ok(outcome)
    }

    /// Access every record in order.
    ///
    /// # Errors
    /// Returns `Configuration` if the trace is longer than `steps_max`,
    /// otherwise stops at and returns the first page table error.
    pub fn replay(&mut self, trace: &[TraceRecord]) -> PageTableResult<Vec<AccessOutcome>> {
        let steps_max = self.config.steps_max();
        if trace.len() as u64 > steps_max {
            return Err(PageTableError::configuration(format!(
                "trace of {} references exceeds steps_max {steps_max}",
                trace.len()
            )));
        }
        trace
            .iter()
            .map(|&(page, mode)| self.access(page, mode))
            .collect()
    }

    /// Generate `len` references with 80% of accesses hitting a hot set of
    /// a quarter of the pages and 30% writes.
    ///
    /// # Panics
    /// Panics if `len` exceeds `steps_max`.
    #[must_use]
    pub fn random_trace(&mut self, len: usize) -> Vec<TraceRecord> {
        // Precondition
        assert!(
            len as u64 <= self.config.steps_max(),
            "trace length {} exceeds steps_max {}",
            len,
            self.config.steps_max()
        );
        let pages_count = self.table.pages_count();
        let hot_pages = (pages_count / 4).max(1);
        (0..len)
            .map(|_| {
                (
                    self.rng.next_page(pages_count, hot_pages, 0.8),
                    self.rng.next_access_mode(0.3),
                )
            })
            .collect()
    }

    /// Current tick.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.clock.now()
    }
}

/// DST simulation harness.
///
/// TigerStyle:
/// - Single seed controls all randomness
/// - Environment is provided to test closure
///
/// # Example
///
/// ```rust
/// use pagesim_core::dst::{Simulation, SimConfig};
/// use pagesim_core::{AccessMode, ReplacementPolicy};
///
/// let sim = Simulation::new(
///     SimConfig::with_seed(42)
///         .with_policy(ReplacementPolicy::Fifo)
///         .with_pages_count(8)
///         .with_frames_count(2),
/// );
///
/// sim.run(|mut env| {
///     env.access(0, AccessMode::Read)?;
///     env.access(1, AccessMode::Write)?;
///     let outcome = env.access(2, AccessMode::Read)?;
///     assert_eq!(outcome.evicted().map(|e| e.page), Some(0));
///     Ok(())
/// })
/// .unwrap();
/// ```
#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
}

impl Simulation {
    /// Create a new simulation with the given configuration.
    #[must_use]
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }

    /// Build the environment and hand it to `test_fn`.
    ///
    /// # Errors
    /// Returns a page table construction error or any error from `test_fn`.
    pub fn run<F, T>(self, test_fn: F) -> PageTableResult<T>
    where
        F: FnOnce(SimEnvironment) -> PageTableResult<T>,
    {
        let seed = self.config.seed();
        let env = self.build()?;
        let result = test_fn(env);
        if let Err(ref e) = result {
            tracing::warn!(seed, error = %e, "simulation failed (replay with DST_SEED={seed})");
        }
        result
    }

    /// Build the simulation environment without running a test.
    ///
    /// # Errors
    /// Returns the page table construction error for an invalid table and
    /// `Configuration` if `frames_count` exceeds `MEMORY_FRAMES_COUNT_MAX`.
    pub fn build(self) -> PageTableResult<SimEnvironment> {
        if self.config.frames_count() > MEMORY_FRAMES_COUNT_MAX {
            return Err(PageTableError::configuration(format!(
                "frames_count {} exceeds max {MEMORY_FRAMES_COUNT_MAX}",
                self.config.frames_count()
            )));
        }
        let mut rng = DeterministicRng::new(self.config.seed());
        let table = PageTable::new(self.config.table().clone())?;
        let memory = SimMemory::new(self.config.frames_count());

        tracing::debug!(
            seed = self.config.seed(),
            frames_count = self.config.frames_count(),
            "simulation built"
        );

        Ok(SimEnvironment {
            rng: rng.fork(),
            config: self.config,
            clock: SimClock::new(),
            table,
            memory,
        })
    }
}

/// Create a simulation with optional seed.
///
/// TigerStyle: Factory function for common case.
#[must_use]
pub fn create_simulation(seed: Option<u64>) -> Simulation {
    let config = match seed {
        Some(s) => SimConfig::with_seed(s),
        None => SimConfig::from_env_or_random(),
    };
    Simulation::new(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReplacementPolicy;

    #[test]
    fn test_access_advances_clock() {
        let mut env = Simulation::new(SimConfig::with_seed(42)).build().unwrap();

        env.access(0, AccessMode::Read).unwrap();
        env.access(0, AccessMode::Read).unwrap();

        assert_eq!(env.now(), 2);
        assert_eq!(env.table.entry(0).unwrap().last_access(), Some(1));
        assert_eq!(env.table.entry(0).unwrap().last_load(), Some(0));
    }

    #[test]
    fn test_replay_stops_on_error() {
        let mut env = Simulation::new(SimConfig::with_seed(1).with_pages_count(2))
            .build()
            .unwrap();

        let err = env
            .replay(&[(0, AccessMode::Read), (5, AccessMode::Read), (1, AccessMode::Read)])
            .unwrap_err();

        assert!(matches!(err, PageTableError::InvalidReference { page: 5, .. }));
        assert_eq!(env.memory.stats().faults, 1);
    }

    #[test]
    fn test_same_seed_same_outcomes() {
        let run = |seed| {
            Simulation::new(SimConfig::with_seed(seed).with_frames_count(4))
                .run(|mut env| {
                    let trace = env.random_trace(200);
                    env.replay(&trace)?;
                    Ok(env.memory.log().to_vec())
                })
                .unwrap()
        };

        assert_eq!(run(12345), run(12345));
    }

    #[test]
    fn test_build_rejects_clock() {
        let err = Simulation::new(SimConfig::with_seed(1).with_policy(ReplacementPolicy::Clock))
            .build()
            .unwrap_err();
        assert!(matches!(err, PageTableError::UnsupportedPolicy { .. }));
    }

    #[test]
    fn test_replay_rejects_trace_over_steps_max() {
        let mut env = Simulation::new(SimConfig::with_seed(1).with_steps_max(3))
            .build()
            .unwrap();

        let err = env.replay(&[(0, AccessMode::Read); 4]).unwrap_err();

        assert!(matches!(err, PageTableError::Configuration { .. }));
        assert_eq!(env.memory.stats().faults, 0);
        assert_eq!(env.now(), 0);
        assert_eq!(env.replay(&[(0, AccessMode::Read); 3]).unwrap().len(), 3);
    }

    #[test]
    #[should_panic(expected = "exceeds steps_max")]
    fn test_random_trace_over_steps_max_panics() {
        let mut env = Simulation::new(SimConfig::with_seed(1).with_steps_max(10))
            .build()
            .unwrap();
        let _ = env.random_trace(11);
    }

    #[test]
    fn test_build_rejects_too_many_frames() {
        let err = Simulation::new(
            SimConfig::with_seed(1).with_frames_count(MEMORY_FRAMES_COUNT_MAX + 1),
        )
        .build()
        .unwrap_err();
        assert!(matches!(err, PageTableError::Configuration { .. }));
    }

    #[test]
    fn test_create_simulation() {
        let env = create_simulation(Some(42)).build().unwrap();
        assert_eq!(env.config.seed(), 42);
    }
}
