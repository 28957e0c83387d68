//! Property-Based Testing for DST
//!
//! TigerStyle: Random operation sequences with invariant checking.
//!
//! Property-based testing generates random operations and verifies that
//! invariants hold after each operation. Combined with DST, this gives:
//! - Deterministic reproduction via seed
//! - Time control via SimClock
//!
//! # Example
//!
//! ```rust
//! use pagesim_core::dst::{PagingModel, PropertyTest};
//! use pagesim_core::ReplacementPolicy;
//!
//! let model = PagingModel::new(ReplacementPolicy::Lru, 16, 4).unwrap();
//! let result = PropertyTest::new(42).with_max_operations(500).run(model);
//! assert!(result.is_success());
//! ```

use std::fmt::Debug;

use super::clock::SimClock;
use super::rng::DeterministicRng;
use crate::constants::{DST_PROPERTY_OPERATIONS_COUNT_DEFAULT, DST_SIMULATION_STEPS_MAX};
use crate::page_table::Tick;

/// Trait for systems that can be property-tested.
///
/// TigerStyle: Explicit operation generation and invariant checking.
pub trait PropertyTestable {
    /// The type of operations that can be performed.
    type Operation: Debug + Clone;

    /// Generate a random operation based on current state.
    fn generate_operation(&self, rng: &mut DeterministicRng) -> Self::Operation;

    /// Apply an operation at the clock's current tick.
    ///
    /// Returns Err(message) if the system itself reported a failure.
    fn apply_operation(&mut self, op: &Self::Operation, clock: &SimClock) -> Result<(), String>;

    /// Check that all invariants hold.
    ///
    /// Returns Ok(()) if all invariants pass, Err(message) otherwise.
    fn check_invariants(&self) -> Result<(), String>;

    /// Optional: Describe the current state for debugging.
    fn describe_state(&self) -> String {
        String::from("(state description not implemented)")
    }
}

/// Result of a property test run.
#[derive(Debug)]
pub struct PropertyTestResult {
    /// Number of operations successfully executed
    pub operations_executed: u64,
    /// Seed used for reproduction
    pub seed: u64,
    /// Failure details, if any
    pub failure: Option<PropertyTestFailure>,
}

impl PropertyTestResult {
    /// Check if the test passed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Check if the test failed.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }

    /// Unwrap the result, panicking with details if failed.
    ///
    /// # Panics
    /// Panics if the test failed, with reproduction info.
    pub fn unwrap(self) {
        if let Some(failure) = self.failure {
            panic!(
                "Property test failed!\n\
                 Seed: {} (use this to reproduce)\n\
                 Operation #{}: {}\n\
                 Invariant violation: {}\n\
                 State: {}",
                self.seed,
                failure.operation_index,
                failure.operation,
                failure.message,
                failure.state_description
            );
        }
    }
}

/// Details of a property test failure.
#[derive(Debug)]
pub struct PropertyTestFailure {
    /// Index of the failing operation (0-based)
    pub operation_index: u64,
    /// The operation that caused the failure
    pub operation: String,
    /// The failure or invariant violation message
    pub message: String,
    /// Description of the state at failure
    pub state_description: String,
}

/// Clock advancement between operations.
#[derive(Debug, Clone)]
pub struct TimeAdvanceConfig {
    /// Minimum ticks per operation
    pub min_ticks: Tick,
    /// Maximum ticks per operation
    pub max_ticks: Tick,
    /// Probability of advancing at all (0.0 to 1.0)
    pub probability: f64,
}

impl Default for TimeAdvanceConfig {
    fn default() -> Self {
        Self::fixed(1)
    }
}

impl TimeAdvanceConfig {
    /// Never advance; every operation shares one tick.
    #[must_use]
    pub fn none() -> Self {
        Self {
            min_ticks: 0,
            max_ticks: 0,
            probability: 0.0,
        }
    }

    /// Always advance by a fixed amount.
    #[must_use]
    pub fn fixed(ticks: Tick) -> Self {
        Self {
            min_ticks: ticks,
            max_ticks: ticks,
            probability: 1.0,
        }
    }

    /// Advance within a range with the given probability.
    ///
    /// # Panics
    /// Panics if the range is inverted or probability is outside [0, 1].
    #[must_use]
    pub fn random(min_ticks: Tick, max_ticks: Tick, probability: f64) -> Self {
        assert!((0.0..=1.0).contains(&probability), "probability must be in [0, 1]");
        assert!(min_ticks <= max_ticks, "min_ticks must be <= max_ticks");
        Self {
            min_ticks,
            max_ticks,
            probability,
        }
    }
}

/// Property-based test runner.
///
/// TigerStyle:
/// - Deterministic via seed
/// - Explicit operation count limits
/// - Invariant checking after each operation
/// - Time advancement control
#[derive(Debug)]
pub struct PropertyTest {
    seed: u64,
    max_operations: u64,
    time_config: TimeAdvanceConfig,
}

impl PropertyTest {
    /// Create a new property test with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            max_operations: DST_PROPERTY_OPERATIONS_COUNT_DEFAULT,
            time_config: TimeAdvanceConfig::default(),
        }
    }

    /// Set the maximum number of operations to run.
    ///
    /// # Panics
    /// Panics if max exceeds DST_SIMULATION_STEPS_MAX.
    #[must_use]
    pub fn with_max_operations(mut self, max: u64) -> Self {
        assert!(
            max <= DST_SIMULATION_STEPS_MAX,
            "max_operations {} exceeds DST_SIMULATION_STEPS_MAX {}",
            max,
            DST_SIMULATION_STEPS_MAX
        );
        self.max_operations = max;
        self
    }

    /// Configure clock advancement between operations.
    #[must_use]
    pub fn with_time_advance(mut self, config: TimeAdvanceConfig) -> Self {
        self.time_config = config;
        self
    }

    /// Run the property test.
    ///
    /// Generates random operations, applies them, and checks invariants
    /// after each operation.
    #[must_use]
    pub fn run<T: PropertyTestable>(self, mut state: T) -> PropertyTestResult {
        let mut rng = DeterministicRng::new(self.seed);
        let clock = SimClock::new();

        if let Err(msg) = state.check_invariants() {
            return self.failed(
                0,
                0,
                "(initial state)".to_string(),
                format!("Initial state violates invariants: {}", msg),
                &state,
            );
        }

        for i in 0..self.max_operations {
            let op = state.generate_operation(&mut rng);
            let op_debug = format!("{:?}", op);

            let applied = state
                .apply_operation(&op, &clock)
                .and_then(|()| state.check_invariants());
            if let Err(msg) = applied {
                return self.failed(i + 1, i, op_debug, msg, &state);
            }

            if self.time_config.probability > 0.0 && rng.next_bool(self.time_config.probability) {
                let advance = if self.time_config.min_ticks == self.time_config.max_ticks {
                    self.time_config.min_ticks
                } else {
                    rng.next_usize(
                        self.time_config.min_ticks as usize,
                        self.time_config.max_ticks as usize,
                    ) as Tick
                };
                clock.advance(advance);
            }
        }

        PropertyTestResult {
            operations_executed: self.max_operations,
            seed: self.seed,
            failure: None,
        }
    }

    /// Run the property test, panicking on failure.
    ///
    /// # Panics
    /// Panics if any invariant is violated.
    pub fn run_and_assert<T: PropertyTestable>(self, state: T) {
        self.run(state).unwrap();
    }

    fn failed<T: PropertyTestable>(
        &self,
        operations_executed: u64,
        operation_index: u64,
        operation: String,
        message: String,
        state: &T,
    ) -> PropertyTestResult {
        PropertyTestResult {
            operations_executed,
            seed: self.seed,
            failure: Some(PropertyTestFailure {
                operation_index,
                operation,
                message,
                state_description: state.describe_state(),
            }),
        }
    }
}

/// Run multiple property tests with different seeds.
///
/// # Panics
/// Panics if any test fails.
pub fn run_property_tests<T, F>(seeds: &[u64], max_operations: u64, state_factory: F)
where
    T: PropertyTestable,
    F: Fn() -> T,
{
    for &seed in seeds {
        PropertyTest::new(seed)
            .with_max_operations(max_operations)
            .run_and_assert(state_factory());
    }
}

/// Generate a set of test seeds including edge cases.
///
/// Returns seeds: [0, 1, 42, random, random, ...]
#[must_use]
pub fn test_seeds(count: usize) -> Vec<u64> {
    assert!(count >= 3, "need at least 3 seeds for edge cases");

    let mut seeds = vec![0, 1, 42];

    let time_seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(12345);
    let mut rng = DeterministicRng::new(time_seed);

    while seeds.len() < count {
        let high = rng.next_usize(0, u32::MAX as usize) as u64;
        let low = rng.next_usize(0, u32::MAX as usize) as u64;
        seeds.push((high << 32) | low);
    }

    seeds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReplacementPolicy;
    use crate::dst::PagingModel;

    /// Evicts the most recently loaded page where FIFO wants the oldest.
    #[derive(Debug)]
    struct NewestEvictor {
        resident: Vec<usize>,
        frames: usize,
        last_evicted: Option<usize>,
        oldest: Option<usize>,
    }

    impl PropertyTestable for NewestEvictor {
        type Operation = usize;

        fn generate_operation(&self, rng: &mut DeterministicRng) -> usize {
            rng.next_usize(0, 15)
        }

        fn apply_operation(&mut self, page: &usize, _clock: &SimClock) -> Result<(), String> {
            if self.resident.contains(page) {
                return Ok(());
            }
            if self.resident.len() == self.frames {
                self.oldest = self.resident.first().copied();
                let victim = self.resident.len() - 1;
                self.last_evicted = Some(self.resident.remove(victim));
            }
            self.resident.push(*page);
            Ok(())
        }

        fn check_invariants(&self) -> Result<(), String> {
            match (self.last_evicted, self.oldest) {
                (Some(evicted), Some(oldest)) if evicted != oldest => Err(format!(
                    "evicted {} but {} was loaded first",
                    evicted, oldest
                )),
                _ => Ok(()),
            }
        }
    }

    #[test]
    fn test_paging_model_lru_passes() {
        let model = PagingModel::new(ReplacementPolicy::Lru, 16, 4).unwrap();
        let result = PropertyTest::new(42).with_max_operations(1000).run(model);

        assert!(result.is_success());
        assert_eq!(result.operations_executed, 1000);
        assert_eq!(result.seed, 42);
    }

    #[test]
    fn test_property_test_catches_wrong_victim() {
        let evictor = NewestEvictor {
            resident: Vec::new(),
            frames: 3,
            last_evicted: None,
            oldest: None,
        };
        let result = PropertyTest::new(7).with_max_operations(500).run(evictor);

        assert!(result.is_failure());
        assert!(result.failure.unwrap().message.contains("loaded first"));
    }

    #[test]
    fn test_property_test_determinism() {
        let run = || {
            PropertyTest::new(12345)
                .with_max_operations(200)
                .run(PagingModel::new(ReplacementPolicy::Fifo, 8, 3).unwrap())
        };
        let (run1, run2) = (run(), run());

        assert_eq!(run1.operations_executed, run2.operations_executed);
        assert_eq!(run1.is_success(), run2.is_success());
    }

    #[test]
    fn test_same_tick_for_every_access() {
        let model = PagingModel::new(ReplacementPolicy::Lru, 8, 2).unwrap();
        PropertyTest::new(3)
            .with_max_operations(300)
            .with_time_advance(TimeAdvanceConfig::none())
            .run_and_assert(model);
    }

    #[test]
    fn test_test_seeds() {
        let seeds = test_seeds(10);
        assert_eq!(seeds.len(), 10);
        assert_eq!(&seeds[..3], &[0, 1, 42]);
    }

    #[test]
    fn test_run_property_tests_helper() {
        run_property_tests(&[0, 1, 42], 200, || {
            PagingModel::new(ReplacementPolicy::Fifo, 12, 5).unwrap()
        });
    }
}
