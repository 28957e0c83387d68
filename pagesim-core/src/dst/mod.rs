//! DST - Deterministic Simulation Testing
//!
//! TigerBeetle/FoundationDB-style deterministic simulation for page tables.
//!
//! # Philosophy
//!
//! > "If you're not testing with fault injection, you're not testing."
//!
//! Page faults are the faults here: a small frame budget and a seeded,
//! skewed trace push the page table through every eviction path.
//!
//! # Usage
//!
//! ```rust
//! use pagesim_core::dst::{Simulation, SimConfig};
//! use pagesim_core::ReplacementPolicy;
//!
//! Simulation::new(SimConfig::with_seed(42).with_policy(ReplacementPolicy::Lru))
//!     .run(|mut env| {
//!         let trace = env.random_trace(1_000);
//!         env.replay(&trace)?;
//!         env.table.check_invariants()
//!     })
//!     .unwrap();
//! ```
//!
//! Run with explicit seed for reproducibility:
//! ```bash
//! DST_SEED=12345 cargo test
//! ```

mod clock;
mod config;
mod memory;
mod property;
mod rng;
mod simulation;
mod workload;

pub use clock::SimClock;
pub use config::SimConfig;
pub use memory::{SimMemory, SimStats, StoreOp};
pub use property::{
    run_property_tests, test_seeds, PropertyTest, PropertyTestFailure, PropertyTestResult,
    PropertyTestable, TimeAdvanceConfig,
};
pub use rng::DeterministicRng;
pub use simulation::{create_simulation, SimEnvironment, Simulation, TraceRecord};
pub use workload::{PagingModel, PagingOp};
