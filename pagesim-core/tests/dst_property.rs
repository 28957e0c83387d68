//! DST Property Tests for the Page Table
//!
//! TigerStyle: Random traces, many seeds, invariants checked after every
//! access. Replay a failure with the seed printed in the panic message.

use pagesim_core::dst::{
    run_property_tests, test_seeds, PagingModel, PropertyTest, SimConfig, Simulation,
    TimeAdvanceConfig,
};
use pagesim_core::ReplacementPolicy;

#[test]
fn test_lru_properties_many_seeds() {
    run_property_tests(&test_seeds(8), 1_000, || {
        PagingModel::new(ReplacementPolicy::Lru, 32, 6).unwrap()
    });
}

#[test]
fn test_fifo_properties_many_seeds() {
    run_property_tests(&test_seeds(8), 1_000, || {
        PagingModel::new(ReplacementPolicy::Fifo, 32, 6).unwrap()
    });
}

#[test]
fn test_single_frame() {
    for policy in [ReplacementPolicy::Lru, ReplacementPolicy::Fifo] {
        let model = PagingModel::new(policy, 8, 1).unwrap();
        PropertyTest::new(7)
            .with_max_operations(500)
            .run_and_assert(model);
    }
}

#[test]
fn test_bursty_clock() {
    // Ticks jump unevenly; ordering must hold regardless of the gaps.
    let model = PagingModel::new(ReplacementPolicy::Lru, 16, 4).unwrap();
    PropertyTest::new(2024)
        .with_max_operations(1_000)
        .with_time_advance(TimeAdvanceConfig::random(1, 1_000, 0.5))
        .run_and_assert(model);
}

#[test]
fn test_env_seed_reproducible() {
    // Uses DST_SEED when set, so CI failures replay locally.
    let config = SimConfig::from_env_or_random()
        .with_pages_count(24)
        .with_frames_count(5);

    let replay = |config: SimConfig| {
        Simulation::new(config)
            .run(|mut env| {
                let trace = env.random_trace(300);
                env.replay(&trace)?;
                env.table.check_invariants()?;
                Ok((env.memory.stats(), env.table.dump_status()))
            })
            .unwrap()
    };

    assert_eq!(replay(config.clone()), replay(config));
}

#[test]
fn test_hot_set_mostly_hits() {
    // A quarter of 16 pages is hot; with 8 frames the hot set always fits.
    let stats = Simulation::new(
        SimConfig::with_seed(3)
            .with_policy(ReplacementPolicy::Lru)
            .with_pages_count(16)
            .with_frames_count(8),
    )
    .run(|mut env| {
        let trace = env.random_trace(2_000);
        env.replay(&trace)?;
        Ok(env.memory.stats())
    })
    .unwrap();

    assert_eq!(stats.hits + stats.faults, 2_000);
    assert!(stats.hit_ratio() > 0.5, "hit ratio {}", stats.hit_ratio());
}
