//! DeterministicRng - Seeded Random Number Generator
//!
//! TigerStyle: ChaCha20-based RNG so that a seed reproduces a whole trace.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::page_table::{AccessMode, PageNumber};

/// A deterministic random number generator.
///
/// TigerStyle:
/// - Same seed always produces same sequence
/// - Fork creates independent streams
/// - All randomness flows through this
#[derive(Debug, Clone)]
pub struct DeterministicRng {
    rng: ChaCha20Rng,
    seed: u64,
    /// Counter for generating fork seeds
    fork_counter: u64,
}

impl DeterministicRng {
    /// Create a new RNG with the given seed.
    ///
    /// # Example
    /// ```
    /// use pagesim_core::dst::DeterministicRng;
    /// let mut rng = DeterministicRng::new(42);
    /// let page = rng.next_usize(0, 7);
    /// assert!(page <= 7);
    /// ```
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Get the original seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a random float in [0, 1).
    pub fn next_float(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Generate a random usize in [min, max] (inclusive).
    ///
    /// # Panics
    /// Panics if min > max.
    pub fn next_usize(&mut self, min: usize, max: usize) -> usize {
        // Precondition
        assert!(min <= max, "min ({}) must be <= max ({})", min, max);
        self.rng.gen_range(min..=max)
    }

    /// Generate a random boolean with the given probability of true.
    ///
    /// # Panics
    /// Panics if probability is not in [0, 1].
    pub fn next_bool(&mut self, probability: f64) -> bool {
        // Precondition
        assert!(
            (0.0..=1.0).contains(&probability),
            "probability must be in [0, 1], got {}",
            probability
        );
        self.next_float() < probability
    }

    /// Pick a page in `0..pages_count` with locality of reference.
    ///
    /// With probability `hot_probability` the page comes from the first
    /// `hot_pages` pages, otherwise from the whole range.
    ///
    /// # Panics
    /// Panics if `pages_count` is zero or `hot_pages` exceeds it.
    pub fn next_page(
        &mut self,
        pages_count: usize,
        hot_pages: usize,
        hot_probability: f64,
    ) -> PageNumber {
        // Preconditions
        assert!(pages_count > 0, "pages_count must be positive");
        assert!(
            hot_pages <= pages_count,
            "hot_pages ({}) must be <= pages_count ({})",
            hot_pages,
            pages_count
        );

        if hot_pages > 0 && self.next_bool(hot_probability) {
            self.next_usize(0, hot_pages - 1)
        } else {
            self.next_usize(0, pages_count - 1)
        }
    }

    /// Pick a read or a write.
    pub fn next_access_mode(&mut self, write_probability: f64) -> AccessMode {
        if self.next_bool(write_probability) {
            AccessMode::Write
        } else {
            AccessMode::Read
        }
    }

    /// Create an independent fork of this RNG.
    pub fn fork(&mut self) -> Self {
        // Golden ratio increment spreads sibling fork seeds apart
        let fork_seed = self.seed.wrapping_add(
            self.fork_counter
                .wrapping_add(1)
                .wrapping_mul(0x9E37_79B9_7F4A_7C15),
        );
        self.fork_counter += 1;
        Self::new(fork_seed)
    }
}
