//! Deterministic random sources.
//!
//! # Determinism strategy
//!
//! The driver holds one root seed.  Every party that needs randomness owns
//! its own generator derived from that seed:
//!
//!   seed = root_seed XOR (role_index * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive indices uniformly across the seed space.  No
//! generator is ever shared between workers, so the draw order inside one
//! generator is fixed by its owner alone and runs are reproducible regardless
//! of thread interleaving.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::RoleId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Offset used for the observer's generator, which has no `RoleId`.
const OBSERVER_STREAM: u64 = u64::MAX;

// ── RandomSource ──────────────────────────────────────────────────────────────

/// A reentrant uniform generator: every caller owns its own state.
///
/// `next_in(low, high)` returns a value in `[low, high)`.  An empty or
/// inverted range returns `low`.
pub trait RandomSource: Send {
    fn next_in(&mut self, low: f64, high: f64) -> f64;
}

// ── SeededRng ─────────────────────────────────────────────────────────────────

/// `SmallRng`-backed [`RandomSource`] seeded from a `u64`.
///
/// The same seed always yields the same sequence on the same build.
pub struct SeededRng(SmallRng);

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        SeededRng(SmallRng::seed_from_u64(seed))
    }

    /// Generator for one role, derived from the run's root seed.
    pub fn for_role(root_seed: u64, role: RoleId) -> Self {
        Self::new(root_seed ^ (role.0 as u64 + 1).wrapping_mul(MIXING_CONSTANT))
    }

    /// Generator for the observer worker (environment noise).
    pub fn for_observer(root_seed: u64) -> Self {
        Self::new(root_seed ^ OBSERVER_STREAM.wrapping_mul(MIXING_CONSTANT))
    }

    /// Derive a child generator with a different seed offset.
    pub fn child(&mut self, offset: u64) -> SeededRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SeededRng(SmallRng::seed_from_u64(child_seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}

impl RandomSource for SeededRng {
    #[inline]
    fn next_in(&mut self, low: f64, high: f64) -> f64 {
        if !(low < high) {
            return low;
        }
        self.0.gen_range(low..high)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    #[inline]
    fn next_in(&mut self, low: f64, high: f64) -> f64 {
        (**self).next_in(low, high)
    }
}
