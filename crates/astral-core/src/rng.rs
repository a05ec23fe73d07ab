//! Injected randomness for damage variance
//!
//! Every engine entry point that rolls dice takes a [`RandomSource`] from the
//! caller. [`GameRng`] is the seeded default; any `FnMut() -> f64` closure
//! works too, which is how tests pin a roll to an exact value.

use serde::{Deserialize, Serialize};

/// A source of uniform samples in `[0, 1)`
pub trait RandomSource {
    /// Next sample in `[0, 1)`
    fn next_unit(&mut self) -> f64;
}

impl<F> RandomSource for F
where
    F: FnMut() -> f64,
{
    fn next_unit(&mut self) -> f64 {
        self()
    }
}

/// A deterministic random number generator
///
/// xorshift64, so a seed reproduces the same battle on every platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRng {
    state: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        // xorshift is stuck at zero
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Restore an RNG from a saved state
    pub fn from_state(state: u64) -> Self {
        Self::new(state)
    }

    /// Current state, for saving
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Generate the next raw u64 value
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Generate a random f64 in range [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        // top 53 bits map exactly onto the f64 mantissa
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

impl RandomSource for GameRng {
    fn next_unit(&mut self) -> f64 {
        self.next_f64()
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(12345)
    }
}

/// Scale `raw` by `1 + u * variance` and floor, with `u` drawn from `rng`
///
/// Samples outside `[0, 1]` are clamped so a misbehaving source can never
/// shrink damage below `raw`.
pub fn roll_variance<R>(raw: u64, variance: f64, rng: &mut R) -> u64
where
    R: RandomSource + ?Sized,
{
    let u = rng.next_unit();
    let u = if u.is_nan() { 0.0 } else { u.clamp(0.0, 1.0) };
    let scaled = (raw as f64 * (1.0 + u * variance.max(0.0))).floor() as u64;
    scaled.max(raw)
}
