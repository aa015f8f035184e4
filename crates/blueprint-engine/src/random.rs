//! Seeded pseudo-random sequence
//!
//! A 32-bit linear congruential generator (Numerical Recipes constants). It
//! is not statistically strong, but it is trivially reproducible: the same
//! seed yields the same sequence on every platform, which is what makes a
//! blueprint repeatable.

const MULTIPLIER: u32 = 1_664_525;
const INCREMENT: u32 = 1_013_904_223;
const MODULUS: f64 = 4_294_967_296.0;

/// Deterministic LCG over `u32` state.
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    /// Seed the generator.
    ///
    /// Any `i64` is accepted: the absolute value is reduced modulo 2^32 and
    /// a resulting zero becomes 1.
    pub fn new(seed: i64) -> Self {
        let reduced = (seed.unsigned_abs() % (1u64 << 32)) as u32;
        Self {
            state: if reduced == 0 { 1 } else { reduced },
        }
    }

    /// Advance and return the raw state.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(MULTIPLIER)
            .wrapping_add(INCREMENT);
        self.state
    }

    /// Next value in `[0, 1)`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / MODULUS
    }

    /// Next index in `0..n`. Returns 0 when `n` is 0.
    #[inline]
    pub fn next_index(&mut self, n: usize) -> usize {
        let idx = (self.next_f64() * n as f64).floor() as usize;
        // floating point cannot reach n, but keep the bound explicit
        idx.min(n.saturating_sub(1))
    }
}
