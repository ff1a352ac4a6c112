//! Counter-based pseudo-random generator and the seeded shuffle built on it.
//!
//! The mixing steps are fixed so a given seed produces the same sequence on
//! every platform and in every implementation of the format.

/// Additive constant applied to the state before every draw.
const INCREMENT: u32 = 0x6D2B_79F5;

/// Normalizes a 32-bit draw into `[0, 1)`.
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Wraps an arbitrary integer seed into the generator's 32-bit state.
///
/// Seeds congruent modulo 2^32 are equivalent: `-1` and `4294967295` yield
/// the same pattern.
pub fn coerce_seed(seed: i64) -> u32 {
    seed as u32
}

/// Mulberry32 generator: a running 32-bit counter passed through a bit mixer.
#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Advances the counter and returns the mixed 32-bit output.
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Returns a uniform float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / TWO_POW_32
    }
}

/// Shuffles `0..n` with Fisher-Yates driven by [`Mulberry32`].
///
/// Walks from the end of the sequence down, swapping slot `i - 1` with a
/// drawn slot in `[0, i)`.
pub fn seeded_permutation(n: usize, seed: u32) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = Mulberry32::new(seed);

    for i in (1..=n).rev() {
        let j = (rng.next_f64() * i as f64).floor() as usize;
        indices.swap(i - 1, j);
    }

    indices
}
