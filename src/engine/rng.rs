// src/engine/rng.rs

//! Reproducible randomness derived from a string key.
//!
//! The key is folded into a 32-bit state with FNV-1a over its UTF-16 code units,
//! then fed to a Mulberry32 generator. Both steps use wrapping 32-bit arithmetic,
//! so a given key yields the same sequence on every platform and every run.
//! Not suitable for anything security related.

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;
const MULBERRY_INCREMENT: u32 = 0x6d2b_79f5;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Folds a seed string into the generator's initial state.
pub fn hash_seed(seed: &str) -> u32 {
    seed.encode_utf16().fold(FNV_OFFSET_BASIS, |hash, unit| {
        (hash ^ u32::from(unit)).wrapping_mul(FNV_PRIME)
    })
}

/// Advances the accumulator once and returns `(next_state, output)`.
///
/// Pure: the whole generator state is the `u32` passed in.
pub fn mulberry_step(state: u32) -> (u32, u32) {
    let next = state.wrapping_add(MULBERRY_INCREMENT);

    let mut t = next;
    t = (t ^ (t >> 15)).wrapping_mul(t | 1);
    t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));

    (next, t ^ (t >> 14))
}

/// A per-call generator. Each request builds its own from its own seed;
/// nothing is shared between callers.
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn from_seed(seed: &str) -> Self {
        Self::from_state(hash_seed(seed))
    }

    pub fn from_state(state: u32) -> Self {
        Self { state }
    }

    /// Next raw 32-bit output.
    pub fn next_u32(&mut self) -> u32 {
        let (state, out) = mulberry_step(self.state);
        self.state = state;
        out
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / TWO_POW_32
    }
}

impl Iterator for SeededRng {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.next_f64())
    }
}
