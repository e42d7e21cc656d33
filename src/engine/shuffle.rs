// src/engine/shuffle.rs

use super::rng::SeededRng;

/// Returns a permutation of `items` fully determined by `seed`.
///
/// Fisher-Yates from the last index down to 1. The input slice is left untouched.
/// Question order and option order both go through this function.
pub fn seeded_shuffle<T: Clone>(items: &[T], seed: &str) -> Vec<T> {
    let mut rng = SeededRng::from_seed(seed);
    let mut out = items.to_vec();

    for i in (1..out.len()).rev() {
        let j = (rng.next_f64() * (i + 1) as f64).floor() as usize;
        out.swap(i, j);
    }

    out
}
