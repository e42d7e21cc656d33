// src/engine/mod.rs

//! Deterministic exam core: seeded randomness, per-user paper assembly,
//! scoring, and the pool write guard. Everything here is a pure function
//! of its arguments, with no I/O and no shared state.

pub mod assemble;
pub mod rng;
pub mod score;
pub mod shuffle;
pub mod validate;

#[cfg(test)]
pub(crate) mod testing;

pub use assemble::assemble_for_user;
pub use score::{ScoreError, score_submission};
pub use shuffle::seeded_shuffle;
pub use validate::{PoolViolation, validate_pool};
