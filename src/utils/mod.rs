// src/utils/mod.rs

pub mod pagination;
pub mod user_key;
