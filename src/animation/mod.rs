// src/animation/mod.rs

pub mod driver;
pub mod state;

// src/animation/mod.rs
