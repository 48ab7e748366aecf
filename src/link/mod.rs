// src/link/mod.rs

//! Serial link to the remote logger: prompt framing, command session and
//! incremental pulls into the local log directory.

pub mod history;
pub mod prompt;
pub mod session;

// src/link/mod.rs
