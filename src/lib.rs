// src/lib.rs - Library interface for internal module access

pub mod animation;
pub mod config;
pub mod constants;
pub mod data_analysis;
pub mod data_input;
pub mod error;
pub mod font_config;
pub mod link;
pub mod probe_names;
pub mod render;
pub mod types;

pub fn crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// src/lib.rs
