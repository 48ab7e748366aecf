// src/data_input/mod.rs

pub mod log_data;
pub mod log_parser;
pub mod relabel;
pub mod selection;
pub mod telemetry_table;
pub mod timestamping;

// src/data_input/mod.rs
