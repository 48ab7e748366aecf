// src/data_analysis/mod.rs

pub mod extents;
pub mod lattice;
pub mod spline_zoom;
pub mod volume;

// src/data_analysis/mod.rs
