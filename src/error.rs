// src/error.rs

//! Error types for the telemetry-to-volume pipeline.
//!
//! End-of-data is not an error: samplers and drivers report it through
//! `Option`/`bool` and the batch loop simply stops.

use thiserror::Error;

/// Errors surfaced by the pipeline.
#[derive(Debug, Error)]
pub enum VizError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Configuration values that deserialized fine but cannot drive the pipeline.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid extent: min {min} must be finite and <= max {max}")]
    InvalidExtent { min: f64, max: f64 },

    #[error("Telemetry table is empty")]
    EmptyTable,

    #[error("Invalid frame range {start}..={end} for {rows} rows")]
    InvalidFrameRange { start: usize, end: usize, rows: usize },

    /// Renderer or PNG capture failure. Fatal for the batch run.
    #[error("Render error: {0}")]
    Render(String),

    #[error("Device link error: {0}")]
    Link(String),
}

impl VizError {
    /// Creates a render error from any displayable backend error.
    pub fn render(msg: impl std::fmt::Display) -> Self {
        Self::Render(msg.to_string())
    }

    /// Creates an invalid-configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Creates a device link error.
    pub fn link(msg: impl Into<String>) -> Self {
        Self::Link(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, VizError>;

// src/error.rs
