// src/data_input/log_data.rs

use chrono::NaiveDateTime;

use crate::types::ProbeValues;

/// One parsed log line.
/// Probe values are in degrees Celsius, indexed by probe column slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub timestamp: NaiveDateTime, // Combined date and time columns.
    pub voltage: f64,             // Battery voltage.
    pub charge: f64,              // Battery charge state.
    pub is_charging: bool,        // Charging flag.
    pub enclosure_temp: f64,      // Logger enclosure temperature.
    pub probes: ProbeValues,      // T1..T20 in file column order.
}

// src/data_input/log_data.rs
