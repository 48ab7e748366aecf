// src/probe_names.rs

//! Centralized probe naming utilities
//!
//! Provides consistent probe column names across the parser, the relabeling
//! step and the lattice sampler.

use crate::constants::{LEVELS, PROBES_PER_LEVEL, PROBE_COUNT};

/// Get the probe column name for a zero-based probe index
///
/// # Arguments
/// * `index` - Probe index (0 = T1, 19 = T20)
///
/// # Panics
/// Panics if index is not below `PROBE_COUNT`
pub fn probe_name(index: usize) -> String {
    assert!(
        index < PROBE_COUNT,
        "Invalid probe index: {}. Expected 0..{}",
        index,
        PROBE_COUNT
    );
    format!("T{}", index + 1)
}

/// All probe column names in file order (T1..T20).
pub fn all_probe_names() -> [String; PROBE_COUNT] {
    std::array::from_fn(probe_name)
}

/// Probe names owned by a level: level `i` owns T(4i+1)..T(4i+4), in corner order.
///
/// # Panics
/// Panics if level is not below `LEVELS`
pub fn level_probe_names(level: usize) -> [String; PROBES_PER_LEVEL] {
    assert!(
        level < LEVELS,
        "Invalid level: {}. Expected 0..{}",
        level,
        LEVELS
    );
    std::array::from_fn(|corner| probe_name(level * PROBES_PER_LEVEL + corner))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_name() {
        assert_eq!(probe_name(0), "T1");
        assert_eq!(probe_name(12), "T13");
        assert_eq!(probe_name(19), "T20");
    }

    #[test]
    #[should_panic(expected = "Invalid probe index")]
    fn test_probe_name_panic() {
        probe_name(20);
    }

    #[test]
    fn test_level_probe_names() {
        assert_eq!(level_probe_names(0), ["T1", "T2", "T3", "T4"]);
        assert_eq!(level_probe_names(3), ["T13", "T14", "T15", "T16"]);
        assert_eq!(level_probe_names(4), ["T17", "T18", "T19", "T20"]);
    }

    #[test]
    fn test_all_probe_names_cover_levels() {
        let all = all_probe_names();
        for level in 0..LEVELS {
            for (corner, name) in level_probe_names(level).iter().enumerate() {
                assert_eq!(&all[level * PROBES_PER_LEVEL + corner], name);
            }
        }
    }
}

// src/probe_names.rs
