// src/data_analysis/lattice.rs

use chrono::NaiveDateTime;
use ndarray::Array3;

use crate::constants::{LATTICE_DIM, LEVELS, PROBES_PER_LEVEL};
use crate::data_input::telemetry_table::TelemetryTable;
use crate::types::{AllLevelReadings, Lattice};

/// (x, z) position of each corner of a level, in corner order.
///
/// Corner `k` of level `i` is probe `T(4i+k+1)`.
pub const CORNER_POSITIONS: [(usize, usize); PROBES_PER_LEVEL] = [(1, 0), (0, 0), (0, 1), (1, 1)];

/// One row placed into the probe lattice, plus the raw values the overlay shows.
#[derive(Debug, Clone, PartialEq)]
pub struct LatticeSample {
    pub lattice: Lattice,
    pub levels: AllLevelReadings,
    pub timestamp: NaiveDateTime,
    pub row: usize,
}

/// Places table rows into the (2, 5, 2) lattice.
///
/// With `vertical_flip` level 0 (T1..T4) lands at `y = LEVELS - 1`, which is the
/// top of the screen because screen-space y grows upward in the volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatticeSampler {
    vertical_flip: bool,
}

impl LatticeSampler {
    pub fn new(vertical_flip: bool) -> Self {
        Self { vertical_flip }
    }

    pub fn vertical_flip(&self) -> bool {
        self.vertical_flip
    }

    /// Lattice y coordinate of a level.
    pub fn level_to_y(&self, level: usize) -> usize {
        if self.vertical_flip {
            LEVELS - 1 - level
        } else {
            level
        }
    }

    /// Levels ordered from the top of the screen to the bottom.
    pub fn screen_levels(&self) -> [usize; LEVELS] {
        // level_to_y is its own inverse; the top row is y = LEVELS - 1.
        std::array::from_fn(|rank| self.level_to_y(LEVELS - 1 - rank))
    }

    /// Samples `row`. Returns `None` past the end of the table.
    pub fn sample(&self, table: &TelemetryTable, row: usize) -> Option<LatticeSample> {
        let timestamp = table.row(row)?.timestamp;
        let mut lattice: Lattice = Array3::zeros(LATTICE_DIM);
        let mut levels: AllLevelReadings = [[0.0; PROBES_PER_LEVEL]; LEVELS];

        for (level, readings) in levels.iter_mut().enumerate() {
            *readings = table.level_readings(row, level)?;
            let y = self.level_to_y(level);
            for (&(x, z), &value) in CORNER_POSITIONS.iter().zip(readings.iter()) {
                lattice[[x, y, z]] = value;
            }
        }

        Some(LatticeSample {
            lattice,
            levels,
            timestamp,
            row,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_input::log_data::Reading;
    use chrono::NaiveDate;

    fn table() -> TelemetryTable {
        let timestamp = NaiveDate::from_ymd_opt(2014, 10, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        TelemetryTable::new(vec![Reading {
            timestamp,
            voltage: 4.1,
            charge: 90.0,
            is_charging: false,
            enclosure_temp: 25.0,
            // T(n) reads n
            probes: std::array::from_fn(|i| (i + 1) as f64),
        }])
    }

    #[test]
    fn corner_mapping_with_flip() {
        let sample = LatticeSampler::new(true).sample(&table(), 0).unwrap();
        assert_eq!(sample.lattice.dim(), (2, 5, 2));
        for level in 0..LEVELS {
            let y = LEVELS - 1 - level;
            let first = (4 * level + 1) as f64;
            assert_eq!(sample.lattice[[1, y, 0]], first);
            assert_eq!(sample.lattice[[0, y, 0]], first + 1.0);
            assert_eq!(sample.lattice[[0, y, 1]], first + 2.0);
            assert_eq!(sample.lattice[[1, y, 1]], first + 3.0);
        }
        assert_eq!(sample.levels[0], [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn corner_mapping_without_flip() {
        let sample = LatticeSampler::new(false).sample(&table(), 0).unwrap();
        assert_eq!(sample.lattice[[1, 0, 0]], 1.0);
        assert_eq!(sample.lattice[[1, 4, 1]], 20.0);
    }

    #[test]
    fn every_probe_is_placed_once() {
        let sample = LatticeSampler::new(true).sample(&table(), 0).unwrap();
        assert_eq!(sample.lattice.sum(), (1..=20).sum::<usize>() as f64);
    }

    #[test]
    fn past_the_end_is_end_of_data() {
        assert!(LatticeSampler::new(true).sample(&table(), 1).is_none());
    }

    #[test]
    fn screen_order_matches_lattice() {
        assert_eq!(LatticeSampler::new(true).screen_levels(), [0, 1, 2, 3, 4]);
        assert_eq!(LatticeSampler::new(false).screen_levels(), [4, 3, 2, 1, 0]);
    }
}

// src/data_analysis/lattice.rs
