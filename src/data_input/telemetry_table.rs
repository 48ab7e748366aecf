// src/data_input/telemetry_table.rs

use chrono::{NaiveDate, NaiveTime};
use ndarray::Array2;
use std::collections::BTreeMap;
use tracing::debug;

use crate::constants::{PROBES_PER_LEVEL, PROBE_COUNT, SENTINEL_REPLACEMENT};
use crate::data_input::log_data::Reading;
use crate::data_input::relabel::ProbeRelabel;
use crate::probe_names::{all_probe_names, level_probe_names};
use crate::types::{LevelReadings, ProbeColumns};

/// Ordered, timestamp-indexed sequence of readings with named probe columns.
///
/// Read-only once the cleaning passes have run; the animation only borrows it.
#[derive(Debug, Clone)]
pub struct TelemetryTable {
    columns: ProbeColumns,
    rows: Vec<Reading>,
}

impl TelemetryTable {
    /// Creates a table whose probe columns carry their file names (T1..T20).
    pub fn new(rows: Vec<Reading>) -> Self {
        Self::with_columns(all_probe_names(), rows)
    }

    pub fn with_columns(columns: ProbeColumns, rows: Vec<Reading>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Reading] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Reading> {
        self.rows.get(index)
    }

    pub fn columns(&self) -> &ProbeColumns {
        &self.columns
    }

    /// Column slot currently carrying `name`.
    pub fn probe_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn probe(&self, row: usize, name: &str) -> Option<f64> {
        let slot = self.probe_index(name)?;
        self.row(row).map(|reading| reading.probes[slot])
    }

    /// Values of the four probes owned by `level`, in corner order.
    /// `None` past the end of the table.
    pub fn level_readings(&self, row: usize, level: usize) -> Option<LevelReadings> {
        let reading = self.row(row)?;
        let names = level_probe_names(level);
        let mut values = [0.0; PROBES_PER_LEVEL];
        for (value, name) in values.iter_mut().zip(names.iter()) {
            *value = reading.probes[self.probe_index(name)?];
        }
        Some(values)
    }

    /// Replaces sentinel fault codes in probe and enclosure columns with zero.
    /// Returns the number of replaced cells; a second pass replaces nothing.
    pub fn substitute_bad_values(&mut self, codes: &[f64]) -> usize {
        let is_bad = |v: f64| codes.iter().any(|&code| v == code);
        let mut replaced = 0;
        for reading in &mut self.rows {
            for value in reading
                .probes
                .iter_mut()
                .chain(std::iter::once(&mut reading.enclosure_temp))
            {
                if is_bad(*value) {
                    *value = SENTINEL_REPLACEMENT;
                    replaced += 1;
                }
            }
        }
        debug!("Replaced {} sentinel values", replaced);
        replaced
    }

    pub fn relabel(&mut self, relabel: &ProbeRelabel) {
        relabel.apply(&mut self.columns);
        debug!("Probe columns after relabel: {:?}", self.columns);
    }

    /// Probe values as a (rows x 20) matrix, columns in file order.
    pub fn probe_matrix(&self) -> Array2<f64> {
        let mut matrix = Array2::<f64>::zeros((self.rows.len(), PROBE_COUNT));
        for (mut out_row, reading) in matrix.rows_mut().into_iter().zip(&self.rows) {
            for (cell, &value) in out_row.iter_mut().zip(reading.probes.iter()) {
                *cell = value;
            }
        }
        matrix
    }

    /// Rows whose time of day lies in `[start, end]`. A window with
    /// `start > end` wraps around midnight.
    pub fn between_time(&self, start: NaiveTime, end: NaiveTime) -> TelemetryTable {
        let in_window = |t: NaiveTime| {
            if start <= end {
                t >= start && t <= end
            } else {
                t >= start || t <= end
            }
        };
        let rows = self
            .rows
            .iter()
            .filter(|reading| in_window(reading.timestamp.time()))
            .cloned()
            .collect();
        Self::with_columns(self.columns.clone(), rows)
    }

    /// One row per calendar day holding the mean of every numeric column,
    /// stamped at midnight. Days come out in ascending order.
    pub fn resample_daily_mean(&self) -> TelemetryTable {
        let mut days: BTreeMap<NaiveDate, Vec<&Reading>> = BTreeMap::new();
        for reading in &self.rows {
            days.entry(reading.timestamp.date()).or_default().push(reading);
        }

        let rows = days
            .into_iter()
            .map(|(day, readings)| {
                let charging_rows = readings.iter().filter(|r| r.is_charging).count();
                Reading {
                    timestamp: day.and_time(NaiveTime::MIN),
                    voltage: mean_of(&readings, |r| r.voltage),
                    charge: mean_of(&readings, |r| r.charge),
                    is_charging: charging_rows * 2 > readings.len(),
                    enclosure_temp: mean_of(&readings, |r| r.enclosure_temp),
                    probes: std::array::from_fn(|slot| mean_of(&readings, |r| r.probes[slot])),
                }
            })
            .collect();
        Self::with_columns(self.columns.clone(), rows)
    }
}

fn mean_of(readings: &[&Reading], field: impl Fn(&Reading) -> f64) -> f64 {
    readings.iter().map(|&r| field(r)).sum::<f64>() / readings.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SENTINEL_CODES;
    use chrono::NaiveDateTime;
    use proptest::prelude::*;

    fn reading(ts: &str, base: f64) -> Reading {
        Reading {
            timestamp: NaiveDateTime::parse_from_str(ts, "%Y/%m/%d %H:%M:%S").unwrap(),
            voltage: 4.1,
            charge: 90.0,
            is_charging: false,
            enclosure_temp: 25.0,
            probes: std::array::from_fn(|i| base + i as f64),
        }
    }

    #[test]
    fn level_readings_follow_probe_names() {
        let table = TelemetryTable::new(vec![reading("2014/10/01 00:00:00", 10.0)]);
        assert_eq!(table.level_readings(0, 0), Some([10.0, 11.0, 12.0, 13.0]));
        assert_eq!(table.level_readings(0, 4), Some([26.0, 27.0, 28.0, 29.0]));
        assert_eq!(table.level_readings(1, 0), None);
    }

    #[test]
    fn relabel_changes_level_lookup() {
        let mut table = TelemetryTable::new(vec![reading("2014/10/01 00:00:00", 0.0)]);
        table.relabel(&ProbeRelabel::hive_wiring_correction());
        // T13 now comes from file column 16.
        assert_eq!(table.probe(0, "T13"), Some(15.0));
        assert_eq!(table.level_readings(0, 3), Some([15.0, 12.0, 13.0, 14.0]));
    }

    #[test]
    fn substitution_is_idempotent() {
        let mut row = reading("2014/10/01 00:00:00", 20.0);
        row.probes[3] = -127.0;
        row.probes[7] = 85.0;
        row.enclosure_temp = -127.0;
        let mut table = TelemetryTable::new(vec![row]);

        assert_eq!(table.substitute_bad_values(&SENTINEL_CODES), 3);
        let cleaned = table.rows().to_vec();
        assert_eq!(table.rows()[0].probes[3], 0.0);
        assert_eq!(table.rows()[0].probes[7], 0.0);

        assert_eq!(table.substitute_bad_values(&SENTINEL_CODES), 0);
        assert_eq!(table.rows(), cleaned.as_slice());
    }

    fn probe_cell() -> impl Strategy<Value = f64> {
        prop_oneof![
            Just(-127.0),
            Just(85.0),
            Just(0.0),
            -40.0f64..60.0,
        ]
    }

    proptest! {
        #[test]
        fn substitution_is_idempotent_for_any_row(
            probes in prop::collection::vec(probe_cell(), PROBE_COUNT),
            enclosure in probe_cell(),
        ) {
            let mut row = reading("2014/10/01 00:00:00", 0.0);
            row.probes.copy_from_slice(&probes);
            row.enclosure_temp = enclosure;
            let expected = probes
                .iter()
                .chain(std::iter::once(&enclosure))
                .filter(|v| SENTINEL_CODES.contains(*v))
                .count();
            let mut table = TelemetryTable::new(vec![row]);

            prop_assert_eq!(table.substitute_bad_values(&SENTINEL_CODES), expected);
            let cleaned = table.rows().to_vec();
            prop_assert!(cleaned[0].probes.iter().all(|v| !SENTINEL_CODES.contains(v)));
            prop_assert_eq!(table.substitute_bad_values(&SENTINEL_CODES), 0);
            prop_assert_eq!(table.rows(), cleaned.as_slice());
        }
    }

    #[test]
    fn between_time_handles_midnight_wrap() {
        let table = TelemetryTable::new(vec![
            reading("2014/10/01 03:59:59", 0.0),
            reading("2014/10/01 04:30:00", 0.0),
            reading("2014/10/01 05:00:00", 0.0),
            reading("2014/10/01 23:30:00", 0.0),
        ]);
        let four_to_five = table.between_time(
            NaiveTime::from_hms_opt(4, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(5, 0, 0).unwrap(),
        );
        assert_eq!(four_to_five.len(), 2);

        let overnight = table.between_time(
            NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(4, 0, 0).unwrap(),
        );
        assert_eq!(overnight.len(), 2);
    }

    #[test]
    fn daily_mean_averages_each_day() {
        let table = TelemetryTable::new(vec![
            reading("2014/10/02 10:00:00", 10.0),
            reading("2014/10/01 10:00:00", 10.0),
            reading("2014/10/01 12:00:00", 20.0),
        ]);
        let daily = table.resample_daily_mean();
        assert_eq!(daily.len(), 2);
        assert_eq!(daily.rows()[0].probes[0], 15.0);
        assert_eq!(daily.rows()[0].timestamp.time(), NaiveTime::MIN);
        assert_eq!(daily.rows()[1].probes[0], 10.0);
    }

    #[test]
    fn probe_matrix_shape() {
        let table = TelemetryTable::new(vec![
            reading("2014/10/01 00:00:00", 0.0),
            reading("2014/10/01 00:01:00", 1.0),
        ]);
        let matrix = table.probe_matrix();
        assert_eq!(matrix.dim(), (2, PROBE_COUNT));
        assert_eq!(matrix[[1, 19]], 20.0);
    }
}

// src/data_input/telemetry_table.rs
