// src/data_input/log_parser.rs

use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::constants::{LOG_DATETIME_FORMAT, LOG_FIELD_COUNT, PROBE_COUNT, SENTINEL_REPLACEMENT};
use crate::data_input::log_data::Reading;
use crate::data_input::telemetry_table::TelemetryTable;
use crate::error::Result;

// Column positions inside a log line (after an optional epoch prefix).
const COL_DATE: usize = 0;
const COL_TIME: usize = 1;
const COL_VOLTAGE: usize = 2;
const COL_CHARGE: usize = 3;
const COL_IS_CHARGING: usize = 4;
const COL_ENCLOSURE: usize = 5;
const COL_FIRST_PROBE: usize = 6;

/// Parses a headerless telemetry log file into a table.
///
/// Lines that are too short or carry an unparseable date/time are skipped with a
/// warning. Unparseable numeric cells are normalized to zero.
pub fn parse_log_file(input_file_path: &Path) -> Result<TelemetryTable> {
    info!("Loading data from {}", input_file_path.display());
    let file = File::open(input_file_path)?;
    parse_log_reader(BufReader::new(file))
}

pub fn parse_log_str(contents: &str) -> Result<TelemetryTable> {
    parse_log_reader(contents.as_bytes())
}

pub fn parse_log_reader<R: Read>(reader: R) -> Result<TelemetryTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows: Vec<Reading> = Vec::new();
    let mut malformed_cells = 0usize;

    for (row_index, result) in reader.records().enumerate() {
        match result {
            Ok(record) => match parse_record(&record) {
                Ok((reading, malformed)) => {
                    malformed_cells += malformed;
                    rows.push(reading);
                }
                Err(reason) => {
                    warn!("Skipping row {}: {}", row_index + 1, reason);
                }
            },
            Err(e) => {
                warn!("Skipping row {} due to CSV read error: {}", row_index + 1, e);
            }
        }
    }

    if malformed_cells > 0 {
        debug!("Normalized {} unparseable cells to zero", malformed_cells);
    }
    info!("Finished reading {} data rows.", rows.len());
    Ok(TelemetryTable::new(rows))
}

/// Combines the log's date (`YYYY/MM/DD`) and time (`HH:MM:SS`) columns.
/// Components without zero padding (`2014/10/1`, `0:2:2`) are accepted.
pub fn parse_log_datetime(date: &str, time: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(&format!("{} {}", date.trim(), time.trim()), LOG_DATETIME_FORMAT).ok()
}

/// Parses one record; returns the reading and the number of cells normalized to zero.
fn parse_record(record: &StringRecord) -> std::result::Result<(Reading, usize), String> {
    // Files produced by the timestamp utility carry a leading epoch column.
    let offset = if record.len() > LOG_FIELD_COUNT
        && record.get(0).is_some_and(|f| f.parse::<i64>().is_ok())
    {
        1
    } else {
        0
    };
    if record.len() < LOG_FIELD_COUNT + offset {
        return Err(format!(
            "expected {} fields, found {}",
            LOG_FIELD_COUNT,
            record.len().saturating_sub(offset)
        ));
    }
    let field = |col: usize| record.get(col + offset).unwrap_or("");

    let timestamp = parse_log_datetime(field(COL_DATE), field(COL_TIME)).ok_or_else(|| {
        format!(
            "invalid date/time '{} {}'",
            field(COL_DATE),
            field(COL_TIME)
        )
    })?;

    let mut malformed = 0usize;
    let mut number = |col: usize| -> f64 {
        match field(col).parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                malformed += 1;
                SENTINEL_REPLACEMENT
            }
        }
    };

    let voltage = number(COL_VOLTAGE);
    let charge = number(COL_CHARGE);
    let is_charging = number(COL_IS_CHARGING) != 0.0;
    let enclosure_temp = number(COL_ENCLOSURE);
    let mut probes = [0.0; PROBE_COUNT];
    for (slot, value) in probes.iter_mut().enumerate() {
        *value = number(COL_FIRST_PROBE + slot);
    }

    Ok((
        Reading {
            timestamp,
            voltage,
            charge,
            is_charging,
            enclosure_temp,
            probes,
        },
        malformed,
    ))
}


// src/data_input/log_parser.rs
