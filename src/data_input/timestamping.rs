// src/data_input/timestamping.rs

use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::constants::{LOG_FILE_EXTENSION, TIMESTAMPED_FILE_PREFIX};
use crate::data_input::log_parser::parse_log_datetime;
use crate::error::Result;

/// Log files (`*.log`, case-insensitive) directly inside `dir`, sorted by name.
pub fn log_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(LOG_FILE_EXTENSION))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Prefixes a log line with the UTC epoch seconds of its date/time columns.
pub fn epoch_prefixed_line(line: &str) -> Option<String> {
    let mut fields = line.split(',');
    let date = fields.next()?;
    let time = fields.next()?;
    let timestamp = parse_log_datetime(date, time)?;
    Some(format!("{},{}", timestamp.and_utc().timestamp(), line))
}

/// Writes `c_<name>` next to `path` with every line epoch-prefixed.
/// Lines without a parseable date/time are dropped with a warning.
pub fn timestamp_log_file(path: &Path) -> Result<PathBuf> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let out_path = path.with_file_name(format!("{}{}", TIMESTAMPED_FILE_PREFIX, file_name));

    let reader = BufReader::new(fs::File::open(path)?);
    let mut writer = BufWriter::new(fs::File::create(&out_path)?);
    let mut written = 0usize;
    for (line_index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match epoch_prefixed_line(&line) {
            Some(prefixed) => {
                writeln!(writer, "{}", prefixed)?;
                written += 1;
            }
            None => warn!(
                "Skipping line {} of {}: no date/time columns",
                line_index + 1,
                path.display()
            ),
        }
    }
    writer.flush()?;
    info!("Wrote {} lines to {}", written, out_path.display());
    Ok(out_path)
}


// src/data_input/timestamping.rs
