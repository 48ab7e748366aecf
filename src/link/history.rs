// src/link/history.rs

use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::constants::{DEFAULT_TELEMETRY_LOG, EPOCH_LOG_DATETIME};
use crate::data_input::timestamping::log_files_in;
use crate::error::Result;
use crate::link::session::TelemetryLink;

/// `date,time` of the last record in the newest local log file.
///
/// Files are ordered by name; lines without a comma are ignored.
/// `None` when there is no log file or no record yet.
pub fn last_logged_datetime(dir: &Path) -> Result<Option<String>> {
    let files = log_files_in(dir)?;
    let Some(last_file) = files.last() else {
        return Ok(None);
    };
    let contents = fs::read_to_string(last_file)?;
    let last = contents.lines().rev().find_map(|line| {
        let mut fields = line.trim().split(',');
        match (fields.next(), fields.next()) {
            (Some(date), Some(time)) if !date.is_empty() => Some(format!("{},{}", date, time)),
            _ => None,
        }
    });
    Ok(last)
}

/// Appends raw logger output to `path`, creating it if needed.
pub fn append_to_log(path: &Path, contents: &str) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(contents.as_bytes())?;
    Ok(())
}

/// Waits for the logger, pulls every record newer than the local history and
/// appends it to `telemetry.log` in `log_dir`. Returns the log path and the
/// number of lines pulled.
pub fn pull_new_records<S: Read + Write>(
    link: &mut TelemetryLink<S>,
    log_dir: &Path,
) -> Result<(PathBuf, usize)> {
    let since = match last_logged_datetime(log_dir)? {
        Some(since) => {
            info!("Last date/time received was {}", since);
            since
        }
        None => {
            warn!("No records found, starting fresh");
            EPOCH_LOG_DATETIME.to_string()
        }
    };

    link.wait_for_prompt()?;
    let data = link.pull_since(&since)?;
    let lines = data.lines().filter(|line| !line.trim().is_empty()).count();

    let log_path = log_dir.join(DEFAULT_TELEMETRY_LOG);
    append_to_log(&log_path, &data)?;
    info!("Appended {} lines to {}", lines, log_path.display());
    Ok((log_path, lines))
}


// src/link/history.rs
