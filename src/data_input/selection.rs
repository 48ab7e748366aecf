// src/data_input/selection.rs

use chrono::NaiveTime;
use tracing::info;

use crate::data_input::telemetry_table::TelemetryTable;

/// Rotation pace for aggregated selections, which have one frame per day.
pub const AGGREGATED_ROTATE_EVERY_NTH_FRAME: usize = 2;

/// Which rows of the log become frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Selection {
    /// Every logged row.
    #[default]
    All,
    /// One frame per day holding the daily mean.
    DailyMean,
    /// Daily mean of the rows inside a time-of-day window.
    DailyWindow,
}

/// Selected rows plus the presentation hints that go with them.
#[derive(Debug, Clone)]
pub struct SelectedData {
    pub table: TelemetryTable,
    /// Overlay label shown instead of the time of day.
    pub static_time: Option<String>,
    pub rotate_every_nth_frame: Option<usize>,
}

/// Applies `selection` to the cleaned table. `window` is only read by `DailyWindow`.
pub fn select(table: TelemetryTable, selection: Selection, window: (NaiveTime, NaiveTime)) -> SelectedData {
    let before = table.len();
    let selected = match selection {
        Selection::All => SelectedData {
            table,
            static_time: None,
            rotate_every_nth_frame: None,
        },
        Selection::DailyMean => SelectedData {
            table: table.resample_daily_mean(),
            static_time: Some("Daily Average".to_string()),
            rotate_every_nth_frame: Some(AGGREGATED_ROTATE_EVERY_NTH_FRAME),
        },
        Selection::DailyWindow => {
            let (start, end) = window;
            SelectedData {
                table: table.between_time(start, end).resample_daily_mean(),
                static_time: Some(format!(
                    "Avg of {}-{}",
                    start.format("%H:%M"),
                    end.format("%H:%M")
                )),
                rotate_every_nth_frame: Some(AGGREGATED_ROTATE_EVERY_NTH_FRAME),
            }
        }
    };
    info!(
        "Selected {} of {} rows ({:?})",
        selected.table.len(),
        before,
        selection
    );
    selected
}


// src/data_input/selection.rs
