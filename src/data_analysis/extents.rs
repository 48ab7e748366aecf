// src/data_analysis/extents.rs

use ndarray_stats::QuantileExt;
use std::time::Instant;
use tracing::{info, warn};

use crate::constants::{EXTENT_PROGRESS_EVERY_ROWS, INTENSITY_MAX};
use crate::data_analysis::lattice::LatticeSampler;
use crate::data_analysis::spline_zoom::{self, SplineOrder};
use crate::data_input::telemetry_table::TelemetryTable;
use crate::error::{Result, VizError};

/// Observed (or supplied) temperature range used to normalize intensities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(VizError::InvalidExtent { min, max });
        }
        Ok(Self { min, max })
    }

    /// Grows the extent so it also covers `[lo, hi]`.
    pub fn include(&mut self, lo: f64, hi: f64) {
        if lo < self.min {
            self.min = lo;
        }
        if hi > self.max {
            self.max = hi;
        }
    }

    /// The extent widened outward to 2 decimals, for reuse as `--min/--max`.
    pub fn rounded_outward(&self) -> Extent {
        Extent {
            min: (self.min * 100.0).floor() / 100.0,
            max: (self.max * 100.0).ceil() / 100.0,
        }
    }
}

/// How the run obtains its extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExtentMode {
    /// Caller-supplied range; no scan.
    Override(Extent),
    /// Min/max of the raw probe columns.
    Raw,
    /// Min/max after spline interpolation of every row. Slow.
    True,
}

/// Linear map from an extent onto `[0, 255]`, clamped at both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    extent: Extent,
}

impl LinearScale {
    pub fn from_extent(extent: Extent) -> Self {
        Self { extent }
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn apply(&self, value: f64) -> f64 {
        let Extent { min, max } = self.extent;
        if value.is_nan() || value <= min {
            return 0.0;
        }
        if value >= max {
            return INTENSITY_MAX;
        }
        ((value - min) / (max - min) * INTENSITY_MAX).clamp(0.0, INTENSITY_MAX)
    }
}

/// Min/max over every probe column of the table.
pub fn raw_extents(table: &TelemetryTable) -> Result<Extent> {
    if table.is_empty() {
        return Err(VizError::EmptyTable);
    }
    let probes = table.probe_matrix();
    let min = *probes
        .min()
        .map_err(|e| VizError::invalid_config(format!("probe minimum: {}", e)))?;
    let max = *probes
        .max()
        .map_err(|e| VizError::invalid_config(format!("probe maximum: {}", e)))?;
    Extent::new(min, max)
}

/// Extent of the interpolated temperatures over every row.
///
/// Spline interpolation overshoots the raw per-probe extrema, so this runs the
/// same lattice sampling and zoom used for rendering on each row and widens the
/// raw extent with the result. Cost is one zoom per row.
pub fn true_extents(
    table: &TelemetryTable,
    sampler: &LatticeSampler,
    zoom_factor: usize,
    order: SplineOrder,
) -> Result<Extent> {
    let mut extent = raw_extents(table)?;
    info!(
        "Temperature value range: {:.2} - {:.2}",
        extent.min, extent.max
    );
    info!("Calculating true extents... this will take a long time!");

    let start_time = Instant::now();
    for row in 0..table.len() {
        let Some(sample) = sampler.sample(table, row) else {
            break;
        };
        let zoomed = spline_zoom::zoom(&sample.lattice, zoom_factor, order);
        match spline_zoom::value_range(&zoomed) {
            Some((lo, hi)) => extent.include(lo, hi),
            None => warn!("Row {} produced no finite interpolated values", row),
        }
        if row > 0 && row % EXTENT_PROGRESS_EVERY_ROWS == 0 {
            info!(
                "Processed {} rows, current value range: {:.4} - {:.4}",
                row, extent.min, extent.max
            );
        }
    }

    let hint = extent.rounded_outward();
    info!(
        "True extents took {:.2} sec. In the future, you can use '--min {:.2} --max {:.2}' to skip this step.",
        start_time.elapsed().as_secs_f64(),
        hint.min,
        hint.max
    );
    Ok(extent)
}

/// Resolves the extent for a run according to `mode`.
pub fn resolve_extent(
    mode: ExtentMode,
    table: &TelemetryTable,
    sampler: &LatticeSampler,
    zoom_factor: usize,
    order: SplineOrder,
) -> Result<Extent> {
    let extent = match mode {
        ExtentMode::Override(extent) => extent,
        ExtentMode::Raw => raw_extents(table)?,
        ExtentMode::True => true_extents(table, sampler, zoom_factor, order)?,
    };
    info!("Value range: {:.2} - {:.2}", extent.min, extent.max);
    Ok(extent)
}


// src/data_analysis/extents.rs
