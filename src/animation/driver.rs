// src/animation/driver.rs

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::animation::state::{rotation_for_frame, AnimationPhase, AnimationState};
use crate::config::{OverlaySettings, PipelineConfig};
use crate::constants::{RENDER_FILE_EXTENSION, RENDER_FILE_PREFIX};
use crate::data_analysis::extents::{Extent, LinearScale};
use crate::data_analysis::lattice::LatticeSampler;
use crate::data_analysis::volume::VolumeSynthesizer;
use crate::data_input::telemetry_table::TelemetryTable;
use crate::error::{Result, VizError};
use crate::render::overlay::format_overlay;
use crate::render::transfer::ColormapPreset;
use crate::render::{FrameView, VolumeRenderer};

/// File name of a captured frame, e.g. `render_000042.png`.
pub fn render_file_name(frame: usize) -> String {
    format!("{}{:06}.{}", RENDER_FILE_PREFIX, frame, RENDER_FILE_EXTENSION)
}

/// Summary of an offscreen run.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub frames: usize,
    pub paths: Vec<PathBuf>,
    pub elapsed: Duration,
}

/// Result of one interactive tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Rendered(usize),
    /// No data for this frame; the previous image stays up.
    Skipped(usize),
    /// Past the last frame, waiting for cancellation.
    Waiting,
    Cancelled,
}

/// Drives frames from the table through the synthesizer into a renderer.
///
/// Owns the animation state, the voxel buffer and the overlay text; the
/// renderer only sees a borrowed `FrameView` per frame.
pub struct FrameDriver<'t> {
    table: &'t TelemetryTable,
    sampler: LatticeSampler,
    synthesizer: VolumeSynthesizer,
    preset: ColormapPreset,
    overlay_settings: OverlaySettings,
    overlay: String,
    state: AnimationState,
    frame_step: usize,
    rotate_every_nth_frame: usize,
    rotation_step_deg: f64,
    rotate_interactive: bool,
}

impl<'t> FrameDriver<'t> {
    /// Sets up a run over rows `start..=end`; `end` defaults to the last row.
    pub fn new(
        table: &'t TelemetryTable,
        config: &PipelineConfig,
        extent: Extent,
        start: usize,
        end: Option<usize>,
    ) -> Result<Self> {
        config.validate()?;
        if table.is_empty() {
            return Err(VizError::EmptyTable);
        }
        let end = end.unwrap_or(table.len() - 1);
        if start > end || start >= table.len() {
            return Err(VizError::InvalidFrameRange {
                start,
                end,
                rows: table.len(),
            });
        }

        let synthesizer = VolumeSynthesizer::new(
            LinearScale::from_extent(extent),
            config.zoom_factor,
            config.spline_order()?,
            config.volume_dim,
        )?;
        let preset = config.colormap.resolve(&extent);
        info!(
            "Frames {}..={}, colormap {}, zoom x{} order {}",
            start, end, preset, config.zoom_factor, config.zoom_order
        );

        Ok(Self {
            table,
            sampler: LatticeSampler::new(config.vertical_flip),
            synthesizer,
            preset,
            overlay_settings: config.overlay.clone(),
            overlay: String::new(),
            state: AnimationState::new(start, end),
            frame_step: config.frame_step,
            rotate_every_nth_frame: config.rotate_every_nth_frame,
            rotation_step_deg: config.rotation_step_deg,
            rotate_interactive: config.rotate_interactive,
        })
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn preset(&self) -> ColormapPreset {
        self.preset
    }

    pub fn overlay(&self) -> &str {
        &self.overlay
    }

    pub fn synthesizer(&self) -> &VolumeSynthesizer {
        &self.synthesizer
    }

    /// Synthesizes the volume and overlay for `row`. `false` at end of data.
    pub fn update_data(&mut self, row: usize) -> bool {
        let Some(sample) = self.sampler.sample(self.table, row) else {
            return false;
        };
        self.synthesizer.synthesize(&sample);
        self.overlay = format_overlay(&sample, &self.sampler, &self.overlay_settings);
        true
    }

    pub fn update_rotation(&mut self, frame: usize) -> f64 {
        self.state.rotation_deg =
            rotation_for_frame(frame, self.rotate_every_nth_frame, self.rotation_step_deg);
        self.state.rotation_deg
    }

    pub fn frame_view(&self) -> FrameView<'_> {
        FrameView {
            volume: self.synthesizer.volume(),
            bounds: self.synthesizer.bounds(),
            rotation_deg: self.state.rotation_deg,
            overlay: &self.overlay,
        }
    }

    fn begin<R: VolumeRenderer + ?Sized>(&mut self, renderer: &mut R) {
        renderer.set_transfer_functions(&self.preset.transfer_functions());
        self.state.frame = self.state.start;
        self.state.phase = AnimationPhase::Rendering;
    }

    /// Renders every frame to `out_dir/render_NNNNNN.png`.
    ///
    /// Stops early at end of data. A failed capture aborts the run.
    pub fn run_offscreen<R: VolumeRenderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        out_dir: &Path,
    ) -> Result<BatchReport> {
        fs::create_dir_all(out_dir)?;
        self.begin(renderer);
        let run_start = Instant::now();
        let mut paths = Vec::new();

        while !self.state.past_end() {
            let frame = self.state.frame;
            let frame_start = Instant::now();
            if !self.update_data(frame) {
                info!("No data for frame {}, stopping", frame);
                break;
            }
            self.update_rotation(frame);
            renderer.render(&self.frame_view())?;
            let path = out_dir.join(render_file_name(frame));
            renderer.capture(&path)?;
            info!(
                "Rendered frame {} in {:.3} sec",
                frame,
                frame_start.elapsed().as_secs_f64()
            );
            paths.push(path);
            self.state.frame += 1;
        }

        self.state.phase = AnimationPhase::Finished;
        let report = BatchReport {
            frames: paths.len(),
            paths,
            elapsed: run_start.elapsed(),
        };
        info!(
            "Wrote {} frames to {} in {:.2} sec",
            report.frames,
            out_dir.display(),
            report.elapsed.as_secs_f64()
        );
        Ok(report)
    }

    /// One timer tick of the interactive mode.
    pub fn tick<R: VolumeRenderer + ?Sized>(&mut self, renderer: &mut R) -> Result<TickOutcome> {
        if self.state.is_finished() {
            return Ok(TickOutcome::Cancelled);
        }
        if renderer.event_pending() {
            info!("Cancelled at frame {}", self.state.frame);
            self.state.phase = AnimationPhase::Finished;
            return Ok(TickOutcome::Cancelled);
        }
        if self.state.phase == AnimationPhase::Idle {
            self.begin(renderer);
        }
        if self.state.past_end() {
            self.state.phase = AnimationPhase::Paused;
            return Ok(TickOutcome::Waiting);
        }

        let frame = self.state.frame;
        let outcome = if self.update_data(frame) {
            if self.rotate_interactive {
                self.update_rotation(frame);
            }
            renderer.render(&self.frame_view())?;
            debug!("Displayed frame {}", frame);
            TickOutcome::Rendered(frame)
        } else {
            TickOutcome::Skipped(frame)
        };
        self.state.frame += self.frame_step;
        if self.state.past_end() {
            self.state.phase = AnimationPhase::Paused;
        }
        Ok(outcome)
    }

    /// Ticks every `tick_interval` until the renderer reports cancellation.
    pub fn run_interactive<R: VolumeRenderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        tick_interval: Duration,
    ) -> Result<AnimationState> {
        loop {
            if self.tick(renderer)? == TickOutcome::Cancelled {
                break;
            }
            thread::sleep(tick_interval);
        }
        Ok(self.state.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_input::log_data::Reading;
    use crate::render::transfer::TransferFunctions;
    use chrono::NaiveDate;

    #[derive(Default)]
    struct RecordingRenderer {
        transfer_set: bool,
        rendered_rotations: Vec<f64>,
        overlays: Vec<String>,
        captures: Vec<PathBuf>,
        cancel_after_polls: Option<usize>,
        polls: usize,
    }

    impl VolumeRenderer for RecordingRenderer {
        fn set_transfer_functions(&mut self, _transfer: &TransferFunctions) {
            self.transfer_set = true;
        }

        fn render(&mut self, frame: &FrameView<'_>) -> Result<()> {
            assert!(self.transfer_set);
            self.rendered_rotations.push(frame.rotation_deg);
            self.overlays.push(frame.overlay.to_string());
            Ok(())
        }

        fn capture(&mut self, path: &Path) -> Result<()> {
            self.captures.push(path.to_path_buf());
            Ok(())
        }

        fn event_pending(&mut self) -> bool {
            self.polls += 1;
            self.cancel_after_polls.is_some_and(|n| self.polls > n)
        }
    }

    fn table(rows: usize) -> TelemetryTable {
        let base = NaiveDate::from_ymd_opt(2014, 10, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        TelemetryTable::new(
            (0..rows)
                .map(|i| Reading {
                    timestamp: base + chrono::Duration::minutes(i as i64),
                    voltage: 4.0,
                    charge: 80.0,
                    is_charging: false,
                    enclosure_temp: 20.0,
                    probes: [20.0 + i as f64; 20],
                })
                .collect(),
        )
    }

    fn small_config() -> PipelineConfig {
        PipelineConfig {
            zoom_factor: 2,
            volume_dim: [10, 10, 10],
            frame_step: 2,
            rotate_every_nth_frame: 1,
            rotation_step_deg: 90.0,
            ..PipelineConfig::default()
        }
    }

    fn extent() -> Extent {
        Extent::new(0.0, 40.0).unwrap()
    }

    #[test]
    fn file_names_are_zero_padded() {
        assert_eq!(render_file_name(0), "render_000000.png");
        assert_eq!(render_file_name(1234), "render_001234.png");
    }

    #[test]
    fn invalid_ranges_are_rejected() {
        let rows = table(3);
        let cfg = small_config();
        assert!(matches!(
            FrameDriver::new(&rows, &cfg, extent(), 2, Some(1)),
            Err(VizError::InvalidFrameRange { .. })
        ));
        assert!(FrameDriver::new(&rows, &cfg, extent(), 3, None).is_err());
        assert!(matches!(
            FrameDriver::new(&table(0), &cfg, extent(), 0, None),
            Err(VizError::EmptyTable)
        ));
    }

    #[test]
    fn offscreen_stops_at_end_of_data() {
        let rows = table(3);
        let mut driver = FrameDriver::new(&rows, &small_config(), extent(), 1, Some(10)).unwrap();
        let mut renderer = RecordingRenderer::default();
        let out_dir = std::env::temp_dir().join(format!("hivetemp_drv_{}", std::process::id()));

        let report = driver.run_offscreen(&mut renderer, &out_dir).unwrap();
        assert_eq!(report.frames, 2);
        assert_eq!(
            renderer.captures,
            vec![out_dir.join("render_000001.png"), out_dir.join("render_000002.png")]
        );
        assert_eq!(renderer.rendered_rotations, vec![90.0, 180.0]);
        assert!(renderer.overlays[0].contains("Frame: 1"));
        assert!(driver.state().is_finished());

        fs::remove_dir_all(&out_dir).ok();
    }

    #[test]
    fn ticks_advance_by_frame_step_then_pause() {
        let rows = table(5);
        let mut driver = FrameDriver::new(&rows, &small_config(), extent(), 0, None).unwrap();
        let mut renderer = RecordingRenderer::default();

        assert_eq!(driver.tick(&mut renderer).unwrap(), TickOutcome::Rendered(0));
        assert_eq!(driver.tick(&mut renderer).unwrap(), TickOutcome::Rendered(2));
        assert_eq!(driver.tick(&mut renderer).unwrap(), TickOutcome::Rendered(4));
        assert_eq!(driver.state().phase, AnimationPhase::Paused);
        assert_eq!(driver.tick(&mut renderer).unwrap(), TickOutcome::Waiting);
        assert_eq!(renderer.overlays.len(), 3);
        // Interactive rotation is off by default.
        assert!(renderer.rendered_rotations.iter().all(|&r| r == 0.0));
        assert!(renderer.captures.is_empty());
    }

    #[test]
    fn end_of_data_skips_redraw() {
        let rows = table(2);
        let mut driver = FrameDriver::new(&rows, &small_config(), extent(), 0, Some(3)).unwrap();
        let mut renderer = RecordingRenderer::default();

        assert_eq!(driver.tick(&mut renderer).unwrap(), TickOutcome::Rendered(0));
        assert_eq!(driver.tick(&mut renderer).unwrap(), TickOutcome::Skipped(2));
        assert_eq!(renderer.overlays.len(), 1);
    }

    #[test]
    fn cancellation_finishes_interactive_run() {
        let rows = table(4);
        let mut driver = FrameDriver::new(&rows, &small_config(), extent(), 0, None).unwrap();
        let mut renderer = RecordingRenderer {
            cancel_after_polls: Some(3),
            ..RecordingRenderer::default()
        };

        let state = driver
            .run_interactive(&mut renderer, Duration::from_millis(0))
            .unwrap();
        assert_eq!(state.phase, AnimationPhase::Finished);
        assert_eq!(renderer.overlays.len(), 2);
        assert_eq!(driver.tick(&mut renderer).unwrap(), TickOutcome::Cancelled);
    }
}

// src/animation/driver.rs
