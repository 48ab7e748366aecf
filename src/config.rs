// src/config.rs

//! Pipeline configuration.
//!
//! The near-identical visualization variants (zoom order, frame step, colormap,
//! vertical flip) are all expressed through one `PipelineConfig`. Values come
//! from defaults, an optional TOML/JSON/YAML file, then CLI overrides.

use serde::Deserialize;
use std::path::Path;

use crate::constants::{
    DEFAULT_FRAME_STEP, DEFAULT_HIVE_NAME, DEFAULT_OVERLAY_TITLE, DEFAULT_ROTATE_EVERY_NTH_FRAME,
    DEFAULT_ROTATION_STEP_DEG, DEFAULT_SAMPLE_DISTANCE, DEFAULT_TICK_INTERVAL_MS,
    DEFAULT_VOLUME_DIM, DEFAULT_ZOOM_FACTOR, DEFAULT_ZOOM_ORDER, LATTICE_DIM, RENDER_HEIGHT,
    RENDER_WIDTH, TEXT_PANEL_FRACTION,
};
use crate::data_analysis::extents::Extent;
use crate::data_analysis::spline_zoom::SplineOrder;
use crate::error::{Result, VizError};
use crate::render::transfer::ColormapPreset;

/// Colormap selection. `Auto` picks the preset from the sign of the extent's lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColormapChoice {
    #[default]
    Auto,
    Summer,
    Year,
}

impl ColormapChoice {
    pub fn resolve(self, extent: &Extent) -> ColormapPreset {
        match self {
            ColormapChoice::Auto => ColormapPreset::for_extent(extent),
            ColormapChoice::Summer => ColormapPreset::Summer,
            ColormapChoice::Year => ColormapPreset::Year,
        }
    }
}

/// Canvas and ray casting settings for the software renderer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    /// Share of the canvas width used by the text panel on the left.
    pub text_panel_fraction: f64,
    /// Ray marching step in voxels.
    pub sample_distance: f64,
    pub draw_overlay: bool,
    pub draw_outline: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: RENDER_WIDTH,
            height: RENDER_HEIGHT,
            text_panel_fraction: TEXT_PANEL_FRACTION,
            sample_distance: DEFAULT_SAMPLE_DISTANCE,
            draw_overlay: true,
            draw_outline: true,
        }
    }
}

/// Labels shown in the overlay panel.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    pub title: String,
    pub hive_name: String,
    /// Replaces the time of day for aggregated frames (e.g. "Daily Average").
    pub static_time: Option<String>,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            title: DEFAULT_OVERLAY_TITLE.to_string(),
            hive_name: DEFAULT_HIVE_NAME.to_string(),
            static_time: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Spline interpolation degree used by the zoom step (0-3).
    pub zoom_order: u8,
    pub zoom_factor: usize,
    /// Rows advanced per interactive tick.
    pub frame_step: usize,
    pub colormap: ColormapChoice,
    /// Level 0 (T1..T4) at the top of the screen when set.
    pub vertical_flip: bool,
    pub volume_dim: [usize; 3],
    pub rotate_every_nth_frame: usize,
    pub rotation_step_deg: f64,
    pub rotate_interactive: bool,
    pub tick_interval_ms: u64,
    pub render: RenderSettings,
    pub overlay: OverlaySettings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            zoom_order: DEFAULT_ZOOM_ORDER,
            zoom_factor: DEFAULT_ZOOM_FACTOR,
            frame_step: DEFAULT_FRAME_STEP,
            colormap: ColormapChoice::Auto,
            vertical_flip: true,
            volume_dim: DEFAULT_VOLUME_DIM,
            rotate_every_nth_frame: DEFAULT_ROTATE_EVERY_NTH_FRAME,
            rotation_step_deg: DEFAULT_ROTATION_STEP_DEG,
            rotate_interactive: false,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            render: RenderSettings::default(),
            overlay: OverlaySettings::default(),
        }
    }
}

impl PipelineConfig {
    /// Loads the configuration from an optional file. Missing keys keep their defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let cfg = match path {
            Some(path) => {
                let settings = config::Config::builder()
                    .add_source(config::File::from(path))
                    .build()?;
                settings.try_deserialize::<PipelineConfig>()?
            }
            None => PipelineConfig::default(),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn spline_order(&self) -> Result<SplineOrder> {
        SplineOrder::try_from(self.zoom_order)
    }

    /// Shape of the zoomed lattice block.
    pub fn block_dim(&self) -> [usize; 3] {
        LATTICE_DIM.map(|n| n * self.zoom_factor)
    }

    pub fn validate(&self) -> Result<()> {
        self.spline_order()?;
        if self.zoom_factor == 0 {
            return Err(VizError::invalid_config("zoom_factor must be at least 1"));
        }
        if self.frame_step == 0 {
            return Err(VizError::invalid_config("frame_step must be at least 1"));
        }
        if self.rotate_every_nth_frame == 0 {
            return Err(VizError::invalid_config(
                "rotate_every_nth_frame must be at least 1",
            ));
        }
        let block = self.block_dim();
        if block.iter().zip(self.volume_dim.iter()).any(|(b, v)| b > v) {
            return Err(VizError::invalid_config(format!(
                "zoomed block {:?} does not fit volume {:?}",
                block, self.volume_dim
            )));
        }
        if !(0.0..1.0).contains(&self.render.text_panel_fraction) {
            return Err(VizError::invalid_config(
                "render.text_panel_fraction must be in [0, 1)",
            ));
        }
        if !self.render.sample_distance.is_finite() || self.render.sample_distance <= 0.0 {
            return Err(VizError::invalid_config(
                "render.sample_distance must be positive",
            ));
        }
        if self.render.width == 0 || self.render.height == 0 {
            return Err(VizError::invalid_config("render size must be non-zero"));
        }
        Ok(())
    }
}


// src/config.rs
