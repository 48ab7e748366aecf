// src/render/raycast.rs

use plotters::backend::BitMapBackend;
use plotters::coord::Shift;
use plotters::drawing::{DrawingArea, IntoDrawingArea};
use plotters::element::{PathElement, Text};
use plotters::style::{Color, IntoFont, RGBColor};
use std::path::Path;
use tracing::{debug, warn};

use crate::config::RenderSettings;
use crate::constants::{
    COLOR_BACKGROUND, COLOR_OUTLINE, COLOR_TEXT, COLOR_TEXT_PANEL, EARLY_RAY_TERMINATION_ALPHA,
    OVERLAY_LINE_SPACING, OVERLAY_TEXT_TOP, OVERLAY_TEXT_X, VIEW_FIT_MARGIN,
};
use crate::data_analysis::volume::BlockBounds;
use crate::error::{Result, VizError};
use crate::font_config::{FONT_MESSAGE, FONT_OVERLAY};
use crate::render::transfer::{TransferFunctions, TransferLut};
use crate::render::{FrameView, VolumeRenderer};

// The 12 edges of a box as pairs of corner indices; corner bits are (x, y, z).
const BOX_EDGES: [(usize, usize); 12] = [
    (0, 1), (2, 3), (4, 5), (6, 7),
    (0, 2), (1, 3), (4, 6), (5, 7),
    (0, 4), (1, 5), (2, 6), (3, 7),
];

/// Orthographic view of a volume rotated about its vertical axis.
///
/// Screen x maps to `u`, screen y (upward) to volume y. The rotation angle
/// turns the volume about the vertical line through the volume center.
#[derive(Debug, Clone, Copy)]
struct Camera {
    center: [f64; 3],
    cos: f64,
    sin: f64,
    /// Volume units per pixel.
    scale: f64,
    half_width: f64,
    half_height: f64,
}

impl Camera {
    fn new(frame: &FrameView<'_>, view_width: u32, view_height: u32) -> Self {
        let (nx, ny, nz) = frame.volume.dim();
        let [bx, by, bz] = frame.bounds.dim;
        let footprint = ((bx * bx + bz * bz) as f64).sqrt();
        let scale = (footprint / view_width.max(1) as f64)
            .max(by as f64 / view_height.max(1) as f64)
            * VIEW_FIT_MARGIN;
        let angle = frame.rotation_deg.to_radians();
        Self {
            center: [nx as f64 / 2.0, ny as f64 / 2.0, nz as f64 / 2.0],
            cos: angle.cos(),
            sin: angle.sin(),
            scale: if scale > 0.0 { scale } else { 1.0 },
            half_width: view_width as f64 / 2.0,
            half_height: view_height as f64 / 2.0,
        }
    }

    /// Ray through the center of pixel `(px, py)`: origin and unit direction in voxels.
    fn ray(&self, px: u32, py: u32) -> ([f64; 3], [f64; 3]) {
        let u = (px as f64 + 0.5 - self.half_width) * self.scale;
        let v = (self.half_height - (py as f64 + 0.5)) * self.scale;
        let origin = [
            self.center[0] + u * self.cos,
            self.center[1] + v,
            self.center[2] - u * self.sin,
        ];
        let direction = [-self.sin, 0.0, -self.cos];
        (origin, direction)
    }

    /// Pixel position of a point in volume coordinates.
    fn project(&self, point: [f64; 3]) -> (f64, f64) {
        let qx = point[0] - self.center[0];
        let qy = point[1] - self.center[1];
        let qz = point[2] - self.center[2];
        let u = qx * self.cos - qz * self.sin;
        (
            u / self.scale + self.half_width,
            self.half_height - qy / self.scale,
        )
    }
}

/// Parametric interval where the ray is inside the block, if any.
fn clip_to_block(origin: [f64; 3], direction: [f64; 3], bounds: &BlockBounds) -> Option<(f64, f64)> {
    let end = bounds.end();
    let mut t_near = f64::NEG_INFINITY;
    let mut t_far = f64::INFINITY;
    for axis in 0..3 {
        let lo = bounds.offset[axis] as f64;
        let hi = end[axis] as f64;
        if direction[axis].abs() < 1e-12 {
            if origin[axis] < lo || origin[axis] >= hi {
                return None;
            }
            continue;
        }
        let t0 = (lo - origin[axis]) / direction[axis];
        let t1 = (hi - origin[axis]) / direction[axis];
        t_near = t_near.max(t0.min(t1));
        t_far = t_far.min(t0.max(t1));
    }
    (t_near < t_far).then_some((t_near, t_far))
}

/// Software ray caster writing PNG frames through plotters.
///
/// The canvas is split into a text panel on the left and the volume view on
/// the right. `render` fills an RGB buffer for the view; `capture` draws the
/// panel, the buffer and the block outline into a bitmap file.
pub struct SoftwareRenderer {
    settings: RenderSettings,
    lut: Option<TransferLut>,
    view_pixels: Vec<RGBColor>,
    overlay: String,
    outline: Vec<[(i32, i32); 2]>,
    rendered: bool,
    font_warning_shown: bool,
}

impl SoftwareRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            lut: None,
            view_pixels: Vec::new(),
            overlay: String::new(),
            outline: Vec::new(),
            rendered: false,
            font_warning_shown: false,
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    fn panel_width(&self) -> u32 {
        ((self.settings.width as f64 * self.settings.text_panel_fraction).round() as u32)
            .min(self.settings.width.saturating_sub(1))
    }

    fn view_size(&self) -> (u32, u32) {
        (
            self.settings.width - self.panel_width(),
            self.settings.height,
        )
    }

    /// Color of the view pixel at `(x, y)` of the last rendered frame.
    pub fn view_pixel(&self, x: u32, y: u32) -> Option<RGBColor> {
        let (width, height) = self.view_size();
        if !self.rendered || x >= width || y >= height {
            return None;
        }
        self.view_pixels.get((y * width + x) as usize).copied()
    }

    fn cast(&self, lut: &TransferLut, frame: &FrameView<'_>, camera: &Camera, px: u32, py: u32) -> RGBColor {
        let (origin, direction) = camera.ray(px, py);
        let Some((t_enter, t_exit)) = clip_to_block(origin, direction, &frame.bounds) else {
            return COLOR_BACKGROUND;
        };

        let step = self.settings.sample_distance;
        let (nx, ny, nz) = frame.volume.dim();
        let mut rgb = [0.0f64; 3];
        let mut alpha = 0.0f64;
        let mut t = t_enter + step * 0.5;
        while t < t_exit && alpha < EARLY_RAY_TERMINATION_ALPHA {
            let x = (origin[0] + t * direction[0]).floor();
            let y = (origin[1] + t * direction[1]).floor();
            let z = (origin[2] + t * direction[2]).floor();
            t += step;
            if x < 0.0 || y < 0.0 || z < 0.0 {
                continue;
            }
            let (x, y, z) = (x as usize, y as usize, z as usize);
            if x >= nx || y >= ny || z >= nz {
                continue;
            }
            let [r, g, b, a] = lut.rgba(frame.volume[[x, y, z]]);
            if a <= 0.0 {
                continue;
            }
            // Opacity is defined per unit length.
            let a = 1.0 - (1.0 - a).powf(step);
            let weight = (1.0 - alpha) * a;
            rgb[0] += weight * r;
            rgb[1] += weight * g;
            rgb[2] += weight * b;
            alpha += weight;
        }

        let background = [COLOR_BACKGROUND.0, COLOR_BACKGROUND.1, COLOR_BACKGROUND.2];
        let channel = |i: usize| -> u8 {
            let value = rgb[i] * 255.0 + (1.0 - alpha) * background[i] as f64;
            value.round().clamp(0.0, 255.0) as u8
        };
        RGBColor(channel(0), channel(1), channel(2))
    }

    /// Block edges in view pixel coordinates.
    fn block_outline(camera: &Camera, bounds: &BlockBounds) -> Vec<[(i32, i32); 2]> {
        let end = bounds.end();
        let corners: Vec<(i32, i32)> = (0..8)
            .map(|bits| {
                let pick = |axis: usize| {
                    if bits & (1 << (2 - axis)) != 0 {
                        end[axis] as f64
                    } else {
                        bounds.offset[axis] as f64
                    }
                };
                let (sx, sy) = camera.project([pick(0), pick(1), pick(2)]);
                (sx.round() as i32, sy.round() as i32)
            })
            .collect();
        BOX_EDGES
            .iter()
            .map(|&(a, b)| [corners[a], corners[b]])
            .collect()
    }

    fn draw_panel(&mut self, panel: &DrawingArea<BitMapBackend, Shift>) -> Result<()> {
        panel.fill(&COLOR_TEXT_PANEL).map_err(VizError::render)?;
        if !self.settings.draw_overlay {
            return Ok(());
        }
        let style = FONT_OVERLAY.as_tuple().into_font().color(&COLOR_TEXT);
        let line_height = FONT_OVERLAY.size + OVERLAY_LINE_SPACING;
        for (index, line) in self.overlay.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let position = (OVERLAY_TEXT_X, OVERLAY_TEXT_TOP + index as i32 * line_height);
            if let Err(e) = panel.draw(&Text::new(line, position, style.clone())) {
                // Font lookup can fail on headless machines; the frame is still useful.
                if !self.font_warning_shown {
                    warn!("Overlay text not drawn: {}", e);
                    self.font_warning_shown = true;
                }
                break;
            }
        }
        Ok(())
    }

    fn draw_no_frame_message(&mut self, view: &DrawingArea<BitMapBackend, Shift>) {
        let style = FONT_MESSAGE.as_tuple().into_font().color(&COLOR_TEXT);
        let (width, height) = self.view_size();
        let position = (width as i32 / 3, height as i32 / 2);
        if let Err(e) = view.draw(&Text::new("No frame rendered", position, style)) {
            debug!("Placeholder text not drawn: {}", e);
        }
    }
}

impl VolumeRenderer for SoftwareRenderer {
    fn set_transfer_functions(&mut self, transfer: &TransferFunctions) {
        self.lut = Some(transfer.lookup_table());
    }

    fn render(&mut self, frame: &FrameView<'_>) -> Result<()> {
        let lut = self
            .lut
            .as_ref()
            .ok_or_else(|| VizError::render("transfer functions not set"))?;
        let (width, height) = self.view_size();
        let camera = Camera::new(frame, width, height);

        let mut pixels = Vec::with_capacity((width * height) as usize);
        for py in 0..height {
            for px in 0..width {
                pixels.push(self.cast(lut, frame, &camera, px, py));
            }
        }
        self.view_pixels = pixels;
        self.outline = if self.settings.draw_outline {
            Self::block_outline(&camera, &frame.bounds)
        } else {
            Vec::new()
        };
        self.overlay = frame.overlay.to_string();
        self.rendered = true;
        Ok(())
    }

    fn capture(&mut self, path: &Path) -> Result<()> {
        let (width, height) = (self.settings.width, self.settings.height);
        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&COLOR_BACKGROUND).map_err(VizError::render)?;
        let (panel, view) = root.split_horizontally(self.panel_width());
        self.draw_panel(&panel)?;

        if self.rendered {
            let (view_width, view_height) = self.view_size();
            for py in 0..view_height {
                for px in 0..view_width {
                    let color = self.view_pixels[(py * view_width + px) as usize];
                    if color == COLOR_BACKGROUND {
                        continue;
                    }
                    view.draw_pixel((px as i32, py as i32), &color)
                        .map_err(VizError::render)?;
                }
            }
            for segment in &self.outline {
                view.draw(&PathElement::new(segment.to_vec(), COLOR_OUTLINE.stroke_width(1)))
                    .map_err(VizError::render)?;
            }
        } else {
            self.draw_no_frame_message(&view);
        }

        root.present().map_err(VizError::render)?;
        debug!("Captured {}", path.display());
        Ok(())
    }
}


// src/render/raycast.rs
