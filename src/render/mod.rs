// src/render/mod.rs

//! Rendering boundary.
//!
//! The frame driver only talks to a `VolumeRenderer`: it hands over the
//! transfer functions once, then a read-only `FrameView` per frame, and asks
//! for captures in batch mode.

pub mod overlay;
pub mod preview;
pub mod raycast;
pub mod transfer;

use ndarray::ArrayView3;
use std::path::Path;

use crate::data_analysis::volume::BlockBounds;
use crate::error::Result;
use crate::render::transfer::TransferFunctions;

/// Everything a renderer may read for one frame. Borrowed, never owned.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub volume: ArrayView3<'a, u8>,
    pub bounds: BlockBounds,
    /// Rotation of the volume about its vertical axis, degrees in [0, 360).
    pub rotation_deg: f64,
    pub overlay: &'a str,
}

pub trait VolumeRenderer {
    fn set_transfer_functions(&mut self, transfer: &TransferFunctions);

    fn render(&mut self, frame: &FrameView<'_>) -> Result<()>;

    /// Writes the most recently rendered frame to `path` as PNG.
    fn capture(&mut self, path: &Path) -> Result<()>;

    /// Polled once per interactive tick; `true` requests cancellation.
    fn event_pending(&mut self) -> bool {
        false
    }
}

// src/render/mod.rs
