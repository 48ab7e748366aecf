// src/font_config.rs

// Font styles for text drawn into rendered frames.
// Centralized so the overlay panel and placeholder messages stay consistent.

use crate::constants::{FONT_SIZE_MESSAGE, FONT_SIZE_OVERLAY};

/// Font family name for default system fonts.
/// When plotters renders with "sans-serif", it uses system fonts
pub const FONT_FAMILY_SYSTEM: &str = "sans-serif";

/// Represents a font style (family + size)
#[derive(Debug, Clone, Copy)]
pub struct FontStyle {
    pub family: &'static str,
    pub size: i32,
}

impl FontStyle {
    /// Tuple form accepted by plotters' `IntoFont`.
    pub const fn as_tuple(&self) -> (&'static str, i32) {
        (self.family, self.size)
    }
}

pub const FONT_OVERLAY: FontStyle = FontStyle {
    family: FONT_FAMILY_SYSTEM,
    size: FONT_SIZE_OVERLAY,
};

pub const FONT_MESSAGE: FontStyle = FontStyle {
    family: FONT_FAMILY_SYSTEM,
    size: FONT_SIZE_MESSAGE,
};

// src/font_config.rs
