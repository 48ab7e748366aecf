// src/render/transfer.rs

use std::fmt;

use crate::data_analysis::extents::Extent;

const BLUE: [f64; 3] = [0.0, 0.0, 1.0];
const GREEN: [f64; 3] = [0.0, 1.0, 0.0];
const YELLOW: [f64; 3] = [1.0, 1.0, 0.0];
const RED: [f64; 3] = [1.0, 0.0, 0.0];

/// Number of distinct 8-bit intensities.
pub const LUT_SIZE: usize = 256;

/// Color and opacity control points over the intensity range [0, 255].
///
/// Both curves interpolate linearly between points and hold their end values
/// outside the covered range.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferFunctions {
    color: Vec<(f64, [f64; 3])>,
    opacity: Vec<(f64, f64)>,
}

impl TransferFunctions {
    /// Builds the curves; control points are sorted by intensity.
    pub fn new(mut color: Vec<(f64, [f64; 3])>, mut opacity: Vec<(f64, f64)>) -> Self {
        color.sort_by(|a, b| a.0.total_cmp(&b.0));
        opacity.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { color, opacity }
    }

    pub fn color_points(&self) -> &[(f64, [f64; 3])] {
        &self.color
    }

    pub fn opacity_points(&self) -> &[(f64, f64)] {
        &self.opacity
    }

    pub fn color_at(&self, value: f64) -> [f64; 3] {
        let mut rgb = [0.0; 3];
        for (channel, out) in rgb.iter_mut().enumerate() {
            *out = piecewise_linear(&self.color, value, |point| point[channel]);
        }
        rgb
    }

    pub fn opacity_at(&self, value: f64) -> f64 {
        piecewise_linear(&self.opacity, value, |&alpha| alpha)
    }

    /// Samples both curves at every 8-bit intensity.
    pub fn lookup_table(&self) -> TransferLut {
        let entries = (0..LUT_SIZE)
            .map(|i| {
                let value = i as f64;
                let [r, g, b] = self.color_at(value);
                [r, g, b, self.opacity_at(value).clamp(0.0, 1.0)]
            })
            .collect();
        TransferLut { entries }
    }
}

fn piecewise_linear<T>(points: &[(f64, T)], value: f64, get: impl Fn(&T) -> f64) -> f64 {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return 0.0;
    };
    if value <= first.0 {
        return get(&first.1);
    }
    if value >= last.0 {
        return get(&last.1);
    }
    for pair in points.windows(2) {
        let (x0, y0) = (pair[0].0, &pair[0].1);
        let (x1, y1) = (pair[1].0, &pair[1].1);
        if value <= x1 {
            if x1 <= x0 {
                return get(y1);
            }
            let t = (value - x0) / (x1 - x0);
            return get(y0) + t * (get(y1) - get(y0));
        }
    }
    get(&last.1)
}

/// Per-intensity RGBA, indexed by voxel value.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferLut {
    entries: Vec<[f64; 4]>,
}

impl TransferLut {
    pub fn rgba(&self, intensity: u8) -> [f64; 4] {
        self.entries[intensity as usize]
    }
}

/// Named transfer function presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColormapPreset {
    /// Warm-season range (all temperatures above freezing): emphasizes 140-255.
    Summer,
    /// Full-year range including sub-zero temperatures.
    Year,
}

impl ColormapPreset {
    /// `Year` when the extent dips below zero degrees, `Summer` otherwise.
    pub fn for_extent(extent: &Extent) -> Self {
        if extent.min < 0.0 {
            ColormapPreset::Year
        } else {
            ColormapPreset::Summer
        }
    }

    pub fn transfer_functions(self) -> TransferFunctions {
        match self {
            ColormapPreset::Summer => TransferFunctions::new(
                vec![(0.0, BLUE), (140.0, GREEN), (180.0, YELLOW), (255.0, RED)],
                vec![
                    (0.0, 0.0),
                    (140.0, 0.005),
                    (180.0, 0.006),
                    (250.0, 0.1),
                    (255.0, 0.2),
                ],
            ),
            ColormapPreset::Year => TransferFunctions::new(
                vec![(0.0, BLUE), (64.0, GREEN), (191.0, YELLOW), (255.0, RED)],
                vec![
                    (0.0, 0.0),
                    (64.0, 0.001),
                    (191.0, 0.006),
                    (250.0, 0.1),
                    (255.0, 0.5),
                ],
            ),
        }
    }
}

impl fmt::Display for ColormapPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColormapPreset::Summer => write!(f, "summer"),
            ColormapPreset::Year => write!(f, "year"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn preset_follows_extent_sign() {
        let summer = Extent::new(0.0, 40.0).unwrap();
        let year = Extent::new(-12.5, 40.0).unwrap();
        assert_eq!(ColormapPreset::for_extent(&summer), ColormapPreset::Summer);
        assert_eq!(ColormapPreset::for_extent(&year), ColormapPreset::Year);
    }

    #[test]
    fn control_points_are_hit_exactly() {
        let tf = ColormapPreset::Summer.transfer_functions();
        assert_eq!(tf.color_at(0.0), BLUE);
        assert_eq!(tf.color_at(140.0), GREEN);
        assert_eq!(tf.color_at(255.0), RED);
        assert_abs_diff_eq!(tf.opacity_at(250.0), 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(tf.opacity_at(255.0), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn interpolates_between_points() {
        let tf = ColormapPreset::Year.transfer_functions();
        let mid = tf.color_at(32.0);
        assert_abs_diff_eq!(mid[0], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(mid[1], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(mid[2], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(tf.opacity_at(252.5), 0.3, epsilon = 1e-12);
    }

    #[test]
    fn lut_covers_every_intensity() {
        let lut = ColormapPreset::Summer.transfer_functions().lookup_table();
        assert_eq!(lut.rgba(0), [0.0, 0.0, 1.0, 0.0]);
        assert_abs_diff_eq!(lut.rgba(255)[3], 0.2, epsilon = 1e-12);
        assert!(lut.rgba(200)[3] > lut.rgba(150)[3]);
    }

    #[test]
    fn unsorted_points_are_sorted() {
        let tf = TransferFunctions::new(vec![(255.0, RED), (0.0, BLUE)], vec![(10.0, 1.0), (0.0, 0.0)]);
        assert_eq!(tf.color_points()[0].0, 0.0);
        assert_abs_diff_eq!(tf.opacity_at(5.0), 0.5, epsilon = 1e-12);
    }
}

// src/render/transfer.rs
