// src/data_analysis/volume.rs

use ndarray::{s, Array3, ArrayView3, Zip};
use tracing::debug;

use crate::constants::{INTENSITY_MAX, LATTICE_DIM};
use crate::data_analysis::extents::LinearScale;
use crate::data_analysis::lattice::LatticeSample;
use crate::data_analysis::spline_zoom::{self, SplineOrder};
use crate::error::{Result, VizError};
use crate::types::IntensityVolume;

/// Placement of the zoomed block inside the target volume, in voxels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockBounds {
    pub offset: [usize; 3],
    pub dim: [usize; 3],
}

impl BlockBounds {
    /// Centers a block of `dim` inside `volume_dim`. `None` when it does not fit.
    pub fn centered(dim: [usize; 3], volume_dim: [usize; 3]) -> Option<Self> {
        if dim.iter().zip(volume_dim.iter()).any(|(d, v)| d > v) {
            return None;
        }
        let offset = std::array::from_fn(|axis| (volume_dim[axis] - dim[axis]) / 2);
        Some(Self { offset, dim })
    }

    /// One past the last voxel of the block along each axis.
    pub fn end(&self) -> [usize; 3] {
        std::array::from_fn(|axis| self.offset[axis] + self.dim[axis])
    }

    pub fn contains(&self, index: [usize; 3]) -> bool {
        let end = self.end();
        (0..3).all(|axis| index[axis] >= self.offset[axis] && index[axis] < end[axis])
    }
}

/// Turns lattice samples into the fixed-shape intensity volume.
///
/// Owns the voxel buffer; every frame overwrites only the block region, so
/// voxels outside it stay zero for the lifetime of the synthesizer.
#[derive(Debug, Clone)]
pub struct VolumeSynthesizer {
    scale: LinearScale,
    zoom_factor: usize,
    order: SplineOrder,
    volume: IntensityVolume,
    bounds: BlockBounds,
}

impl VolumeSynthesizer {
    pub fn new(
        scale: LinearScale,
        zoom_factor: usize,
        order: SplineOrder,
        volume_dim: [usize; 3],
    ) -> Result<Self> {
        if zoom_factor == 0 {
            return Err(VizError::invalid_config("zoom factor must be at least 1"));
        }
        let block_dim = spline_zoom::zoom_shape(LATTICE_DIM, zoom_factor);
        let bounds = BlockBounds::centered(block_dim, volume_dim).ok_or_else(|| {
            VizError::invalid_config(format!(
                "zoomed block {:?} does not fit volume {:?}",
                block_dim, volume_dim
            ))
        })?;
        debug!(
            "Volume {:?}, block {:?} at offset {:?}",
            volume_dim, bounds.dim, bounds.offset
        );
        Ok(Self {
            scale,
            zoom_factor,
            order,
            volume: Array3::zeros(volume_dim),
            bounds,
        })
    }

    pub fn bounds(&self) -> BlockBounds {
        self.bounds
    }

    pub fn scale(&self) -> &LinearScale {
        &self.scale
    }

    pub fn volume(&self) -> ArrayView3<'_, u8> {
        self.volume.view()
    }

    /// Scales, zooms and copies one sample into the volume.
    pub fn synthesize(&mut self, sample: &LatticeSample) -> ArrayView3<'_, u8> {
        let scaled = sample.lattice.mapv(|t| self.scale.apply(t));
        let zoomed = spline_zoom::zoom(&scaled, self.zoom_factor, self.order);

        let [x0, y0, z0] = self.bounds.offset;
        let [x1, y1, z1] = self.bounds.end();
        let mut block = self.volume.slice_mut(s![x0..x1, y0..y1, z0..z1]);
        Zip::from(&mut block).and(&zoomed).for_each(|voxel, &value| {
            *voxel = value.clamp(0.0, INTENSITY_MAX).round() as u8;
        });
        self.volume.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_analysis::extents::Extent;
    use chrono::NaiveDate;
    use ndarray::Array3;

    fn sample_of(lattice: Array3<f64>) -> LatticeSample {
        LatticeSample {
            lattice,
            levels: [[0.0; 4]; 5],
            timestamp: NaiveDate::from_ymd_opt(2014, 10, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            row: 0,
        }
    }

    fn synthesizer(min: f64, max: f64, zoom: usize, dim: [usize; 3]) -> VolumeSynthesizer {
        let scale = LinearScale::from_extent(Extent::new(min, max).unwrap());
        VolumeSynthesizer::new(scale, zoom, SplineOrder::Quadratic, dim).unwrap()
    }

    #[test]
    fn block_is_centered() {
        let bounds = BlockBounds::centered([100, 250, 100], [250, 250, 250]).unwrap();
        assert_eq!(bounds.offset, [75, 0, 75]);
        assert_eq!(bounds.end(), [175, 250, 175]);
        assert!(bounds.contains([75, 0, 174]));
        assert!(!bounds.contains([74, 10, 100]));
        assert!(BlockBounds::centered([300, 1, 1], [250, 250, 250]).is_none());
    }

    #[test]
    fn oversized_block_is_rejected() {
        let scale = LinearScale::from_extent(Extent::new(0.0, 40.0).unwrap());
        assert!(VolumeSynthesizer::new(scale, 10, SplineOrder::Quadratic, [16, 16, 16]).is_err());
    }

    #[test]
    fn shape_is_fixed_for_negative_extent() {
        let mut synth = synthesizer(-30.0, -5.0, 4, [12, 24, 12]);
        let lattice = Array3::from_shape_fn((2, 5, 2), |(x, y, z)| -40.0 + (x + y + z) as f64 * 8.0);
        let volume = synth.synthesize(&sample_of(lattice));
        assert_eq!(volume.dim(), (12, 24, 12));
        assert!(volume.iter().any(|&v| v == 255));
        assert!(volume.iter().any(|&v| v == 0));
    }

    #[test]
    fn outside_block_stays_zero_across_frames() {
        let mut synth = synthesizer(0.0, 40.0, 4, [12, 24, 12]);
        let bounds = synth.bounds();
        for frame in 0..2 {
            let value = 30.0 + frame as f64;
            synth.synthesize(&sample_of(Array3::from_elem((2, 5, 2), value)));
        }
        let volume = synth.volume();
        for ((x, y, z), &v) in volume.indexed_iter() {
            if bounds.contains([x, y, z]) {
                assert_eq!(v, 198); // 31 / 40 * 255 = 197.6
            } else {
                assert_eq!(v, 0);
            }
        }
    }
}

// src/data_analysis/volume.rs
