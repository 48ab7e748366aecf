// src/data_analysis/spline_zoom.rs

//! Separable B-spline upsampling of small 3D lattices.
//!
//! The output along each axis has `n * factor` samples and output index `o` reads
//! the source coordinate `o * (n - 1) / (out - 1)`, so the first and last output
//! samples sit exactly on the first and last input samples. Orders 2 and 3 are
//! interpolating splines: the input is first converted to B-spline coefficients
//! with a recursive prefilter, using mirror boundary extension
//! (`x[-k] = x[k]`, `x[n-1+k] = x[n-1-k]`).

use ndarray::{Array3, Axis, Zip};

use crate::error::{Result, VizError};

/// Interpolation degree of the zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplineOrder {
    Nearest,
    Linear,
    Quadratic,
    Cubic,
}

impl SplineOrder {
    pub fn degree(self) -> u8 {
        match self {
            SplineOrder::Nearest => 0,
            SplineOrder::Linear => 1,
            SplineOrder::Quadratic => 2,
            SplineOrder::Cubic => 3,
        }
    }

    /// Poles of the recursive prefilter. Empty for orders that need none.
    fn poles(self) -> &'static [f64] {
        // sqrt(8) - 3 and sqrt(3) - 2
        const QUADRATIC_POLE: f64 = -0.171_572_875_253_809_9;
        const CUBIC_POLE: f64 = -0.267_949_192_431_122_7;
        match self {
            SplineOrder::Nearest | SplineOrder::Linear => &[],
            SplineOrder::Quadratic => &[QUADRATIC_POLE],
            SplineOrder::Cubic => &[CUBIC_POLE],
        }
    }

    /// Input taps and weights for one source coordinate.
    fn taps(self, t: f64, len: usize) -> Vec<(usize, f64)> {
        match self {
            SplineOrder::Nearest => {
                let i = (t + 0.5).floor() as isize;
                vec![(mirror_index(i, len), 1.0)]
            }
            SplineOrder::Linear => {
                let i = t.floor();
                let u = t - i;
                let i = i as isize;
                vec![
                    (mirror_index(i, len), 1.0 - u),
                    (mirror_index(i + 1, len), u),
                ]
            }
            SplineOrder::Quadratic => {
                let i = (t + 0.5).floor();
                let u = t - i;
                let i = i as isize;
                vec![
                    (mirror_index(i - 1, len), 0.5 * (0.5 - u) * (0.5 - u)),
                    (mirror_index(i, len), 0.75 - u * u),
                    (mirror_index(i + 1, len), 0.5 * (0.5 + u) * (0.5 + u)),
                ]
            }
            SplineOrder::Cubic => {
                let i = t.floor();
                let u = t - i;
                let i = i as isize;
                let one_minus = 1.0 - u;
                vec![
                    (mirror_index(i - 1, len), one_minus * one_minus * one_minus / 6.0),
                    (
                        mirror_index(i, len),
                        (4.0 - 6.0 * u * u + 3.0 * u * u * u) / 6.0,
                    ),
                    (
                        mirror_index(i + 1, len),
                        (1.0 + 3.0 * u + 3.0 * u * u - 3.0 * u * u * u) / 6.0,
                    ),
                    (mirror_index(i + 2, len), u * u * u / 6.0),
                ]
            }
        }
    }
}

impl TryFrom<u8> for SplineOrder {
    type Error = VizError;

    fn try_from(order: u8) -> Result<Self> {
        match order {
            0 => Ok(SplineOrder::Nearest),
            1 => Ok(SplineOrder::Linear),
            2 => Ok(SplineOrder::Quadratic),
            3 => Ok(SplineOrder::Cubic),
            _ => Err(VizError::invalid_config(format!(
                "unsupported zoom order {} (expected 0-3)",
                order
            ))),
        }
    }
}

/// Output shape of `zoom` for an input shape.
pub fn zoom_shape(shape: [usize; 3], factor: usize) -> [usize; 3] {
    shape.map(|n| n * factor)
}

/// Upsamples `input` by an integer `factor` along every axis.
pub fn zoom(input: &Array3<f64>, factor: usize, order: SplineOrder) -> Array3<f64> {
    let (n0, n1, n2) = input.dim();
    let out_shape = zoom_shape([n0, n1, n2], factor);

    let mut coefficients = input.to_owned();
    if !order.poles().is_empty() {
        for axis in 0..3 {
            for mut lane in coefficients.lanes_mut(Axis(axis)) {
                let mut line = lane.to_vec();
                prefilter_line(&mut line, order.poles());
                lane.assign(&ndarray::ArrayView1::from(&line));
            }
        }
    }

    let mut current = coefficients;
    for (axis, &out_len) in out_shape.iter().enumerate() {
        let in_len = current.len_of(Axis(axis));
        let taps: Vec<Vec<(usize, f64)>> = (0..out_len)
            .map(|o| order.taps(source_coordinate(o, in_len, out_len), in_len))
            .collect();
        current = resample_axis(&current, axis, &taps);
    }
    current
}

/// Source coordinate read by output sample `o`.
fn source_coordinate(o: usize, in_len: usize, out_len: usize) -> f64 {
    if out_len <= 1 || in_len <= 1 {
        0.0
    } else {
        o as f64 * (in_len - 1) as f64 / (out_len - 1) as f64
    }
}

/// Folds an out-of-range index back into `[0, len)` by mirroring about the end samples.
fn mirror_index(i: isize, len: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    let period = 2 * (len as isize - 1);
    let mut k = i.rem_euclid(period);
    if k >= len as isize {
        k = period - k;
    }
    k as usize
}

fn resample_axis(input: &Array3<f64>, axis: usize, taps: &[Vec<(usize, f64)>]) -> Array3<f64> {
    let mut shape = input.raw_dim();
    shape[axis] = taps.len();
    let mut output = Array3::<f64>::zeros(shape);
    for (o, weights) in taps.iter().enumerate() {
        let mut out_slice = output.index_axis_mut(Axis(axis), o);
        for &(i, w) in weights {
            if w != 0.0 {
                out_slice.scaled_add(w, &input.index_axis(Axis(axis), i));
            }
        }
    }
    output
}

/// In-place conversion of samples to B-spline coefficients (mirror boundary).
fn prefilter_line(c: &mut [f64], poles: &[f64]) {
    let n = c.len();
    if n < 2 {
        return;
    }
    let gain: f64 = poles.iter().map(|&z| (1.0 - z) * (1.0 - 1.0 / z)).product();
    for v in c.iter_mut() {
        *v *= gain;
    }
    for &z in poles {
        c[0] = causal_initial_value(c, z);
        for k in 1..n {
            c[k] += z * c[k - 1];
        }
        c[n - 1] = anticausal_initial_value(c, z);
        for k in (0..n - 1).rev() {
            c[k] = z * (c[k + 1] - c[k]);
        }
    }
}

fn causal_initial_value(c: &[f64], z: f64) -> f64 {
    let n = c.len();
    let period = 2 * n - 2;
    let mut zk = 1.0;
    let mut sum = 0.0;
    for k in 0..period {
        let idx = if k < n { k } else { period - k };
        sum += zk * c[idx];
        zk *= z;
    }
    sum / (1.0 - zk)
}

fn anticausal_initial_value(c: &[f64], z: f64) -> f64 {
    let n = c.len();
    (z / (z * z - 1.0)) * (c[n - 1] + z * c[n - 2])
}

/// Minimum and maximum of a zoomed block, ignoring NaN.
pub fn value_range(values: &Array3<f64>) -> Option<(f64, f64)> {
    let mut range: Option<(f64, f64)> = None;
    Zip::from(values).for_each(|&v| {
        if v.is_nan() {
            return;
        }
        range = Some(match range {
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
            None => (v, v),
        });
    });
    range
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::Array3;

    fn ramp_lattice() -> Array3<f64> {
        Array3::from_shape_fn((2, 5, 2), |(x, y, z)| (x * 100 + y * 10 + z) as f64)
    }

    #[test]
    fn output_shape_is_scaled() {
        let zoomed = zoom(&ramp_lattice(), 4, SplineOrder::Quadratic);
        assert_eq!(zoomed.dim(), (8, 20, 8));
        assert_eq!(zoom_shape([2, 5, 2], 50), [100, 250, 100]);
    }

    #[test]
    fn constant_input_stays_constant() {
        let input = Array3::from_elem((2, 5, 2), 127.5);
        for order in [
            SplineOrder::Nearest,
            SplineOrder::Linear,
            SplineOrder::Quadratic,
            SplineOrder::Cubic,
        ] {
            let zoomed = zoom(&input, 5, order);
            for &v in zoomed.iter() {
                assert_abs_diff_eq!(v, 127.5, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn corners_reproduce_input() {
        let input = ramp_lattice();
        for order in [SplineOrder::Linear, SplineOrder::Quadratic, SplineOrder::Cubic] {
            let zoomed = zoom(&input, 6, order);
            let (a, b, c) = zoomed.dim();
            assert_abs_diff_eq!(zoomed[[0, 0, 0]], input[[0, 0, 0]], epsilon = 1e-9);
            assert_abs_diff_eq!(zoomed[[a - 1, 0, 0]], input[[1, 0, 0]], epsilon = 1e-9);
            assert_abs_diff_eq!(zoomed[[0, b - 1, 0]], input[[0, 4, 0]], epsilon = 1e-9);
            assert_abs_diff_eq!(zoomed[[a - 1, b - 1, c - 1]], input[[1, 4, 1]], epsilon = 1e-9);
        }
    }

    #[test]
    fn prefiltered_spline_interpolates_samples() {
        // Quadratic coefficients weighted 1/8, 3/4, 1/8 must give back the samples.
        let samples = [3.0, -1.0, 7.5, 2.0, 0.0];
        let mut coefficients = samples.to_vec();
        prefilter_line(&mut coefficients, SplineOrder::Quadratic.poles());
        let n = samples.len();
        for k in 0..n {
            let left = coefficients[mirror_index(k as isize - 1, n)];
            let right = coefficients[mirror_index(k as isize + 1, n)];
            let value = 0.125 * left + 0.75 * coefficients[k] + 0.125 * right;
            assert_abs_diff_eq!(value, samples[k], epsilon = 1e-9);
        }
    }

    #[test]
    fn linear_zoom_is_monotonic_along_ramp() {
        let zoomed = zoom(&ramp_lattice(), 10, SplineOrder::Linear);
        let column: Vec<f64> = zoomed.slice(ndarray::s![0, .., 0]).to_vec();
        assert!(column.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn quadratic_zoom_can_overshoot() {
        // A single spike makes the interpolating spline ring below zero.
        let mut input = Array3::<f64>::zeros((2, 5, 2));
        input[[0, 2, 0]] = 100.0;
        let zoomed = zoom(&input, 10, SplineOrder::Quadratic);
        let (lo, hi) = value_range(&zoomed).unwrap();
        assert!(lo < 0.0);
        assert!(hi > 90.0 && hi <= 100.0);
    }

    #[test]
    fn mirror_index_folds() {
        assert_eq!(mirror_index(-1, 5), 1);
        assert_eq!(mirror_index(5, 5), 3);
        assert_eq!(mirror_index(6, 5), 2);
        assert_eq!(mirror_index(-1, 2), 1);
        assert_eq!(mirror_index(2, 2), 0);
        assert_eq!(mirror_index(7, 1), 0);
    }

    #[test]
    fn order_conversion() {
        assert_eq!(SplineOrder::try_from(2).unwrap(), SplineOrder::Quadratic);
        assert_eq!(SplineOrder::Cubic.degree(), 3);
        assert!(SplineOrder::try_from(4).is_err());
    }
}

// src/data_analysis/spline_zoom.rs
