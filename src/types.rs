// src/types.rs
// Type aliases shared across the pipeline

use crate::constants::{LATTICE_DIM, LEVELS, PROBES_PER_LEVEL, PROBE_COUNT};
use ndarray::Array3;

// The lattice layout is tied to the physical probe topology.
const _: () = assert!(
    LEVELS * PROBES_PER_LEVEL == PROBE_COUNT,
    "every probe must belong to exactly one level"
);
const _: () = assert!(
    LATTICE_DIM[0] * LATTICE_DIM[2] == PROBES_PER_LEVEL,
    "each level is a 2x2 horizontal arrangement"
);

/// Probe temperatures of one reading, indexed by probe column (T1 at 0).
pub type ProbeValues = [f64; PROBE_COUNT];

/// Column labels of the probe slots, in file order.
pub type ProbeColumns = [String; PROBE_COUNT];

/// Raw readings of one level, in corner order.
pub type LevelReadings = [f64; PROBES_PER_LEVEL];

/// Raw readings of every level, indexed by level (level 0 owns T1..T4).
pub type AllLevelReadings = [LevelReadings; LEVELS];

/// Scalar lattice in (x, level, z) order. Temperatures or scaled intensities.
pub type Lattice = Array3<f64>;

/// Dense 8-bit intensity voxels handed to the renderer.
pub type IntensityVolume = Array3<u8>;

// src/types.rs
