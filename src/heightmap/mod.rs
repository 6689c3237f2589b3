//! Fixed-point heightmaps

pub mod normalizer;

pub use normalizer::{
    detect_range, normalize, ElevationRange, NormalizedHeightmap, RangePolicy, RANGE_EPSILON,
};
