//! Nearest neighbor interpolation implementation.

use super::trait_::Interpolator;
use crate::sampler::VoxelBuffer;
use crate::spatial::Point;

/// Nearest Neighbor Interpolator.
///
/// Rounds each coordinate half-up (`floor(x + 0.5)`) and clamps it to the
/// buffer extent.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighborInterpolator;

impl NearestNeighborInterpolator {
    /// Create a new nearest neighbor interpolator.
    pub fn new() -> Self {
        Self
    }
}

impl Interpolator for NearestNeighborInterpolator {
    fn evaluate_at_continuous_index<const D: usize>(
        &self,
        buffer: &VoxelBuffer<D>,
        index: &Point<D>,
    ) -> f64 {
        let size = buffer.size();
        let mut voxel = [0usize; D];
        for a in 0..D {
            let rounded = (index[a] + 0.5).floor();
            voxel[a] = rounded.clamp(0.0, (size[a] - 1) as f64) as usize;
        }
        buffer.get(voxel) as f64
    }
}
