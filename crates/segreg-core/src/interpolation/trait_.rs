//! Interpolator trait for sampling values at continuous indices.

use serde::{Deserialize, Serialize};

use crate::sampler::VoxelBuffer;
use crate::spatial::Point;

/// Interpolator trait for sampling values at continuous indices.
///
/// Indices are continuous voxel coordinates in index order (`[x, y, z]`).
/// Implementations clamp neighbour lookups to the buffer, so positions
/// slightly outside the domain still produce the boundary value.
pub trait Interpolator {
    /// Sample `buffer` at a continuous index.
    fn evaluate_at_continuous_index<const D: usize>(
        &self,
        buffer: &VoxelBuffer<D>,
        index: &Point<D>,
    ) -> f64;
}

/// Interpolation scheme selector for filters that resample whole images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Interpolation {
    /// Round to the nearest voxel; used for label volumes.
    #[default]
    NearestNeighbor,
    /// Multilinear interpolation; used for intensities and scalar fields.
    Linear,
}

impl Interpolation {
    /// Sample `buffer` with the selected scheme.
    pub fn evaluate<const D: usize>(&self, buffer: &VoxelBuffer<D>, index: &Point<D>) -> f64 {
        match self {
            Self::NearestNeighbor => {
                super::NearestNeighborInterpolator.evaluate_at_continuous_index(buffer, index)
            }
            Self::Linear => super::LinearInterpolator.evaluate_at_continuous_index(buffer, index),
        }
    }
}
