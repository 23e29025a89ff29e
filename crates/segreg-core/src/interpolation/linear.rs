//! Linear interpolation implementation.
//!
//! Multilinear interpolation over the `2^D` voxels surrounding a continuous
//! index (bilinear in 2D, trilinear in 3D).

use super::trait_::Interpolator;
use crate::sampler::VoxelBuffer;
use crate::spatial::Point;

/// Linear Interpolator.
///
/// Neighbour indices are clamped to the buffer, which makes the interpolant
/// constant beyond the outermost voxel centres.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearInterpolator;

impl LinearInterpolator {
    /// Create a new linear interpolator.
    pub fn new() -> Self {
        Self
    }
}

impl Interpolator for LinearInterpolator {
    fn evaluate_at_continuous_index<const D: usize>(
        &self,
        buffer: &VoxelBuffer<D>,
        index: &Point<D>,
    ) -> f64 {
        let size = buffer.size();
        let values = buffer.values();
        let strides = buffer.strides();

        // Floor coordinates, clamped neighbours and fractional weights per axis
        let mut lower = [0usize; D];
        let mut upper = [0usize; D];
        let mut weight = [0.0f64; D];
        for a in 0..D {
            let max = (size[a] - 1) as f64;
            let x0 = index[a].floor();
            weight[a] = index[a] - x0;
            lower[a] = x0.clamp(0.0, max) as usize;
            upper[a] = (x0 + 1.0).clamp(0.0, max) as usize;
        }

        let mut result = 0.0;
        for corner in 0..(1usize << D) {
            let mut offset = 0;
            let mut w = 1.0;
            for a in 0..D {
                if corner & (1 << a) != 0 {
                    offset += upper[a] * strides[a];
                    w *= weight[a];
                } else {
                    offset += lower[a] * strides[a];
                    w *= 1.0 - weight[a];
                }
            }
            if w != 0.0 {
                result += w * values[offset] as f64;
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Point2 = Point<2>;
    type Point3 = Point<3>;

    #[test]
    fn test_linear_interpolator_2d() {
        let buffer = VoxelBuffer::new(vec![0.0, 1.0, 2.0, 3.0], [2, 2]).unwrap();
        let interpolator = LinearInterpolator::new();

        let corner = interpolator.evaluate_at_continuous_index(&buffer, &Point2::from([1.0, 1.0]));
        assert!((corner - 3.0).abs() < 1e-9);

        let centre = interpolator.evaluate_at_continuous_index(&buffer, &Point2::from([0.5, 0.5]));
        assert!((centre - 1.5).abs() < 1e-9);

        let edge = interpolator.evaluate_at_continuous_index(&buffer, &Point2::from([0.25, 0.0]));
        assert!((edge - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_linear_interpolator_3d_gradient() {
        // value = x + 10 y + 100 z on a 3x3x3 grid
        let mut values = Vec::with_capacity(27);
        for z in 0..3 {
            for y in 0..3 {
                for x in 0..3 {
                    values.push((x + 10 * y + 100 * z) as f32);
                }
            }
        }
        let buffer = VoxelBuffer::new(values, [3, 3, 3]).unwrap();
        let interpolator = LinearInterpolator::new();

        let v = interpolator.evaluate_at_continuous_index(&buffer, &Point3::from([0.5, 1.25, 1.5]));
        assert!((v - (0.5 + 12.5 + 150.0)).abs() < 1e-6);
    }

    #[test]
    fn test_linear_interpolator_clamps_beyond_edge() {
        let buffer = VoxelBuffer::new(vec![0.0, 1.0, 2.0, 3.0], [2, 2]).unwrap();
        let interpolator = LinearInterpolator::new();
        let v = interpolator.evaluate_at_continuous_index(&buffer, &Point2::from([1.4, 0.0]));
        assert!((v - 1.0).abs() < 1e-9);
        let v = interpolator.evaluate_at_continuous_index(&buffer, &Point2::from([-0.4, 0.0]));
        assert!((v - 0.0).abs() < 1e-9);
    }
}
