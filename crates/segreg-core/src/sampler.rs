//! Host-side voxel buffers for continuous-position sampling.
//!
//! A [`VoxelBuffer`] is an immutable, reference-counted copy of image data
//! kept on the host so that millions of single-point queries can be answered
//! without tensor dispatch. Cloning a buffer only bumps a reference count,
//! which lets many readers share one field across threads.
//!
//! # Index conventions
//! Continuous indices are ordered by index axis (`[x, y, z]`), while the
//! underlying data follows the tensor layout `[Z, Y, X]` (x fastest). The
//! valid sampling domain along axis `a` is `[-0.5, size[a] - 0.5)`, matching
//! the pixel-centred convention where voxel `i` covers `[i - 0.5, i + 0.5)`.

use std::sync::Arc;

use crate::error::{ImageError, Result};
use crate::spatial::{GridIndex, Point};

/// Immutable voxel data with its dimensions.
#[derive(Debug, Clone)]
pub struct VoxelBuffer<const D: usize> {
    values: Arc<[f32]>,
    /// Dimensions in tensor order (last axis fastest).
    dims: [usize; D],
}

impl<const D: usize> VoxelBuffer<D> {
    /// Create a buffer from row-major values with tensor-ordered dimensions.
    ///
    /// # Errors
    /// Returns an error if any axis is empty or the value count does not
    /// match the dimensions.
    pub fn new(values: Vec<f32>, dims: [usize; D]) -> Result<Self> {
        if dims.iter().any(|&n| n == 0) {
            return Err(ImageError::EmptyImage(dims.to_vec()));
        }
        let expected: usize = dims.iter().product();
        if values.len() != expected {
            return Err(ImageError::LengthMismatch {
                len: values.len(),
                dims: dims.to_vec(),
            });
        }
        Ok(Self {
            values: values.into(),
            dims,
        })
    }

    /// Buffer filled with a constant value.
    pub fn filled(value: f32, dims: [usize; D]) -> Result<Self> {
        let len = dims.iter().product();
        Self::new(vec![value; len], dims)
    }

    /// Dimensions in tensor order.
    pub fn dims(&self) -> [usize; D] {
        self.dims
    }

    /// Extent along each index axis (x first).
    pub fn size(&self) -> [usize; D] {
        let mut size = self.dims;
        size.reverse();
        size
    }

    /// Number of voxels.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; empty buffers are rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw values in tensor order.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Stride of each index axis in the flat value array.
    pub fn strides(&self) -> [usize; D] {
        let size = self.size();
        let mut strides = [1usize; D];
        for a in 1..D {
            strides[a] = strides[a - 1] * size[a - 1];
        }
        strides
    }

    /// Flat offset of an in-bounds grid index.
    pub fn offset(&self, index: GridIndex<D>) -> usize {
        let strides = self.strides();
        index.iter().zip(strides.iter()).map(|(i, s)| i * s).sum()
    }

    /// Grid index of a flat offset.
    pub fn grid_index(&self, offset: usize) -> GridIndex<D> {
        let size = self.size();
        let mut rest = offset;
        let mut index = [0usize; D];
        for a in 0..D {
            index[a] = rest % size[a];
            rest /= size[a];
        }
        index
    }

    /// Value at an integer grid index, clamping each coordinate to the buffer.
    pub fn get(&self, index: GridIndex<D>) -> f32 {
        let size = self.size();
        let mut clamped = index;
        for a in 0..D {
            clamped[a] = clamped[a].min(size[a] - 1);
        }
        self.values[self.offset(clamped)]
    }

    /// Lower bound of the valid continuous index domain on every axis.
    pub fn start_continuous_index(&self) -> Point<D> {
        Point::from([-0.5; D])
    }

    /// Exclusive upper bound of the valid continuous index domain.
    pub fn end_continuous_index(&self) -> Point<D> {
        let size = self.size();
        let mut end = Point::<D>::origin();
        for a in 0..D {
            end[a] = size[a] as f64 - 0.5;
        }
        end
    }

    /// Whether a continuous index lies inside the sampling domain.
    pub fn is_inside_buffer(&self, index: &Point<D>) -> bool {
        let start = self.start_continuous_index();
        let end = self.end_continuous_index();
        (0..D).all(|a| index[a] >= start[a] && index[a] < end[a])
    }

    /// Pull an out-of-domain continuous index back onto the boundary.
    ///
    /// Offending coordinates are moved half a voxel inside the domain
    /// (onto the centre of the outermost voxel); coordinates already in
    /// range are left untouched.
    pub fn clamp_to_buffer(&self, index: Point<D>) -> Point<D> {
        if self.is_inside_buffer(&index) {
            return index;
        }
        let start = self.start_continuous_index();
        let end = self.end_continuous_index();
        let mut clamped = index;
        for a in 0..D {
            if clamped[a] >= end[a] {
                clamped[a] = end[a] - 0.5;
            } else if clamped[a] < start[a] {
                clamped[a] = start[a] + 0.5;
            }
        }
        clamped
    }

    /// Apply a function to every value, producing a new buffer.
    pub fn map(&self, f: impl Fn(f32) -> f32) -> Self {
        Self {
            values: self.values.iter().map(|&v| f(v)).collect(),
            dims: self.dims,
        }
    }

    /// Whether two buffers have the same dimensions.
    pub fn same_dims(&self, other: &Self) -> bool {
        self.dims == other.dims
    }
}
