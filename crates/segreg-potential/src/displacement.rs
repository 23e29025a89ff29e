//! Bulk pre-displacement added to every candidate displacement.
//!
//! Displacements are expressed in voxel units of the reference grid, one
//! component per index axis (x first).

use burn::tensor::backend::Backend;
use rayon::prelude::*;
use segreg_core::interpolation::{Interpolator, LinearInterpolator};
use segreg_core::{GridIndex, Image, Point, Vector, VoxelBuffer};

use crate::error::{PotentialError, Result};

/// Dense displacement field stored as one host buffer per axis.
#[derive(Debug, Clone)]
pub struct BaseDisplacementField<const D: usize> {
    components: Vec<VoxelBuffer<D>>,
}

impl<const D: usize> BaseDisplacementField<D> {
    /// Build a field from `D` component buffers sharing one grid.
    ///
    /// # Errors
    /// Fails if the component count is not `D` or the grids differ.
    pub fn new(components: Vec<VoxelBuffer<D>>) -> Result<Self> {
        if components.len() != D {
            return Err(PotentialError::invalid_configuration(format!(
                "displacement field needs {} components, got {}",
                D,
                components.len()
            )));
        }
        let dims = components[0].dims();
        if let Some(other) = components.iter().find(|c| c.dims() != dims) {
            return Err(PotentialError::shape_mismatch(&dims, &other.dims()));
        }
        Ok(Self { components })
    }

    /// Zero displacement on a grid with tensor-ordered `dims`.
    pub fn zeros(dims: [usize; D]) -> Result<Self> {
        let zero = VoxelBuffer::filled(0.0, dims)?;
        Self::new(vec![zero; D])
    }

    /// Build a field by evaluating `f` at every grid index.
    pub fn from_fn(dims: [usize; D], f: impl Fn(GridIndex<D>) -> Vector<D>) -> Result<Self> {
        let layout = VoxelBuffer::filled(0.0, dims)?;
        let vectors: Vec<Vector<D>> = (0..layout.len()).map(|o| f(layout.grid_index(o))).collect();
        let components = (0..D)
            .map(|a| VoxelBuffer::new(vectors.iter().map(|v| v[a] as f32).collect(), dims))
            .collect::<segreg_core::Result<Vec<_>>>()?;
        Self::new(components)
    }

    /// Read `D` component images (x component first) back to the host.
    pub fn from_components<B: Backend>(images: &[Image<B, D>]) -> Result<Self> {
        let components = images
            .iter()
            .map(|image| image.to_buffer())
            .collect::<segreg_core::Result<Vec<_>>>()?;
        Self::new(components)
    }

    /// Tensor-ordered dimensions of the grid.
    pub fn dims(&self) -> [usize; D] {
        self.components[0].dims()
    }

    /// Extent along each index axis.
    pub fn size(&self) -> [usize; D] {
        self.components[0].size()
    }

    /// Displacement at a grid index; indices past the grid are clamped.
    pub fn at(&self, index: GridIndex<D>) -> Vector<D> {
        Vector::from_fn(|a, _| self.components[a].get(index) as f64)
    }

    /// Displacement at a continuous index, linearly interpolated.
    pub fn sample(&self, index: &Point<D>) -> Vector<D> {
        let interpolator = LinearInterpolator;
        Vector::from_fn(|a, _| interpolator.evaluate_at_continuous_index(&self.components[a], index))
    }

    /// Compose with a second field: `c(x) = self(x) + second(x + self(x))`.
    ///
    /// # Errors
    /// Fails if the grids differ.
    pub fn compose(&self, second: &Self) -> Result<Self> {
        if self.dims() != second.dims() {
            return Err(PotentialError::shape_mismatch(&self.dims(), &second.dims()));
        }
        let layout = &self.components[0];
        let vectors: Vec<Vector<D>> = (0..layout.len())
            .into_par_iter()
            .map(|offset| {
                let index = layout.grid_index(offset);
                let first = self.at(index);
                let mut moved = Point::<D>::origin();
                for a in 0..D {
                    moved[a] = index[a] as f64 + first[a];
                }
                first + second.sample(&moved)
            })
            .collect();

        let dims = self.dims();
        let components = (0..D)
            .map(|a| VoxelBuffer::new(vectors.iter().map(|v| v[a] as f32).collect(), dims))
            .collect::<segreg_core::Result<Vec<_>>>()?;
        Self::new(components)
    }
}
