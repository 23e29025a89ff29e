//! Image type with physical metadata and coordinate transformations.
//!
//! An [`Image`] combines tensor data (potentially on GPU) with the metadata
//! that maps voxel indices to physical coordinates. Images are the exchange
//! format between filters; point-wise consumers read them back into a
//! [`VoxelBuffer`] once and sample on the host.

use burn::tensor::backend::Backend;
use burn::tensor::{Tensor, TensorData};

use super::metadata::ImageMetadata;
use crate::error::{ImageError, Result};
use crate::sampler::VoxelBuffer;
use crate::spatial::{Direction, Point, Spacing};

/// Medical image with physical metadata.
///
/// # Type Parameters
/// * `B` - The backend (CPU or GPU) for tensor operations
/// * `D` - The dimensionality of the image (2 or 3)
///
/// # Coordinate Systems
/// * **Index Space**: voxel indices ordered `[x, y, z]`
/// * **Tensor Layout**: data dimensions ordered `[Z, Y, X]`
/// * **Physical Space**: continuous coordinates in mm or other units
///
/// # Examples
/// ```rust
/// use burn::tensor::Tensor;
/// use burn_ndarray::NdArray;
/// use segreg_core::Image;
/// use segreg_core::spatial::{Direction3, Point3, Spacing3};
///
/// type Backend = NdArray<f32>;
///
/// let device = Default::default();
/// let data = Tensor::<Backend, 3>::zeros([4, 5, 6], &device);
/// let image = Image::new(
///     data,
///     Point3::origin(),
///     Spacing3::from([1.0, 1.0, 1.0]),
///     Direction3::identity(),
/// );
/// assert_eq!(image.shape(), [4, 5, 6]);
/// assert_eq!(image.size(), [6, 5, 4]);
/// ```
#[derive(Debug, Clone)]
pub struct Image<B: Backend, const D: usize> {
    /// The voxel data, potentially on GPU.
    data: Tensor<B, D>,
    /// Origin, spacing and direction.
    metadata: ImageMetadata<D>,
}

impl<B: Backend, const D: usize> Image<B, D> {
    /// Create a new image with the given data and metadata.
    pub fn new(
        data: Tensor<B, D>,
        origin: Point<D>,
        spacing: Spacing<D>,
        direction: Direction<D>,
    ) -> Self {
        Self::from_metadata(data, ImageMetadata::new(origin, spacing, direction))
    }

    /// Create an image from data and an existing metadata value.
    pub fn from_metadata(data: Tensor<B, D>, metadata: ImageMetadata<D>) -> Self {
        Self { data, metadata }
    }

    /// Upload a host buffer into an image on `device`.
    pub fn from_buffer(
        buffer: &VoxelBuffer<D>,
        metadata: ImageMetadata<D>,
        device: &B::Device,
    ) -> Self {
        let data = TensorData::new(buffer.values().to_vec(), buffer.dims());
        Self::from_metadata(Tensor::<B, D>::from_data(data, device), metadata)
    }

    /// Read the image data back into a host buffer.
    pub fn to_buffer(&self) -> Result<VoxelBuffer<D>> {
        let values = self
            .data
            .clone()
            .into_data()
            .convert::<f32>()
            .to_vec::<f32>()
            .map_err(|e| ImageError::tensor_data(format!("{:?}", e)))?;
        VoxelBuffer::new(values, self.shape())
    }

    /// Get the image data tensor.
    pub fn data(&self) -> &Tensor<B, D> {
        &self.data
    }

    /// Get the physical-space metadata.
    pub fn metadata(&self) -> &ImageMetadata<D> {
        &self.metadata
    }

    /// Get the origin (physical coordinate of first voxel).
    pub fn origin(&self) -> &Point<D> {
        self.metadata.origin()
    }

    /// Get the spacing (physical distance between voxels).
    pub fn spacing(&self) -> &Spacing<D> {
        self.metadata.spacing()
    }

    /// Get the direction (orientation matrix).
    pub fn direction(&self) -> &Direction<D> {
        self.metadata.direction()
    }

    /// Tensor dimensions (`[Z, Y, X]` for 3D).
    pub fn shape(&self) -> [usize; D] {
        self.data.dims()
    }

    /// Extent along each index axis (`[x, y, z]` for 3D).
    pub fn size(&self) -> [usize; D] {
        let mut size = self.shape();
        size.reverse();
        size
    }

    /// Convert a continuous physical point to a continuous index.
    ///
    /// # Errors
    /// Fails if the direction matrix is singular.
    pub fn transform_physical_point_to_continuous_index(&self, point: &Point<D>) -> Result<Point<D>> {
        self.metadata.physical_point_to_continuous_index(point)
    }

    /// Convert a continuous index to a physical point.
    pub fn transform_continuous_index_to_physical_point(&self, index: &Point<D>) -> Point<D> {
        self.metadata.continuous_index_to_physical_point(index)
    }
}
