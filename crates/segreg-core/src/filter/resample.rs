//! Isotropic resample filter.
//!
//! Resamples an image onto an isotropic grid whose spacing is the smallest
//! input spacing divided by `scale`. Axes are never resampled finer than
//! their native spacing, so `scale >= 1` leaves the grid unchanged.

use std::marker::PhantomData;

use burn::tensor::backend::Backend;
use rayon::prelude::*;

use crate::error::{ImageError, Result};
use crate::image::Image;
use crate::interpolation::Interpolation;
use crate::sampler::VoxelBuffer;
use crate::spatial::{spacing, Point, Spacing};

/// Isotropic resample filter.
///
/// Output origin and direction equal the input's. Along each axis the output
/// size is `floor(in_spacing / spacing * (n - 1)) + 1` and the spacing is then
/// refined to `in_spacing * (n - 1) / (size - 1)` so that the first and last
/// voxel centres coincide with the input's.
///
/// # Type Parameters
/// * `B` - The Burn backend
pub struct IsotropicResampleFilter<B: Backend> {
    scale: f64,
    interpolation: Interpolation,
    _b: PhantomData<B>,
}

impl<B: Backend> IsotropicResampleFilter<B> {
    /// Create a new resample filter.
    ///
    /// # Arguments
    /// * `scale` - Resolution factor; `0.5` halves the resolution of the finest axis
    /// * `interpolation` - Sampling scheme for the input image
    pub fn new(scale: f64, interpolation: Interpolation) -> Self {
        Self {
            scale,
            interpolation,
            _b: PhantomData,
        }
    }

    /// Nearest-neighbour resampling, for label volumes.
    pub fn nearest(scale: f64) -> Self {
        Self::new(scale, Interpolation::NearestNeighbor)
    }

    /// Linear resampling, for intensity images.
    pub fn linear(scale: f64) -> Self {
        Self::new(scale, Interpolation::Linear)
    }

    /// Output size (index order) and spacing for an input geometry.
    pub fn output_geometry<const D: usize>(
        &self,
        size: [usize; D],
        input_spacing: &Spacing<D>,
    ) -> ([usize; D], Spacing<D>) {
        let target = spacing::min_spacing(input_spacing) / self.scale;
        let mut out_size = size;
        let mut out_spacing = *input_spacing;
        for a in 0..D {
            let sp = input_spacing[a].max(target);
            let extent = (size[a] - 1) as f64;
            out_size[a] = (input_spacing[a] / sp * extent).floor() as usize + 1;
            out_spacing[a] = if out_size[a] > 1 {
                input_spacing[a] * extent / (out_size[a] - 1) as f64
            } else {
                sp
            };
        }
        (out_size, out_spacing)
    }

    /// Apply the filter to an image.
    ///
    /// # Errors
    /// Fails for a non-positive scale or degenerate input geometry.
    pub fn apply<const D: usize>(&self, image: &Image<B, D>) -> Result<Image<B, D>> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ImageError::invalid_parameter(format!(
                "resample scale must be positive, got {}",
                self.scale
            )));
        }
        image.metadata().validate()?;
        if self.scale == 1.0 {
            return Ok(image.clone());
        }

        let input = image.to_buffer()?;
        let (size, out_spacing) = self.output_geometry(image.size(), image.spacing());
        let input_metadata = *image.metadata();
        let inverse_direction = input_metadata.inverse_direction()?;
        let output_metadata = input_metadata.with_spacing(out_spacing);
        let interpolation = self.interpolation;

        let mut dims = size;
        dims.reverse();
        let len: usize = size.iter().product();

        let values: Vec<f32> = (0..len)
            .into_par_iter()
            .map(|offset| {
                let index = continuous_index_of(offset, &size);
                let point = output_metadata.continuous_index_to_physical_point(&index);
                let input_index = input_metadata.continuous_index_with_inverse(&inverse_direction, &point);
                interpolation.evaluate(&input, &input_index) as f32
            })
            .collect();

        tracing::info!(
            "Resampled image {:?} -> {:?} (spacing {:?})",
            image.size(),
            size,
            out_spacing.as_slice()
        );

        let output = VoxelBuffer::new(values, dims)?;
        Ok(Image::from_buffer(&output, output_metadata, &image.data().device()))
    }
}

fn continuous_index_of<const D: usize>(offset: usize, size: &[usize; D]) -> Point<D> {
    let mut rest = offset;
    let mut index = Point::<D>::origin();
    for a in 0..D {
        index[a] = (rest % size[a]) as f64;
        rest /= size[a];
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{Direction2, Point2, Spacing2, Spacing3};
    use burn::tensor::{Tensor, TensorData};
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_output_geometry_halves_resolution() {
        let filter = IsotropicResampleFilter::<TestBackend>::nearest(0.5);
        let (size, spacing) = filter.output_geometry([11, 11, 11], &Spacing3::from([1.0, 1.0, 1.0]));
        assert_eq!(size, [6, 6, 6]);
        assert!((spacing[0] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_output_geometry_never_upsamples() {
        let filter = IsotropicResampleFilter::<TestBackend>::nearest(2.0);
        let (size, spacing) = filter.output_geometry([10, 7, 5], &Spacing3::from([1.0, 1.0, 3.0]));
        assert_eq!(size, [10, 7, 5]);
        assert_eq!(spacing, Spacing3::from([1.0, 1.0, 3.0]));
    }

    #[test]
    fn test_output_geometry_anisotropic() {
        // Coarse z axis is kept while the fine axes are brought to 2.0
        let filter = IsotropicResampleFilter::<TestBackend>::nearest(0.5);
        let (size, _) = filter.output_geometry([9, 9, 5], &Spacing3::from([1.0, 1.0, 4.0]));
        assert_eq!(size, [5, 5, 5]);
    }

    #[test]
    fn test_nearest_resample_keeps_labels() {
        let device = Default::default();
        // 5x5 image (rows y), left two columns label 1, rest 0
        let mut values = vec![0.0f32; 25];
        for y in 0..5 {
            values[y * 5] = 1.0;
            values[y * 5 + 1] = 1.0;
        }
        let data = Tensor::<TestBackend, 2>::from_data(TensorData::new(values, [5, 5]), &device);
        let image = Image::new(data, Point2::origin(), Spacing2::from([1.0, 1.0]), Direction2::identity());

        let resampled = IsotropicResampleFilter::nearest(0.5).apply(&image).unwrap();
        assert_eq!(resampled.size(), [3, 3]);
        assert_eq!(resampled.spacing(), &Spacing2::from([2.0, 2.0]));

        let buffer = resampled.to_buffer().unwrap();
        for &v in buffer.values() {
            assert!(v == 0.0 || v == 1.0);
        }
        assert_eq!(buffer.get([0, 0]), 1.0);
        assert_eq!(buffer.get([2, 2]), 0.0);
    }

    #[test]
    fn test_linear_resample_with_rotated_direction() {
        let device = Default::default();
        // value = x index on a 5x5 grid
        let values: Vec<f32> = (0..25).map(|o| (o % 5) as f32).collect();
        let data = Tensor::<TestBackend, 2>::from_data(TensorData::new(values, [5, 5]), &device);
        let direction = Direction2::from_row_slice(&[0.0, -1.0, 1.0, 0.0]);
        let image = Image::new(data, Point2::from([10.0, 0.0]), Spacing2::from([1.0, 1.0]), direction);

        let resampled = IsotropicResampleFilter::linear(0.5).apply(&image).unwrap();
        assert_eq!(resampled.size(), [3, 3]);
        assert_eq!(resampled.direction(), &direction);

        let buffer = resampled.to_buffer().unwrap();
        for j in 0..3 {
            for i in 0..3 {
                assert!((buffer.get([i, j]) - 2.0 * i as f32).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_identity_scale_returns_input() {
        let device = Default::default();
        let data = Tensor::<TestBackend, 2>::ones([4, 4], &device);
        let image = Image::new(data, Point2::origin(), Spacing2::from([1.0, 1.0]), Direction2::identity());
        let resampled = IsotropicResampleFilter::linear(1.0).apply(&image).unwrap();
        assert_eq!(resampled.shape(), [4, 4]);
    }

    #[test]
    fn test_rejects_non_positive_scale() {
        let device = Default::default();
        let data = Tensor::<TestBackend, 2>::ones([4, 4], &device);
        let image = Image::new(data, Point2::origin(), Spacing2::from([1.0, 1.0]), Direction2::identity());
        assert!(IsotropicResampleFilter::nearest(0.0).apply(&image).is_err());
    }
}
