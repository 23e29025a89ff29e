//! Point-wise intensity filters.

use std::marker::PhantomData;

use burn::tensor::backend::Backend;
use burn::tensor::ElementConversion;

use crate::error::{ImageError, Result};
use crate::image::Image;

/// Replace values outside `[lower, upper]` with a constant.
pub struct ThresholdOutsideFilter<B: Backend> {
    lower: f64,
    upper: f64,
    outside_value: f64,
    _b: PhantomData<B>,
}

impl<B: Backend> ThresholdOutsideFilter<B> {
    pub fn new(lower: f64, upper: f64, outside_value: f64) -> Self {
        Self {
            lower,
            upper,
            outside_value,
            _b: PhantomData,
        }
    }

    /// Apply the filter; metadata is carried over unchanged.
    pub fn apply<const D: usize>(&self, image: &Image<B, D>) -> Result<Image<B, D>> {
        if self.lower > self.upper {
            return Err(ImageError::invalid_parameter(format!(
                "threshold lower bound {} exceeds upper bound {}",
                self.lower, self.upper
            )));
        }
        let data = image.data().clone();
        let below = data.clone().lower_elem(self.lower);
        let above = data.clone().greater_elem(self.upper);
        let out = data
            .mask_fill(below, self.outside_value)
            .mask_fill(above, self.outside_value);
        Ok(Image::from_metadata(out, *image.metadata()))
    }
}

/// Linearly map the intensity range of an image onto `[output_min, output_max]`.
pub struct RescaleIntensityFilter<B: Backend> {
    output_min: f64,
    output_max: f64,
    _b: PhantomData<B>,
}

impl<B: Backend> RescaleIntensityFilter<B> {
    pub fn new(output_min: f64, output_max: f64) -> Self {
        Self {
            output_min,
            output_max,
            _b: PhantomData,
        }
    }

    /// Apply the filter. A constant image maps to `output_min`.
    pub fn apply<const D: usize>(&self, image: &Image<B, D>) -> Result<Image<B, D>> {
        if self.output_min > self.output_max {
            return Err(ImageError::invalid_parameter(format!(
                "rescale range [{}, {}] is inverted",
                self.output_min, self.output_max
            )));
        }
        let data = image.data().clone();
        let min = data.clone().min().into_scalar().elem::<f64>();
        let max = data.clone().max().into_scalar().elem::<f64>();
        let range = max - min;

        let out = if range > 0.0 {
            let factor = (self.output_max - self.output_min) / range;
            data.sub_scalar(min).mul_scalar(factor).add_scalar(self.output_min)
        } else {
            data.zeros_like().add_scalar(self.output_min)
        };
        Ok(Image::from_metadata(out, *image.metadata()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{Direction2, Point2, Spacing2};
    use burn::tensor::{Tensor, TensorData};
    use burn_ndarray::NdArray;

    type Backend = NdArray<f32>;

    fn image(values: Vec<f32>) -> Image<Backend, 2> {
        let device = Default::default();
        let n = values.len();
        let data = Tensor::<Backend, 2>::from_data(TensorData::new(values, [1, n]), &device);
        Image::new(
            data,
            Point2::origin(),
            Spacing2::from([1.0, 1.0]),
            Direction2::identity(),
        )
    }

    fn values(image: &Image<Backend, 2>) -> Vec<f32> {
        image.to_buffer().unwrap().values().to_vec()
    }

    #[test]
    fn test_threshold_outside() {
        let input = image(vec![-5.0, 0.0, 500.0, 1000.0, 2500.0]);
        let out = ThresholdOutsideFilter::new(0.0, 1000.0, 1000.0).apply(&input).unwrap();
        assert_eq!(values(&out), vec![1000.0, 0.0, 500.0, 1000.0, 1000.0]);
    }

    #[test]
    fn test_threshold_rejects_inverted_bounds() {
        let input = image(vec![1.0]);
        assert!(ThresholdOutsideFilter::new(2.0, 1.0, 0.0).apply(&input).is_err());
    }

    #[test]
    fn test_rescale_intensity() {
        let input = image(vec![10.0, 20.0, 30.0]);
        let out = RescaleIntensityFilter::new(0.0, 255.0).apply(&input).unwrap();
        let v = values(&out);
        assert!((v[0] - 0.0).abs() < 1e-4);
        assert!((v[1] - 127.5).abs() < 1e-4);
        assert!((v[2] - 255.0).abs() < 1e-4);
    }

    #[test]
    fn test_rescale_constant_image() {
        let input = image(vec![7.0; 4]);
        let out = RescaleIntensityFilter::new(1.0, 2.0).apply(&input).unwrap();
        assert_eq!(values(&out), vec![1.0; 4]);
    }
}
