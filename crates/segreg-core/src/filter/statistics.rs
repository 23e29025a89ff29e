//! Summary statistics of scalar fields.

use burn::tensor::backend::Backend;
use burn::tensor::ElementConversion;
use serde::{Deserialize, Serialize};

use crate::image::Image;

/// Smallest spread a field may report.
///
/// Costs divide by the spread, so a constant field must not yield zero.
pub const MIN_SPREAD: f64 = 1e-6;

/// Mean and sample standard deviation of a field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldStatistics {
    mean: f64,
    spread: f64,
}

impl FieldStatistics {
    /// Build statistics, flooring the spread at [`MIN_SPREAD`].
    pub fn new(mean: f64, spread: f64) -> Self {
        let spread = if spread.is_finite() && spread >= MIN_SPREAD {
            spread
        } else {
            tracing::warn!(spread, floor = MIN_SPREAD, "Degenerate field spread, using floor");
            MIN_SPREAD
        };
        Self { mean, spread }
    }

    /// Compute mean and sample standard deviation (`n - 1` normalisation)
    /// of every voxel of `image`.
    pub fn from_image<B: Backend, const D: usize>(image: &Image<B, D>) -> Self {
        let n: usize = image.shape().iter().product();
        let data = image.data().clone();
        let mean = data.clone().mean().into_scalar().elem::<f64>();
        let spread = if n > 1 {
            let squares = data
                .sub_scalar(mean)
                .powf_scalar(2.0)
                .sum()
                .into_scalar()
                .elem::<f64>();
            (squares / (n - 1) as f64).sqrt()
        } else {
            0.0
        };
        Self::new(mean, spread)
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample standard deviation, never below [`MIN_SPREAD`].
    pub fn spread(&self) -> f64 {
        self.spread
    }

    /// Statistics of the field multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.mean * factor, self.spread * factor.abs())
    }

    /// Same statistics with the mean replaced by its magnitude.
    pub fn with_absolute_mean(self) -> Self {
        Self {
            mean: self.mean.abs(),
            ..self
        }
    }
}
