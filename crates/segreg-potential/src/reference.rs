//! Reference segmentation and the fields derived from it.
//!
//! [`ReferenceFields`] is built once per resolution level: the atlas label
//! volume is resampled to the working grid, distance fields are computed for
//! the labels the active policy needs, and everything is read back to host
//! buffers so that evaluation is a pure read.

use burn::tensor::backend::Backend;
use segreg_core::filter::{
    DistanceMapFilter, FieldStatistics, IsotropicResampleFilter, RescaleIntensityFilter,
    ThresholdOutsideFilter,
};
use segreg_core::interpolation::{Interpolator, LinearInterpolator, NearestNeighborInterpolator};
use segreg_core::{Image, ImageMetadata, Point, VoxelBuffer};

use crate::config::{PotentialConfig, PotentialKind};
use crate::error::{PotentialError, Result};
use crate::query::ReferenceLabel;

/// Distances above this are clamped before computing secondary statistics.
pub const DISTANCE_CEILING: f64 = 1000.0;

/// Unsigned distance field to one reference label, with its statistics.
#[derive(Debug, Clone)]
pub struct DistanceField<const D: usize> {
    buffer: VoxelBuffer<D>,
    statistics: FieldStatistics,
    label: u32,
}

impl<const D: usize> DistanceField<D> {
    pub fn new(buffer: VoxelBuffer<D>, statistics: FieldStatistics, label: u32) -> Self {
        Self {
            buffer,
            statistics,
            label,
        }
    }

    /// Compute the field and its statistics for `label` of a label image.
    ///
    /// With `clamp_statistics` the statistics are taken on the field limited
    /// to `[0, DISTANCE_CEILING]` and the mean is stored as a magnitude.
    pub fn compute<B: Backend>(labels: &Image<B, D>, label: u32, clamp_statistics: bool) -> Result<Self> {
        let field = DistanceMapFilter::<B>::new(label).apply(labels)?;
        let statistics = if clamp_statistics {
            let clamped =
                ThresholdOutsideFilter::<B>::new(0.0, DISTANCE_CEILING, DISTANCE_CEILING).apply(&field)?;
            FieldStatistics::from_image(&clamped).with_absolute_mean()
        } else {
            FieldStatistics::from_image(&field)
        };
        tracing::info!(
            label,
            mean = statistics.mean(),
            spread = statistics.spread(),
            "Distance field computed"
        );
        Ok(Self::new(field.to_buffer()?, statistics, label))
    }

    /// Distance magnitude at a continuous index.
    pub fn sample(&self, index: &Point<D>) -> f64 {
        LinearInterpolator
            .evaluate_at_continuous_index(&self.buffer, index)
            .abs()
    }

    /// Field and statistics multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        let k = factor as f32;
        Self::new(self.buffer.map(|v| v * k), self.statistics.scaled(factor), self.label)
    }

    pub fn buffer(&self) -> &VoxelBuffer<D> {
        &self.buffer
    }

    pub fn statistics(&self) -> &FieldStatistics {
        &self.statistics
    }

    /// Label the distances are measured to.
    pub fn label(&self) -> u32 {
        self.label
    }
}

/// Read-only reference data shared by every evaluation of one solve.
#[derive(Debug, Clone)]
pub struct ReferenceFields<const D: usize> {
    labels: VoxelBuffer<D>,
    metadata: ImageMetadata<D>,
    foreground: Option<DistanceField<D>>,
    secondary: Option<DistanceField<D>>,
    intensity: Option<VoxelBuffer<D>>,
}

impl<const D: usize> ReferenceFields<D> {
    /// Build the fields the configured policy needs from an atlas segmentation.
    ///
    /// # Arguments
    /// * `config` - Potential configuration; selects which fields are built
    /// * `segmentation` - Atlas label volume
    /// * `moving` - Moving intensity image on the atlas grid (anatomy-aware policy only)
    /// * `scale` - Resolution factor; `1.0` keeps the native grid
    ///
    /// # Errors
    /// Fails on an invalid scale, a missing moving image for the
    /// anatomy-aware policy, a grid mismatch between the two volumes, or a
    /// label that does not occur in the segmentation.
    pub fn build<B: Backend>(
        config: &PotentialConfig,
        segmentation: &Image<B, D>,
        moving: Option<&Image<B, D>>,
        scale: f64,
    ) -> Result<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(PotentialError::invalid_configuration(format!(
                "scale must be positive, got {}",
                scale
            )));
        }
        let labels = if scale == 1.0 {
            segmentation.clone()
        } else {
            IsotropicResampleFilter::<B>::nearest(scale).apply(segmentation)?
        };
        tracing::info!(
            input = ?segmentation.size(),
            output = ?labels.size(),
            scale,
            "Reference segmentation prepared"
        );

        let mut fields = Self {
            labels: labels.to_buffer()?,
            metadata: *labels.metadata(),
            foreground: None,
            secondary: None,
            intensity: None,
        };

        match config.kind {
            PotentialKind::Generic => {
                fields.foreground = Some(DistanceField::compute(&labels, config.foreground_label(), false)?);
                if config.label_count > 2 {
                    fields.secondary = Some(DistanceField::compute(&labels, 1, true)?);
                }
            }
            PotentialKind::AnatomyAware => {
                let moving = moving.ok_or_else(|| {
                    PotentialError::missing_field("anatomy-aware potential needs a moving intensity image")
                })?;
                if moving.shape() != segmentation.shape() {
                    return Err(PotentialError::shape_mismatch(&segmentation.shape(), &moving.shape()));
                }
                if moving.metadata() != segmentation.metadata() {
                    return Err(PotentialError::grid_mismatch(format!(
                        "moving image {:?} differs from segmentation {:?}",
                        moving.metadata(),
                        segmentation.metadata()
                    )));
                }
                let intensity = if scale == 1.0 {
                    moving.clone()
                } else {
                    IsotropicResampleFilter::<B>::linear(scale).apply(moving)?
                };
                let intensity = intensity.to_buffer()?;
                if !intensity.same_dims(&fields.labels) {
                    return Err(PotentialError::shape_mismatch(&fields.labels.dims(), &intensity.dims()));
                }
                fields.foreground = Some(DistanceField::compute(&labels, 1, false)?);
                fields.intensity = Some(intensity);
            }
            PotentialKind::Binary => {}
        }
        Ok(fields)
    }

    /// Assemble fields computed elsewhere.
    ///
    /// # Errors
    /// Fails if any field lives on a different grid than `labels`.
    pub fn from_parts(
        labels: VoxelBuffer<D>,
        metadata: ImageMetadata<D>,
        foreground: Option<DistanceField<D>>,
        secondary: Option<DistanceField<D>>,
        intensity: Option<VoxelBuffer<D>>,
    ) -> Result<Self> {
        let dims = labels.dims();
        let others = foreground
            .iter()
            .chain(secondary.iter())
            .map(|f| f.buffer().dims())
            .chain(intensity.iter().map(|b| b.dims()));
        for other in others {
            if other != dims {
                return Err(PotentialError::shape_mismatch(&dims, &other));
            }
        }
        Ok(Self {
            labels,
            metadata,
            foreground,
            secondary,
            intensity,
        })
    }

    /// Reference label at a continuous index (nearest neighbour).
    pub fn label_at(&self, index: &Point<D>) -> ReferenceLabel {
        ReferenceLabel::from_sample(
            NearestNeighborInterpolator.evaluate_at_continuous_index(&self.labels, index),
        )
    }

    /// Moving intensity at a continuous index, if an intensity image is held.
    pub fn intensity_at(&self, index: &Point<D>) -> Option<f64> {
        self.intensity
            .as_ref()
            .map(|buffer| LinearInterpolator.evaluate_at_continuous_index(buffer, index))
    }

    /// Foreground distance field rendered for inspection: distances clamped
    /// to `[0, DISTANCE_CEILING]` and rescaled to `[0, 255]`.
    pub fn foreground_distance_preview<B: Backend>(&self, device: &B::Device) -> Result<Image<B, D>> {
        let field = self
            .foreground
            .as_ref()
            .ok_or_else(|| PotentialError::missing_field("no foreground distance field"))?;
        let image = Image::<B, D>::from_buffer(field.buffer(), self.metadata, device);
        let clamped =
            ThresholdOutsideFilter::<B>::new(0.0, DISTANCE_CEILING, DISTANCE_CEILING).apply(&image)?;
        Ok(RescaleIntensityFilter::<B>::new(0.0, 255.0).apply(&clamped)?)
    }

    pub fn labels(&self) -> &VoxelBuffer<D> {
        &self.labels
    }

    pub fn metadata(&self) -> &ImageMetadata<D> {
        &self.metadata
    }

    pub fn foreground(&self) -> Option<&DistanceField<D>> {
        self.foreground.as_ref()
    }

    pub fn secondary(&self) -> Option<&DistanceField<D>> {
        self.secondary.as_ref()
    }

    pub fn intensity(&self) -> Option<&VoxelBuffer<D>> {
        self.intensity.as_ref()
    }

    /// Working grid extent along each index axis.
    pub fn size(&self) -> [usize; D] {
        self.labels.size()
    }
}
