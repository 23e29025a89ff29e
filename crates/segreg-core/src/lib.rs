//! Image geometry, sampling and filtering primitives.
//!
//! Images live in burn tensors for whole-volume filtering and are read back
//! into host [`VoxelBuffer`]s for point-wise sampling.

pub mod error;
pub mod filter;
pub mod image;
pub mod interpolation;
pub mod sampler;
pub mod spatial;

pub use error::{ImageError, Result};
pub use image::{Image, ImageMetadata};
pub use interpolation::{Interpolation, Interpolator};
pub use sampler::VoxelBuffer;
pub use spatial::{Direction, GridIndex, Point, Spacing, Vector};
