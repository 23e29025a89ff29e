//! Error types for potential setup.
//!
//! Evaluation itself never fails: out-of-domain queries are clamped and
//! forbidden configurations are expressed as a cost. Only building an
//! evaluator (reference fields, configuration, base displacement) can go
//! wrong, and those failures are reported here.

use segreg_core::ImageError;
use thiserror::Error;

/// Main error type for potential setup.
#[derive(Error, Debug)]
pub enum PotentialError {
    /// A field required by the selected policy has not been provided.
    #[error("Missing field: {0}")]
    MissingField(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The reference segmentation does not contain a label a distance field needs.
    #[error("Reference segmentation contains no voxel with label {0}")]
    EmptyLabel(u32),

    /// Shape mismatch between volumes that must share a grid.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Volumes that must share a grid differ in origin, spacing or direction.
    #[error("Grid mismatch: {0}")]
    GridMismatch(String),

    /// Error raised by an image operation.
    #[error("Image error: {0}")]
    Image(ImageError),
}

/// Result type for potential setup.
pub type Result<T> = std::result::Result<T, PotentialError>;

impl PotentialError {
    /// Create a missing field error.
    pub fn missing_field(msg: impl Into<String>) -> Self {
        Self::MissingField(msg.into())
    }

    /// Create an invalid configuration error.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Create a grid mismatch error.
    pub fn grid_mismatch(msg: impl Into<String>) -> Self {
        Self::GridMismatch(msg.into())
    }

    /// Create a shape mismatch error.
    pub fn shape_mismatch(expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }
}

impl From<ImageError> for PotentialError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::LabelNotFound(label) => Self::EmptyLabel(label),
            other => Self::Image(other),
        }
    }
}
