//! Error types for image construction and filtering.

use thiserror::Error;

/// Errors raised while building or filtering images and voxel buffers.
#[derive(Error, Debug)]
pub enum ImageError {
    /// Buffer length does not match the product of its dimensions.
    #[error("Buffer length {len} does not match dimensions {dims:?}")]
    LengthMismatch {
        len: usize,
        dims: Vec<usize>,
    },

    /// An axis has zero extent.
    #[error("Empty image: dimensions {0:?}")]
    EmptyImage(Vec<usize>),

    /// Direction matrix cannot be inverted.
    #[error("Direction matrix is singular")]
    SingularDirection,

    /// Spacing is not strictly positive and finite.
    #[error("Invalid spacing: {0}")]
    InvalidSpacing(String),

    /// Filter parameter out of range.
    #[error("Invalid filter parameter: {0}")]
    InvalidParameter(String),

    /// Tensor data could not be read back to the host.
    #[error("Tensor data error: {0}")]
    TensorData(String),

    /// The requested label does not occur in the label volume.
    #[error("Label {0} does not occur in the label volume")]
    LabelNotFound(u32),
}

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, ImageError>;

impl ImageError {
    /// Create an invalid parameter error.
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Create an invalid spacing error.
    pub fn invalid_spacing(msg: impl Into<String>) -> Self {
        Self::InvalidSpacing(msg.into())
    }

    /// Create a tensor data error.
    pub fn tensor_data(msg: impl Into<String>) -> Self {
        Self::TensorData(msg.into())
    }
}
