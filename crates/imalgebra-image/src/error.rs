use imalgebra_tensor::TensorError;

use crate::shape::ArrayShape;

/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the data does not fit the requested shape.
    #[error("Invalid shape: {0}")]
    InvalidShape(#[from] TensorError),

    /// Error when two arrays that must share a shape do not.
    #[error("Array shapes do not match: {0} vs {1}")]
    DimensionMismatch(ArrayShape, ArrayShape),

    /// Error when a pixel coordinate lies outside the array.
    #[error("Pixel index {0:?} is out of bounds for {1}")]
    PixelIndexOutOfBounds([usize; 5], ArrayShape),

    /// Error when the number of band values does not match the array.
    #[error("Invalid number of bands: got {0}, expected {1}")]
    InvalidChannelCount(usize, usize),

    /// Error when an algorithm parameter is out of range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
