#![deny(missing_docs)]
//! Pixel array types shared by the imalgebra operators.
//!
//! A [`PixelArray`] spans five axes: two spatial axes `x` and `y`, depth `z`,
//! time `t` and the band axis. Cells may be flagged as absent through an
//! optional presence mask, which marks the irregular domain of the array.

/// five-axis pixel array representation.
pub mod array;

/// Error types for the image module.
pub mod error;

/// Coordinates and shapes.
pub mod shape;

pub use crate::array::PixelArray;
pub use crate::error::ImageError;
pub use crate::shape::{ArrayShape, Point4};
