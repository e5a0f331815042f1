use imalgebra_image::ImageError;
use thiserror::Error;

use super::border::BoundaryPolicy;
use super::strategy::Strategy;
use crate::parallel::ParallelError;

/// Errors related to morphological operations.
#[derive(Error, Debug, PartialEq)]
pub enum MorphologyError {
    /// Array, structuring element or mask shapes are incompatible.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// The structuring element mask has no true cell.
    #[error("structuring element has no active points")]
    EmptyStructuringElement,

    /// The requested strategy cannot honour the boundary policy or the element shape.
    #[error("strategy {strategy:?} does not support policy {policy:?} with this structuring element")]
    UnsupportedOptimization {
        /// The strategy that was rejected.
        strategy: Strategy,
        /// The policy in effect.
        policy: BoundaryPolicy,
    },

    /// Error raised by the pixel array.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error raised while distributing lanes over threads.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}
