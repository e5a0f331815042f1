//! Binary and vectorial mathematical morphology.
//!
//! Erosion is the core operator. Dilation is derived from it by duality, the
//! geodesic operators fold one pass against a mask with a pointwise extremum,
//! and reconstruction iterates the geodesic operators to a fixed point.

/// Boundary policies.
pub mod border;

/// Binary dilation by duality.
pub mod dilation;

/// Binary erosion engine and its strategies.
pub mod erosion;

/// Error types for morphological operations.
pub mod error;

/// Geodesic erosion and dilation.
pub mod geodesic;

/// Orderings of pixel vectors.
pub mod ordering;

/// Pointwise extrema and complement.
pub mod pointwise;

/// Iterated geodesic operators.
pub mod reconstruction;

/// Strategy selection.
pub mod strategy;

/// Structuring elements.
pub mod structuring;

mod van_herk;

/// Generic neighbourhood extremum over scalar bands or pixel vectors.
pub mod vectorial;

pub use border::BoundaryPolicy;
pub use dilation::{dilate, dilate_with};
pub use erosion::{erode, erode_with, ErosionOptions};
pub use error::MorphologyError;
pub use geodesic::{
    binary_geodesic_dilation, geodesic_dilation, geodesic_erosion, vectorial_geodesic_erosion,
};
pub use ordering::{
    LexicographicOrdering, MarginalOrdering, ReferenceDistanceOrdering, VectorialOrdering,
};
pub use pointwise::{complement, maximum, minimum};
pub use reconstruction::{reconstruct_by_dilation, reconstruct_by_erosion, Reconstruction};
pub use strategy::{check_strategy, select_strategy, Strategy, VAN_HERK_MIN_LENGTH};
pub use structuring::{SeShape, StructuringElement};
pub use vectorial::{
    neighbourhood_extremum, neighbourhood_extremum_with, vectorial_dilate, vectorial_erode,
    BandGrouping, Extremum,
};
