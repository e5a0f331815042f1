use imalgebra_image::PixelArray;

use super::{
    complement, erode_with, BoundaryPolicy, ErosionOptions, MorphologyError, StructuringElement,
};

/// Binary dilation of every band of `src` by `se`.
///
/// Computed by duality as `NOT erode(NOT src, reflect(se), policy.dual())`, so
/// every erosion strategy is available to dilation as well. Absent pixels are
/// `false`.
///
/// # Errors
///
/// Same as [`super::erode`].
///
/// # Example
///
/// ```rust
/// use imalgebra_image::{ArrayShape, PixelArray};
/// use imalgebra_imgproc::morphology::{dilate, BoundaryPolicy, SeShape, StructuringElement};
///
/// let mut src = PixelArray::from_shape_val(ArrayShape::new_2d(5, 5), false);
/// src.set(2, 2, 0, 0, 0, true).unwrap();
/// let se = StructuringElement::new(SeShape::Cross { size: 3 }).unwrap();
///
/// let out = dilate(&src, &se, BoundaryPolicy::Ignore).unwrap();
/// assert_eq!(out.as_slice().iter().filter(|&&v| v).count(), 5);
/// ```
pub fn dilate(
    src: &PixelArray<bool>,
    se: &StructuringElement,
    policy: BoundaryPolicy,
) -> Result<PixelArray<bool>, MorphologyError> {
    dilate_with(src, se, &ErosionOptions::with_policy(policy))
}

/// Binary dilation with explicit strategy and execution control.
///
/// The requested strategy applies to the underlying erosion of the reflected
/// element.
pub fn dilate_with(
    src: &PixelArray<bool>,
    se: &StructuringElement,
    options: &ErosionOptions,
) -> Result<PixelArray<bool>, MorphologyError> {
    let dual = ErosionOptions {
        policy: options.policy.dual(),
        ..*options
    };
    let eroded = erode_with(&complement(src), &se.reflect(), &dual)?;
    Ok(complement(&eroded))
}
