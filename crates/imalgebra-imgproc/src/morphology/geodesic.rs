use imalgebra_image::PixelArray;

use super::{
    dilate, erode, maximum, minimum, vectorial_dilate, vectorial_erode, BandGrouping,
    BoundaryPolicy, LexicographicOrdering, MorphologyError, StructuringElement, VectorialOrdering,
};

fn check_mask<T, U>(src: &PixelArray<T>, mask: &PixelArray<U>) -> Result<(), MorphologyError> {
    if src.shape() != mask.shape() {
        return Err(MorphologyError::DimensionMismatch(format!(
            "geodesic mask {} does not match array {}",
            mask.shape(),
            src.shape()
        )));
    }
    Ok(())
}

/// Geodesic erosion: the pointwise maximum of `erode(src, se, policy)` and `mask`.
///
/// Iterating it from a marker above the mask reconstructs the mask by erosion.
///
/// # Errors
///
/// Returns [`MorphologyError::DimensionMismatch`] if `mask` and `src` differ in
/// shape. The check happens before any computation.
///
/// # Example
///
/// ```rust
/// use imalgebra_image::{ArrayShape, PixelArray};
/// use imalgebra_imgproc::morphology::{geodesic_erosion, BoundaryPolicy, SeShape, StructuringElement};
///
/// let src = PixelArray::from_shape_val(ArrayShape::new_2d(5, 5), true);
/// let mut mask = PixelArray::from_shape_val(ArrayShape::new_2d(5, 5), false);
/// mask.set(0, 0, 0, 0, 0, true).unwrap();
/// let se = StructuringElement::new(SeShape::Square { size: 3 }).unwrap();
///
/// let out = geodesic_erosion(&src, &mask, &se, BoundaryPolicy::Black).unwrap();
/// assert_eq!(out.get(0, 0, 0, 0, 0), Some(&true));
/// assert_eq!(out.get(4, 0, 0, 0, 0), Some(&false));
/// assert_eq!(out.get(2, 2, 0, 0, 0), Some(&true));
/// ```
pub fn geodesic_erosion(
    src: &PixelArray<bool>,
    mask: &PixelArray<bool>,
    se: &StructuringElement,
    policy: BoundaryPolicy,
) -> Result<PixelArray<bool>, MorphologyError> {
    check_mask(src, mask)?;
    let eroded = erode(src, se, policy)?;
    maximum(&eroded, mask, &LexicographicOrdering, BandGrouping::PerBand)
}

/// Binary geodesic dilation: the pointwise minimum of `dilate(src, se, policy)` and `mask`.
///
/// # Errors
///
/// Returns [`MorphologyError::DimensionMismatch`] if `mask` and `src` differ in shape.
pub fn binary_geodesic_dilation(
    src: &PixelArray<bool>,
    mask: &PixelArray<bool>,
    se: &StructuringElement,
    policy: BoundaryPolicy,
) -> Result<PixelArray<bool>, MorphologyError> {
    check_mask(src, mask)?;
    let dilated = dilate(src, se, policy)?;
    minimum(&dilated, mask, &LexicographicOrdering, BandGrouping::PerBand)
}

/// Vectorial geodesic dilation: the vectorial dilation of `src`, bounded above
/// by `mask` under the same ordering.
///
/// # Errors
///
/// Returns [`MorphologyError::DimensionMismatch`] if `mask` and `src` differ in shape.
pub fn geodesic_dilation<T, O>(
    src: &PixelArray<T>,
    mask: &PixelArray<T>,
    se: &StructuringElement,
    ordering: &O,
) -> Result<PixelArray<T>, MorphologyError>
where
    T: Copy + Default + Send + Sync,
    O: VectorialOrdering<T> + ?Sized,
{
    check_mask(src, mask)?;
    let dilated = vectorial_dilate(src, se, ordering)?;
    minimum(&dilated, mask, ordering, BandGrouping::WholePixel)
}

/// Vectorial geodesic erosion: the vectorial erosion of `src`, bounded below by `mask`.
///
/// # Errors
///
/// Returns [`MorphologyError::DimensionMismatch`] if `mask` and `src` differ in shape.
pub fn vectorial_geodesic_erosion<T, O>(
    src: &PixelArray<T>,
    mask: &PixelArray<T>,
    se: &StructuringElement,
    ordering: &O,
) -> Result<PixelArray<T>, MorphologyError>
where
    T: Copy + Default + Send + Sync,
    O: VectorialOrdering<T> + ?Sized,
{
    check_mask(src, mask)?;
    let eroded = vectorial_erode(src, se, ordering)?;
    maximum(&eroded, mask, ordering, BandGrouping::WholePixel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morphology::{MarginalOrdering, SeShape};
    use imalgebra_image::ArrayShape;

    #[test]
    fn test_mask_shape_checked_first() -> Result<(), MorphologyError> {
        let src = PixelArray::from_shape_val(ArrayShape::new_2d(4, 4), true);
        let mask = PixelArray::from_shape_val(ArrayShape::new_2d(4, 3), true);
        let se = StructuringElement::new(SeShape::Square { size: 3 })?;
        assert!(matches!(
            geodesic_erosion(&src, &mask, &se, BoundaryPolicy::Ignore),
            Err(MorphologyError::DimensionMismatch(_))
        ));
        assert!(matches!(
            binary_geodesic_dilation(&src, &mask, &se, BoundaryPolicy::Ignore),
            Err(MorphologyError::DimensionMismatch(_))
        ));
        Ok(())
    }

    #[test]
    fn test_binary_geodesic_dilation_bounded() -> Result<(), MorphologyError> {
        let mut marker = PixelArray::from_shape_val(ArrayShape::new_2d(5, 1), false);
        marker.set(0, 0, 0, 0, 0, true)?;
        let mask = PixelArray::from_grid_2d(5, 1, vec![true, true, false, true, true])?;
        let se = StructuringElement::new(SeShape::HorizontalLine { length: 3 })?;

        let out = binary_geodesic_dilation(&marker, &mask, &se, BoundaryPolicy::Ignore)?;
        assert_eq!(out.as_slice(), &[true, true, false, false, false]);
        Ok(())
    }

    #[test]
    fn test_geodesic_dilation_marginal() -> Result<(), MorphologyError> {
        let shape = ArrayShape::new(3, 1, 1, 1, 2);
        let src = PixelArray::new(shape, vec![0u8, 9, 0, 0, 0, 4])?;
        let mask = PixelArray::from_shape_val(shape, 5u8);
        let se = StructuringElement::new(SeShape::HorizontalLine { length: 3 })?;

        let out = geodesic_dilation(&src, &mask, &se, &MarginalOrdering)?;
        assert_eq!(out.as_slice(), &[5, 5, 5, 0, 4, 4]);
        Ok(())
    }

    #[test]
    fn test_vectorial_geodesic_erosion_marginal() -> Result<(), MorphologyError> {
        let shape = ArrayShape::new(3, 1, 1, 1, 1);
        let src = PixelArray::new(shape, vec![8u8, 2, 8])?;
        let mask = PixelArray::new(shape, vec![1u8, 1, 6])?;
        let se = StructuringElement::new(SeShape::HorizontalLine { length: 3 })?;

        let out = vectorial_geodesic_erosion(&src, &mask, &se, &MarginalOrdering)?;
        assert_eq!(out.as_slice(), &[2, 2, 6]);
        Ok(())
    }
}
