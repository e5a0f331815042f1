use imalgebra_image::PixelArray;

use super::{BandGrouping, Extremum, MorphologyError, VectorialOrdering};

/// Pointwise infimum of two arrays of the same shape under `ordering`.
///
/// A cell is present in the output only if it is present in both inputs;
/// absent cells hold `T::default()`.
///
/// # Errors
///
/// Returns [`MorphologyError::DimensionMismatch`] if the shapes differ.
pub fn minimum<T, O>(
    a: &PixelArray<T>,
    b: &PixelArray<T>,
    ordering: &O,
    grouping: BandGrouping,
) -> Result<PixelArray<T>, MorphologyError>
where
    T: Copy + Default,
    O: VectorialOrdering<T> + ?Sized,
{
    pointwise(a, b, ordering, grouping, Extremum::Minimum)
}

/// Pointwise supremum of two arrays of the same shape under `ordering`.
///
/// # Errors
///
/// Returns [`MorphologyError::DimensionMismatch`] if the shapes differ.
pub fn maximum<T, O>(
    a: &PixelArray<T>,
    b: &PixelArray<T>,
    ordering: &O,
    grouping: BandGrouping,
) -> Result<PixelArray<T>, MorphologyError>
where
    T: Copy + Default,
    O: VectorialOrdering<T> + ?Sized,
{
    pointwise(a, b, ordering, grouping, Extremum::Maximum)
}

fn pointwise<T, O>(
    a: &PixelArray<T>,
    b: &PixelArray<T>,
    ordering: &O,
    grouping: BandGrouping,
    extremum: Extremum,
) -> Result<PixelArray<T>, MorphologyError>
where
    T: Copy + Default,
    O: VectorialOrdering<T> + ?Sized,
{
    if a.shape() != b.shape() {
        return Err(MorphologyError::DimensionMismatch(format!(
            "pointwise operands differ: {} vs {}",
            a.shape(),
            b.shape()
        )));
    }

    let shape = a.shape();
    let mut dst = a.empty_like(T::default());
    if shape.numel() == 0 {
        return Ok(dst);
    }

    let band_len = shape.numel() / shape.bands;
    let (width, groups_per_pixel) = match grouping {
        BandGrouping::PerBand => (1, shape.bands),
        BandGrouping::WholePixel => (shape.bands, 1),
    };

    let mut present = vec![true; shape.numel()];
    let mut acc = vec![T::default(); width];
    let mut other = vec![T::default(); width];
    let mut offsets = Vec::with_capacity(width);

    let data = dst.as_slice_mut();
    for i in 0..band_len {
        for g in 0..groups_per_pixel {
            offsets.clear();
            offsets.extend((g * width..(g + 1) * width).map(|band| band * band_len + i));

            if !offsets
                .iter()
                .all(|&off| a.is_present_at(off) && b.is_present_at(off))
            {
                offsets.iter().for_each(|&off| present[off] = false);
                continue;
            }

            for (k, &off) in offsets.iter().enumerate() {
                acc[k] = a.as_slice()[off];
                other[k] = b.as_slice()[off];
            }
            match extremum {
                Extremum::Minimum => ordering.min_in_place(&mut acc, &other),
                Extremum::Maximum => ordering.max_in_place(&mut acc, &other),
            }
            for (k, &off) in offsets.iter().enumerate() {
                data[off] = acc[k];
            }
        }
    }

    if a.has_presence_mask() || b.has_presence_mask() {
        dst.presence_mut().copy_from_slice(&present);
    }

    Ok(dst)
}

/// Logical complement of a binary array. Absent cells stay `false`.
pub fn complement(src: &PixelArray<bool>) -> PixelArray<bool> {
    let mut dst = src.map(|v| !v);
    if src.has_presence_mask() {
        for (off, v) in dst.as_slice_mut().iter_mut().enumerate() {
            if !src.is_present_at(off) {
                *v = false;
            }
        }
    }
    dst
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morphology::{LexicographicOrdering, MarginalOrdering};
    use imalgebra_image::ArrayShape;

    #[test]
    fn test_binary_min_max() -> Result<(), MorphologyError> {
        let a = PixelArray::from_grid_2d(4, 1, vec![true, true, false, false])?;
        let b = PixelArray::from_grid_2d(4, 1, vec![true, false, true, false])?;
        let lo = minimum(&a, &b, &LexicographicOrdering, BandGrouping::PerBand)?;
        let hi = maximum(&a, &b, &LexicographicOrdering, BandGrouping::PerBand)?;
        assert_eq!(lo.as_slice(), &[true, false, false, false]);
        assert_eq!(hi.as_slice(), &[true, true, true, false]);
        Ok(())
    }

    #[test]
    fn test_whole_pixel() -> Result<(), MorphologyError> {
        // pixels a = (1, 9), (4, 0); b = (2, 0), (3, 5)
        let shape = ArrayShape::new(2, 1, 1, 1, 2);
        let a = PixelArray::new(shape, vec![1u8, 4, 9, 0])?;
        let b = PixelArray::new(shape, vec![2u8, 3, 0, 5])?;

        let lex = minimum(&a, &b, &LexicographicOrdering, BandGrouping::WholePixel)?;
        assert_eq!(lex.as_slice(), &[1, 3, 9, 5]);

        let marginal = minimum(&a, &b, &MarginalOrdering, BandGrouping::WholePixel)?;
        assert_eq!(marginal.as_slice(), &[1, 3, 0, 0]);
        Ok(())
    }

    #[test]
    fn test_presence_is_intersected() -> Result<(), MorphologyError> {
        let a = PixelArray::from_grid_2d(2, 1, vec![true, true])?;
        let mut b = a.clone();
        b.set_present(1, 0, 0, 0, 0, false)?;
        let out = maximum(&a, &b, &LexicographicOrdering, BandGrouping::PerBand)?;
        assert_eq!(out.as_slice(), &[true, false]);
        assert!(!out.is_present(1, 0, 0, 0, 0));
        Ok(())
    }

    #[test]
    fn test_shape_mismatch() {
        let a = PixelArray::from_shape_val(ArrayShape::new_2d(2, 2), false);
        let b = PixelArray::from_shape_val(ArrayShape::new_2d(2, 3), false);
        let res = minimum(&a, &b, &LexicographicOrdering, BandGrouping::PerBand);
        assert!(matches!(res, Err(MorphologyError::DimensionMismatch(_))));
    }

    #[test]
    fn test_complement() -> Result<(), MorphologyError> {
        let mut a = PixelArray::from_grid_2d(3, 1, vec![true, false, false])?;
        a.set_present(2, 0, 0, 0, 0, false)?;
        let c = complement(&a);
        assert_eq!(c.as_slice(), &[false, true, false]);
        assert!(!c.is_present(2, 0, 0, 0, 0));
        Ok(())
    }
}
