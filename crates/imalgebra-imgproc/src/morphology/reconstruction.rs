use imalgebra_image::PixelArray;

use super::{
    binary_geodesic_dilation, geodesic_erosion, BoundaryPolicy, MorphologyError,
    StructuringElement,
};

/// Result of a morphological reconstruction.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconstruction {
    /// The last computed array.
    pub array: PixelArray<bool>,
    /// Number of geodesic passes performed.
    pub iterations: usize,
    /// Whether the last pass left the array unchanged.
    pub converged: bool,
}

fn iterate<F>(
    marker: &PixelArray<bool>,
    max_iterations: usize,
    step: F,
) -> Result<Reconstruction, MorphologyError>
where
    F: Fn(&PixelArray<bool>) -> Result<PixelArray<bool>, MorphologyError>,
{
    let mut current = marker.clone();
    for iteration in 1..=max_iterations {
        let next = step(&current)?;
        if log::log_enabled!(log::Level::Trace) {
            let changed = next
                .as_slice()
                .iter()
                .zip(current.as_slice())
                .filter(|(a, b)| a != b)
                .count();
            log::trace!("reconstruction pass {iteration}: {changed} cells changed");
        }
        if next == current {
            return Ok(Reconstruction {
                array: next,
                iterations: iteration,
                converged: true,
            });
        }
        current = next;
    }

    Ok(Reconstruction {
        array: current,
        iterations: max_iterations,
        converged: false,
    })
}

/// Reconstruction by dilation: repeat the binary geodesic dilation of `marker`
/// under `mask` until it stabilizes or `max_iterations` passes have run.
///
/// # Errors
///
/// Returns [`MorphologyError::DimensionMismatch`] if `mask` and `marker` differ in shape.
///
/// # Example
///
/// ```rust
/// use imalgebra_image::{ArrayShape, PixelArray};
/// use imalgebra_imgproc::morphology::{
///     reconstruct_by_dilation, BoundaryPolicy, SeShape, StructuringElement,
/// };
///
/// let mask = PixelArray::from_grid_2d(6, 1, vec![true, true, true, false, true, true]).unwrap();
/// let mut marker = PixelArray::from_shape_val(ArrayShape::new_2d(6, 1), false);
/// marker.set(0, 0, 0, 0, 0, true).unwrap();
/// let se = StructuringElement::new(SeShape::HorizontalLine { length: 3 }).unwrap();
///
/// let rec = reconstruct_by_dilation(&marker, &mask, &se, BoundaryPolicy::Ignore, 10).unwrap();
/// assert!(rec.converged);
/// assert_eq!(rec.array.as_slice(), &[true, true, true, false, false, false]);
/// ```
pub fn reconstruct_by_dilation(
    marker: &PixelArray<bool>,
    mask: &PixelArray<bool>,
    se: &StructuringElement,
    policy: BoundaryPolicy,
    max_iterations: usize,
) -> Result<Reconstruction, MorphologyError> {
    iterate(marker, max_iterations, |current| {
        binary_geodesic_dilation(current, mask, se, policy)
    })
}

/// Reconstruction by erosion: repeat the geodesic erosion of `marker` above
/// `mask` until it stabilizes or `max_iterations` passes have run.
///
/// # Errors
///
/// Returns [`MorphologyError::DimensionMismatch`] if `mask` and `marker` differ in shape.
pub fn reconstruct_by_erosion(
    marker: &PixelArray<bool>,
    mask: &PixelArray<bool>,
    se: &StructuringElement,
    policy: BoundaryPolicy,
    max_iterations: usize,
) -> Result<Reconstruction, MorphologyError> {
    iterate(marker, max_iterations, |current| {
        geodesic_erosion(current, mask, se, policy)
    })
}
