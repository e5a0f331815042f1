use imalgebra_image::PixelArray;

use super::vectorial::{substituted_extremum, Substitutes};
use super::{
    check_strategy, select_strategy, van_herk, BandGrouping, BoundaryPolicy, Extremum,
    LexicographicOrdering, MorphologyError, Strategy, StructuringElement,
};
use crate::parallel::{self, ExecutionStrategy};

/// Options of the binary erosion and dilation engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ErosionOptions {
    /// What out-of-domain and absent neighbours contribute.
    pub policy: BoundaryPolicy,
    /// Force a strategy instead of selecting one from the element shape.
    ///
    /// A strategy that cannot handle the element or the policy falls back to
    /// [`Strategy::Standard`].
    pub strategy: Option<Strategy>,
    /// How independent lanes are distributed over threads.
    pub execution: ExecutionStrategy,
}

impl ErosionOptions {
    /// Options with the given policy and everything else left to default.
    pub fn with_policy(policy: BoundaryPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }
}

/// Binary erosion of every band of `src` by `se`.
///
/// A present pixel stays `true` only if every neighbour under the translated
/// element is `true`; absent pixels are always `false`. The fastest strategy
/// for the element is selected automatically.
///
/// # Arguments
///
/// * `src` - The binary input array.
/// * `se` - The structuring element.
/// * `policy` - The boundary policy.
///
/// # Returns
///
/// A new array with the shape and presence mask of `src`.
///
/// # Errors
///
/// Returns [`MorphologyError::DimensionMismatch`] if the element spans an axis
/// the array does not have.
///
/// # Example
///
/// ```rust
/// use imalgebra_image::{ArrayShape, PixelArray};
/// use imalgebra_imgproc::morphology::{erode, BoundaryPolicy, SeShape, StructuringElement};
///
/// let src = PixelArray::from_shape_val(ArrayShape::new_2d(5, 5), true);
/// let se = StructuringElement::new(SeShape::Square { size: 3 }).unwrap();
///
/// let ignored = erode(&src, &se, BoundaryPolicy::Ignore).unwrap();
/// assert!(ignored.as_slice().iter().all(|&v| v));
///
/// let black = erode(&src, &se, BoundaryPolicy::Black).unwrap();
/// assert_eq!(black.get(0, 0, 0, 0, 0), Some(&false));
/// assert_eq!(black.get(2, 2, 0, 0, 0), Some(&true));
/// ```
pub fn erode(
    src: &PixelArray<bool>,
    se: &StructuringElement,
    policy: BoundaryPolicy,
) -> Result<PixelArray<bool>, MorphologyError> {
    erode_with(src, se, &ErosionOptions::with_policy(policy))
}

/// Binary erosion with explicit strategy and execution control.
///
/// # Errors
///
/// See [`erode`]. A thread pool that cannot be built is reported as
/// [`MorphologyError::Parallel`].
pub fn erode_with(
    src: &PixelArray<bool>,
    se: &StructuringElement,
    options: &ErosionOptions,
) -> Result<PixelArray<bool>, MorphologyError> {
    se.check_fits(src.shape())?;

    let policy = options.policy;
    let strategy = match options.strategy {
        None => select_strategy(se, policy),
        Some(requested) => match check_strategy(requested, se, policy) {
            Ok(()) => requested,
            Err(err) => {
                log::warn!("{err}, falling back to {:?}", Strategy::Standard);
                Strategy::Standard
            }
        },
    };
    log::debug!("eroding {} with {strategy:?} under {policy:?}", src.shape());

    match strategy {
        Strategy::Standard => erode_standard(src, se, policy, options.execution),
        Strategy::RectangleDecomposition => {
            erode_rectangle(src, se, policy, options.execution)
        }
        Strategy::VanHerkHorizontal => van_herk::erode_horizontal(src, se, options.execution),
        Strategy::VanHerkVertical => van_herk::erode_vertical(src, se, options.execution),
    }
}

/// Direct evaluation: binary erosion is the per-band lexicographic minimum.
///
/// Absent neighbours inside the array always land: they contribute the
/// policy value, so only offsets falling outside the array can leave a pixel
/// with its own value.
fn erode_standard(
    src: &PixelArray<bool>,
    se: &StructuringElement,
    policy: BoundaryPolicy,
    execution: ExecutionStrategy,
) -> Result<PixelArray<bool>, MorphologyError> {
    let outside = policy.erosion_fill().map(|v| [v]);
    let absent = [policy.erosion_contribution()];
    substituted_extremum(
        src,
        se,
        Substitutes {
            outside: outside.as_ref().map(|f| f.as_slice()),
            absent: Some(absent.as_slice()),
        },
        Extremum::Minimum,
        &LexicographicOrdering,
        BandGrouping::PerBand,
        execution,
    )
}

/// AND of every window `[i - origin, i - origin + length - 1]` of `contrib`,
/// positions beyond the ends contributing `outside`.
///
/// Counts of `false` cells are accumulated once so each window costs O(1).
fn window_and(
    contrib: &[bool],
    length: usize,
    origin: usize,
    outside: bool,
    zeros: &mut Vec<usize>,
    out: &mut [bool],
) {
    let len = contrib.len() as isize;
    zeros.clear();
    zeros.push(0);
    for &c in contrib {
        let last = zeros[zeros.len() - 1];
        zeros.push(last + usize::from(!c));
    }

    for (i, o) in out.iter_mut().enumerate() {
        let n = i as isize - origin as isize;
        let m = n + length as isize - 1;
        let clipped = n < 0 || m >= len;
        let lo = n.max(0) as usize;
        let hi = m.min(len - 1) as usize;
        *o = (outside || !clipped) && zeros[hi + 1] == zeros[lo];
    }
}

/// Separable erosion by a full rectangle: a row pass through the center row
/// followed by a column pass through the center column.
///
/// The row pass is evaluated for every cell, present or not, so the column
/// pass sees exactly the contributions the direct evaluation would.
fn erode_rectangle(
    src: &PixelArray<bool>,
    se: &StructuringElement,
    policy: BoundaryPolicy,
    execution: ExecutionStrategy,
) -> Result<PixelArray<bool>, MorphologyError> {
    let (min, _) = se.bounds();
    let center = se.center();
    let (width, height) = (se.width(), se.height());
    let origin_x = (center.x - min.x) as usize;
    let origin_y = (center.y - min.y) as usize;
    let outside = policy.erosion_contribution();
    let (x_dim, y_dim) = (src.x_dim(), src.y_dim());
    let plane_len = x_dim * y_dim;

    let mut rows = vec![false; src.numel()];
    parallel::for_each_lane(&mut rows, x_dim, execution, |row, lane| {
        let start = row * x_dim;
        let contrib: Vec<bool> = (start..start + lane.len())
            .map(|off| {
                if src.is_present_at(off) {
                    src.as_slice()[off]
                } else {
                    outside
                }
            })
            .collect();
        window_and(&contrib, width, origin_x, outside, &mut Vec::new(), lane);
    })?;

    let mut dst = src.empty_like(false);
    parallel::for_each_lane(dst.as_slice_mut(), plane_len, execution, |plane, lane| {
        let base = plane * plane_len;
        let mut column = vec![false; y_dim];
        let mut folded = vec![false; y_dim];
        let mut zeros = Vec::with_capacity(y_dim + 1);
        for x in 0..x_dim {
            for (y, c) in column.iter_mut().enumerate() {
                *c = rows[base + y * x_dim + x];
            }
            window_and(&column, height, origin_y, outside, &mut zeros, &mut folded);
            for (y, &v) in folded.iter().enumerate() {
                let off = base + y * x_dim + x;
                lane[y * x_dim + x] = v && src.is_present_at(off);
            }
        }
    })?;

    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morphology::SeShape;
    use imalgebra_image::{ArrayShape, Point4};

    fn all_strategies(
        src: &PixelArray<bool>,
        se: &StructuringElement,
        policy: BoundaryPolicy,
        strategies: &[Strategy],
    ) -> Result<(), MorphologyError> {
        let reference = erode_with(
            src,
            se,
            &ErosionOptions {
                policy,
                strategy: Some(Strategy::Standard),
                execution: ExecutionStrategy::Serial,
            },
        )?;
        for &strategy in strategies {
            check_strategy(strategy, se, policy)?;
            let out = erode_with(
                src,
                se,
                &ErosionOptions {
                    policy,
                    strategy: Some(strategy),
                    execution: ExecutionStrategy::Serial,
                },
            )?;
            assert_eq!(out, reference, "{strategy:?} under {policy:?}");
        }
        Ok(())
    }

    fn checkerboard(shape: ArrayShape) -> PixelArray<bool> {
        PixelArray::from_shape_fn(shape, |x, y, z, t, b| (x * 3 + y * 5 + z + t + b) % 7 != 0)
    }

    #[test]
    fn test_window_and() {
        let mut zeros = Vec::new();
        let mut out = [false; 5];
        window_and(&[true, true, false, true, true], 3, 1, true, &mut zeros, &mut out);
        assert_eq!(out, [true, false, false, false, true]);
        window_and(&[true; 5], 3, 1, false, &mut zeros, &mut out);
        assert_eq!(out, [false, true, true, true, false]);
    }

    #[test]
    fn test_cross_ignore_and_black() -> Result<(), MorphologyError> {
        let src = PixelArray::from_shape_val(ArrayShape::new_2d(5, 5), true);
        let se = StructuringElement::new(SeShape::Cross { size: 3 })?;

        let out = erode(&src, &se, BoundaryPolicy::Ignore)?;
        assert!(out.as_slice().iter().all(|&v| v));

        let out = erode(&src, &se, BoundaryPolicy::Black)?;
        for y in 0..5 {
            for x in 0..5 {
                let interior = (1..4).contains(&x) && (1..4).contains(&y);
                assert_eq!(out.get(x, y, 0, 0, 0), Some(&interior), "({x}, {y})");
            }
        }
        Ok(())
    }

    #[test]
    fn test_isolated_pixel() -> Result<(), MorphologyError> {
        let mut src = PixelArray::from_shape_val(ArrayShape::new_2d(10, 10), false);
        src.set(5, 5, 0, 0, 0, true)?;
        let se = StructuringElement::new(SeShape::Square { size: 3 })?;
        for policy in [BoundaryPolicy::Ignore, BoundaryPolicy::White, BoundaryPolicy::Black] {
            let out = erode(&src, &se, policy)?;
            assert!(out.as_slice().iter().all(|&v| !v));
        }
        Ok(())
    }

    #[test]
    fn test_rectangle_equals_standard() -> Result<(), MorphologyError> {
        let src = checkerboard(ArrayShape::new(9, 8, 2, 1, 2));
        let se = StructuringElement::rectangle(4, 3, Point4::new_2d(1, 2))?;
        for policy in [BoundaryPolicy::Ignore, BoundaryPolicy::White, BoundaryPolicy::Black] {
            all_strategies(&src, &se, policy, &[Strategy::RectangleDecomposition])?;
        }
        Ok(())
    }

    #[test]
    fn test_van_herk_equals_standard() -> Result<(), MorphologyError> {
        let src = checkerboard(ArrayShape::new(11, 10, 1, 2, 1));
        let h = StructuringElement::horizontal_line(4, 3)?;
        let v = StructuringElement::vertical_line(5, 1)?;
        for policy in [BoundaryPolicy::Ignore, BoundaryPolicy::White] {
            all_strategies(
                &src,
                &h,
                policy,
                &[Strategy::VanHerkHorizontal, Strategy::RectangleDecomposition],
            )?;
            all_strategies(
                &src,
                &v,
                policy,
                &[Strategy::VanHerkVertical, Strategy::RectangleDecomposition],
            )?;
        }
        Ok(())
    }

    #[test]
    fn test_presence_mask_all_strategies() -> Result<(), MorphologyError> {
        let mut src = checkerboard(ArrayShape::new_2d(8, 6));
        for (x, y) in [(0, 0), (3, 2), (4, 2), (7, 5), (2, 4)] {
            src.set_present(x, y, 0, 0, 0, false)?;
        }
        let rect = StructuringElement::new(SeShape::Rectangle {
            width: 3,
            height: 3,
        })?;
        let line = StructuringElement::new(SeShape::HorizontalLine { length: 3 })?;
        for policy in [BoundaryPolicy::Ignore, BoundaryPolicy::White, BoundaryPolicy::Black] {
            all_strategies(&src, &rect, policy, &[Strategy::RectangleDecomposition])?;
        }
        all_strategies(&src, &line, BoundaryPolicy::Ignore, &[Strategy::VanHerkHorizontal])?;

        let out = erode(&src, &rect, BoundaryPolicy::Ignore)?;
        assert_eq!(out.get(3, 2, 0, 0, 0), Some(&false));
        Ok(())
    }

    #[test]
    fn test_unsupported_strategy_falls_back() -> Result<(), MorphologyError> {
        let src = checkerboard(ArrayShape::new_2d(10, 3));
        let se = StructuringElement::horizontal_line(5, 2)?;
        let forced = erode_with(
            &src,
            &se,
            &ErosionOptions {
                policy: BoundaryPolicy::Black,
                strategy: Some(Strategy::VanHerkHorizontal),
                execution: ExecutionStrategy::Serial,
            },
        )?;
        assert_eq!(forced, erode(&src, &se, BoundaryPolicy::Black)?);
        Ok(())
    }

    #[test]
    fn test_element_spanning_missing_axis() -> Result<(), MorphologyError> {
        let src = PixelArray::from_shape_val(ArrayShape::new_2d(4, 4), true);
        let se = StructuringElement::from_offsets(
            [Point4::new(0, 0, 0, 0), Point4::new(0, 0, 0, 1)],
            Point4::default(),
        )?;
        let res = erode(&src, &se, BoundaryPolicy::Ignore);
        assert!(matches!(res, Err(MorphologyError::DimensionMismatch(_))));
        Ok(())
    }

    #[test]
    fn test_center_outside_element() -> Result<(), MorphologyError> {
        // every offset lies right of the center
        let src = PixelArray::from_grid_2d(4, 1, vec![true, true, false, true])?;
        let se = StructuringElement::from_offsets([Point4::new_2d(2, 0)], Point4::new_2d(0, 0))?;
        let out = erode(&src, &se, BoundaryPolicy::Ignore)?;
        // positions 2 and 3 see no neighbour and keep their own value
        assert_eq!(out.as_slice(), &[false, true, false, true]);
        Ok(())
    }

    #[test]
    fn test_absent_neighbour_lands_inside_the_array() -> Result<(), MorphologyError> {
        // the only neighbour of x = 0 is inside the array but absent
        let mut src = PixelArray::from_grid_2d(2, 1, vec![false, true])?;
        src.set_present(1, 0, 0, 0, 0, false)?;
        let se = StructuringElement::from_offsets([Point4::new_2d(1, 0)], Point4::new_2d(0, 0))?;

        for policy in [BoundaryPolicy::Ignore, BoundaryPolicy::White] {
            let out = erode(&src, &se, policy)?;
            assert_eq!(out.get(0, 0, 0, 0, 0), Some(&true), "{policy:?}");
            assert_eq!(out.get(1, 0, 0, 0, 0), Some(&false), "{policy:?}");
        }
        let out = erode(&src, &se, BoundaryPolicy::Black)?;
        assert_eq!(out.get(0, 0, 0, 0, 0), Some(&false));
        Ok(())
    }

    #[test]
    fn test_parallel_execution_matches_serial() -> Result<(), MorphologyError> {
        let src = checkerboard(ArrayShape::new(16, 12, 1, 1, 3));
        let se = StructuringElement::new(SeShape::Ellipse {
            width: 5,
            height: 3,
        })?;
        let serial = erode_with(
            &src,
            &se,
            &ErosionOptions {
                execution: ExecutionStrategy::Serial,
                ..Default::default()
            },
        )?;
        for execution in [ExecutionStrategy::ParallelLanes, ExecutionStrategy::Fixed(2)] {
            let out = erode_with(
                &src,
                &se,
                &ErosionOptions {
                    execution,
                    ..Default::default()
                },
            )?;
            assert_eq!(out, serial);
        }
        Ok(())
    }
}
