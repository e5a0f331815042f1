use super::{BoundaryPolicy, MorphologyError, StructuringElement};

/// Shortest line for which the van Herk path is chosen automatically.
pub const VAN_HERK_MIN_LENGTH: usize = 3;

/// Algorithms computing a binary erosion. They all produce the same output
/// wherever they are applicable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Direct evaluation of every offset at every pixel.
    Standard,

    /// A row pass with the horizontal line followed by a column pass with the
    /// vertical line.
    RectangleDecomposition,

    /// Van Herk sliding window along x.
    VanHerkHorizontal,

    /// Van Herk sliding window along y.
    VanHerkVertical,
}

/// Pick the fastest strategy able to handle the element under `policy`.
///
/// # Example
///
/// ```rust
/// use imalgebra_imgproc::morphology::{
///     select_strategy, BoundaryPolicy, SeShape, Strategy, StructuringElement,
/// };
///
/// let se = StructuringElement::new(SeShape::HorizontalLine { length: 7 }).unwrap();
/// assert_eq!(select_strategy(&se, BoundaryPolicy::Ignore), Strategy::VanHerkHorizontal);
/// assert_eq!(select_strategy(&se, BoundaryPolicy::Black), Strategy::Standard);
/// ```
pub fn select_strategy(se: &StructuringElement, policy: BoundaryPolicy) -> Strategy {
    if !se.center_within_bounds() {
        log::debug!("structuring element center lies outside its bounds, no optimization");
        return Strategy::Standard;
    }

    if se.is_rectangle() && se.width() > 1 && se.height() > 1 {
        return Strategy::RectangleDecomposition;
    }

    if policy != BoundaryPolicy::Black {
        if se.is_horizontal_line() && se.width() >= VAN_HERK_MIN_LENGTH {
            return Strategy::VanHerkHorizontal;
        }
        if se.is_vertical_line() && se.height() >= VAN_HERK_MIN_LENGTH {
            return Strategy::VanHerkVertical;
        }
    }

    log::debug!(
        "no optimization for a {}x{} element with {} points under {:?}",
        se.width(),
        se.height(),
        se.len(),
        policy
    );
    Strategy::Standard
}

/// Check that `strategy` computes the exact erosion of `se` under `policy`.
///
/// # Errors
///
/// Returns [`MorphologyError::UnsupportedOptimization`] when it does not.
pub fn check_strategy(
    strategy: Strategy,
    se: &StructuringElement,
    policy: BoundaryPolicy,
) -> Result<(), MorphologyError> {
    let supported = match strategy {
        Strategy::Standard => true,
        Strategy::RectangleDecomposition => se.is_rectangle() && se.center_within_bounds(),
        Strategy::VanHerkHorizontal => {
            policy != BoundaryPolicy::Black && se.is_horizontal_line() && se.center_within_bounds()
        }
        Strategy::VanHerkVertical => {
            policy != BoundaryPolicy::Black && se.is_vertical_line() && se.center_within_bounds()
        }
    };

    if supported {
        Ok(())
    } else {
        Err(MorphologyError::UnsupportedOptimization { strategy, policy })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morphology::SeShape;
    use imalgebra_image::Point4;

    #[test]
    fn test_select_rectangle() -> Result<(), MorphologyError> {
        let se = StructuringElement::new(SeShape::Rectangle {
            width: 5,
            height: 3,
        })?;
        for policy in [
            BoundaryPolicy::Ignore,
            BoundaryPolicy::White,
            BoundaryPolicy::Black,
        ] {
            assert_eq!(select_strategy(&se, policy), Strategy::RectangleDecomposition);
        }
        Ok(())
    }

    #[test]
    fn test_select_lines() -> Result<(), MorphologyError> {
        let h = StructuringElement::horizontal_line(5, 2)?;
        let v = StructuringElement::vertical_line(5, 0)?;
        assert_eq!(select_strategy(&h, BoundaryPolicy::White), Strategy::VanHerkHorizontal);
        assert_eq!(select_strategy(&v, BoundaryPolicy::Ignore), Strategy::VanHerkVertical);
        assert_eq!(select_strategy(&v, BoundaryPolicy::Black), Strategy::Standard);

        let short = StructuringElement::horizontal_line(2, 0)?;
        assert_eq!(select_strategy(&short, BoundaryPolicy::Ignore), Strategy::Standard);
        Ok(())
    }

    #[test]
    fn test_select_standard() -> Result<(), MorphologyError> {
        let cross = StructuringElement::new(SeShape::Cross { size: 3 })?;
        assert_eq!(select_strategy(&cross, BoundaryPolicy::Ignore), Strategy::Standard);

        let off_center = StructuringElement::rectangle(3, 3, Point4::new_2d(4, 1))?;
        assert_eq!(select_strategy(&off_center, BoundaryPolicy::Ignore), Strategy::Standard);
        Ok(())
    }

    #[test]
    fn test_check_strategy() -> Result<(), MorphologyError> {
        let h = StructuringElement::horizontal_line(5, 2)?;
        check_strategy(Strategy::VanHerkHorizontal, &h, BoundaryPolicy::Ignore)?;
        check_strategy(Strategy::RectangleDecomposition, &h, BoundaryPolicy::Black)?;
        assert_eq!(
            check_strategy(Strategy::VanHerkHorizontal, &h, BoundaryPolicy::Black),
            Err(MorphologyError::UnsupportedOptimization {
                strategy: Strategy::VanHerkHorizontal,
                policy: BoundaryPolicy::Black,
            })
        );
        assert!(check_strategy(Strategy::VanHerkVertical, &h, BoundaryPolicy::Ignore).is_err());
        Ok(())
    }
}
