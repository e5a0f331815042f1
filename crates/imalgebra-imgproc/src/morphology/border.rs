/// Border handling for binary morphological operations.
///
/// The policy decides what an out-of-domain neighbour, or a neighbour flagged
/// absent by the presence mask, contributes when the structuring element
/// overlaps it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    /// Skip out-of-domain neighbours. They never force a pixel to change.
    #[default]
    Ignore,

    /// Treat out-of-domain neighbours as foreground (`true`).
    White,

    /// Treat out-of-domain neighbours as background (`false`).
    Black,
}

impl BoundaryPolicy {
    /// The policy that makes dilation the dual of erosion: `White` and `Black`
    /// swap, `Ignore` is its own dual.
    pub fn dual(self) -> Self {
        match self {
            BoundaryPolicy::Ignore => BoundaryPolicy::Ignore,
            BoundaryPolicy::White => BoundaryPolicy::Black,
            BoundaryPolicy::Black => BoundaryPolicy::White,
        }
    }

    /// The value an erosion substitutes for a missing neighbour, or `None` when
    /// the neighbour is skipped.
    ///
    /// `White` is the identity of AND, so for erosion it behaves like `Ignore`.
    pub(crate) fn erosion_fill(self) -> Option<bool> {
        match self {
            BoundaryPolicy::Ignore | BoundaryPolicy::White => None,
            BoundaryPolicy::Black => Some(false),
        }
    }

    /// What a missing neighbour contributes to an AND fold.
    pub(crate) fn erosion_contribution(self) -> bool {
        self.erosion_fill().unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dual_is_an_involution() {
        for policy in [
            BoundaryPolicy::Ignore,
            BoundaryPolicy::White,
            BoundaryPolicy::Black,
        ] {
            assert_eq!(policy.dual().dual(), policy);
        }
        assert_eq!(BoundaryPolicy::White.dual(), BoundaryPolicy::Black);
    }

    #[test]
    fn erosion_contributions() {
        assert!(BoundaryPolicy::Ignore.erosion_contribution());
        assert!(BoundaryPolicy::White.erosion_contribution());
        assert!(!BoundaryPolicy::Black.erosion_contribution());
        assert_eq!(BoundaryPolicy::Black.erosion_fill(), Some(false));
    }
}
