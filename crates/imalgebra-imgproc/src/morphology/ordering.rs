use std::cmp::Ordering;

use num_traits::ToPrimitive;

/// An ordering over pixel vectors (the band values at one `(x, y, z, t)`).
///
/// Implementations fold `other` into `acc` so the operators can accumulate a
/// neighbourhood extremum without allocating. Both slices always have the same
/// length.
pub trait VectorialOrdering<T>: Send + Sync {
    /// `acc := inf(acc, other)`.
    fn min_in_place(&self, acc: &mut [T], other: &[T]);

    /// `acc := sup(acc, other)`.
    fn max_in_place(&self, acc: &mut [T], other: &[T]);
}

/// Total order comparing bands one after the other.
///
/// Incomparable values (NaN) compare equal. On a single `bool` band this is
/// the natural order `false < true`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicographicOrdering;

/// Component-wise order. The extremum of two vectors may be neither of them.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarginalOrdering;

/// Orders vectors by their Euclidean distance to a reference vector: the
/// closer a vector is, the greater it is. Ties are broken lexicographically.
#[derive(Debug, Clone, Default)]
pub struct ReferenceDistanceOrdering {
    /// The reference vector. Missing components are taken as zero.
    pub reference: Vec<f64>,
}

fn lexicographic_cmp<T: PartialOrd>(a: &[T], b: &[T]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| x.partial_cmp(y).unwrap_or(Ordering::Equal))
        .find(|o| *o != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

impl<T: PartialOrd + Copy + Send + Sync> VectorialOrdering<T> for LexicographicOrdering {
    fn min_in_place(&self, acc: &mut [T], other: &[T]) {
        if lexicographic_cmp(other, acc) == Ordering::Less {
            acc.copy_from_slice(other);
        }
    }

    fn max_in_place(&self, acc: &mut [T], other: &[T]) {
        if lexicographic_cmp(other, acc) == Ordering::Greater {
            acc.copy_from_slice(other);
        }
    }
}

impl<T: PartialOrd + Copy + Send + Sync> VectorialOrdering<T> for MarginalOrdering {
    fn min_in_place(&self, acc: &mut [T], other: &[T]) {
        acc.iter_mut().zip(other).for_each(|(a, &o)| {
            if o < *a {
                *a = o;
            }
        });
    }

    fn max_in_place(&self, acc: &mut [T], other: &[T]) {
        acc.iter_mut().zip(other).for_each(|(a, &o)| {
            if o > *a {
                *a = o;
            }
        });
    }
}

impl ReferenceDistanceOrdering {
    /// Create an ordering around `reference`.
    pub fn new(reference: Vec<f64>) -> Self {
        Self { reference }
    }

    fn squared_distance<T: ToPrimitive>(&self, v: &[T]) -> f64 {
        v.iter()
            .enumerate()
            .map(|(i, x)| {
                let r = self.reference.get(i).copied().unwrap_or(0.0);
                let d = x.to_f64().unwrap_or(f64::NAN) - r;
                d * d
            })
            .sum()
    }

    fn compare<T: ToPrimitive + PartialOrd>(&self, a: &[T], b: &[T]) -> Ordering {
        let da = self.squared_distance(a);
        let db = self.squared_distance(b);
        // larger distance is the smaller vector
        match db.partial_cmp(&da).unwrap_or(Ordering::Equal) {
            Ordering::Equal => lexicographic_cmp(a, b),
            o => o,
        }
    }
}

impl<T: ToPrimitive + PartialOrd + Copy + Send + Sync> VectorialOrdering<T>
    for ReferenceDistanceOrdering
{
    fn min_in_place(&self, acc: &mut [T], other: &[T]) {
        if self.compare(other, acc) == Ordering::Less {
            acc.copy_from_slice(other);
        }
    }

    fn max_in_place(&self, acc: &mut [T], other: &[T]) {
        if self.compare(other, acc) == Ordering::Greater {
            acc.copy_from_slice(other);
        }
    }
}
