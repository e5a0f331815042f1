use std::ops::Range;

use imalgebra_image::{ArrayShape, PixelArray, Point4};

use super::{MorphologyError, StructuringElement, VectorialOrdering};
use crate::parallel::{self, ExecutionStrategy};

/// How the bands of an array are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BandGrouping {
    /// Every band is an independent scalar image.
    #[default]
    PerBand,

    /// The bands of one pixel form a vector compared as a whole. A pixel is
    /// present only if it is present in every band.
    WholePixel,
}

/// Which extremum a neighbourhood operator keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extremum {
    /// The infimum, as in erosion.
    Minimum,
    /// The supremum, as in dilation.
    Maximum,
}

/// Position of one scanline: a fixed `(y, z, t)` and, for per-band lanes, a band.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Scanline {
    pub y: usize,
    pub z: usize,
    pub t: usize,
    pub band: usize,
}

impl Scanline {
    /// Decompose a lane index in storage order `[band, t, z, y]`.
    pub(crate) fn from_index(index: usize, shape: ArrayShape) -> Self {
        let y = index % shape.y;
        let rest = index / shape.y;
        let z = rest % shape.z;
        let rest = rest / shape.z;
        Self {
            y,
            z,
            t: rest % shape.t,
            band: rest / shape.t,
        }
    }

    /// The coordinates of `(x, self)` moved by `d`, if they stay inside `shape`.
    #[inline]
    pub(crate) fn shifted(
        &self,
        shape: ArrayShape,
        x: usize,
        d: Point4,
    ) -> Option<(usize, usize, usize, usize)> {
        let p = Point4::new(
            x as i32 + d.x,
            self.y as i32 + d.y,
            self.z as i32 + d.z,
            self.t as i32 + d.t,
        );
        shape
            .contains(p)
            .then_some((p.x as usize, p.y as usize, p.z as usize, p.t as usize))
    }
}

/// Values standing in for neighbours that cannot be read. `None` skips them.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Substitutes<'a, T> {
    /// Neighbours outside the array.
    pub outside: Option<&'a [T]>,
    /// Neighbours inside the array but absent from its domain.
    pub absent: Option<&'a [T]>,
}

impl<'a, T> Substitutes<'a, T> {
    /// The same substitute for every missing neighbour.
    pub(crate) fn uniform(fill: Option<&'a [T]>) -> Self {
        Self {
            outside: fill,
            absent: fill,
        }
    }
}

struct Neighbourhood<'a, T, O: ?Sized> {
    src: &'a PixelArray<T>,
    deltas: Vec<Point4>,
    substitutes: Substitutes<'a, T>,
    extremum: Extremum,
    ordering: &'a O,
}

impl<T, O> Neighbourhood<'_, T, O>
where
    T: Copy + Default,
    O: VectorialOrdering<T> + ?Sized,
{
    /// Copy the pixel vector at `(x, y, z, t)` into `buf`. Returns false if absent.
    fn read(
        &self,
        (x, y, z, t): (usize, usize, usize, usize),
        bands: Range<usize>,
        buf: &mut [T],
    ) -> bool {
        for (slot, b) in buf.iter_mut().zip(bands) {
            let off = self.src.offset_unchecked(x, y, z, t, b);
            if !self.src.is_present_at(off) {
                return false;
            }
            *slot = self.src.as_slice()[off];
        }
        true
    }

    fn apply(
        &self,
        x: usize,
        line: Scanline,
        bands: Range<usize>,
        out: &mut [T],
        neighbour: &mut [T],
    ) {
        let shape = self.src.shape();
        if !self.read((x, line.y, line.z, line.t), bands.clone(), out) {
            out.fill(T::default());
            return;
        }

        // `out` keeps the center value until a neighbour contributes
        let mut seeded = false;
        for &d in &self.deltas {
            let substitute = match line.shifted(shape, x, d) {
                Some(q) if self.read(q, bands.clone(), neighbour) => None,
                Some(_) => Some(self.substitutes.absent),
                None => Some(self.substitutes.outside),
            };
            match substitute {
                None => {}
                Some(Some(value)) => neighbour.copy_from_slice(value),
                Some(None) => continue,
            }

            if !seeded {
                out.copy_from_slice(neighbour);
                seeded = true;
            } else {
                match self.extremum {
                    Extremum::Minimum => self.ordering.min_in_place(out, neighbour),
                    Extremum::Maximum => self.ordering.max_in_place(out, neighbour),
                }
            }
        }
    }
}

/// Compute the extremum of every neighbourhood defined by a structuring element.
///
/// For each present pixel the element is translated so its center lies on the
/// pixel and the pixel vectors under its offsets are folded with `ordering`.
/// Out-of-domain or absent neighbours are replaced by `fill`, or skipped when
/// `fill` is `None`. When every neighbour is skipped the pixel keeps its own
/// value. Absent pixels produce `T::default()`.
///
/// # Arguments
///
/// * `src` - The input array.
/// * `se` - The structuring element.
/// * `fill` - Substitute for missing neighbours, one value per grouped band.
/// * `extremum` - Whether to keep the infimum or the supremum.
/// * `ordering` - The ordering of pixel vectors.
/// * `grouping` - Whether bands are processed separately or as vectors.
///
/// # Errors
///
/// Returns [`MorphologyError::DimensionMismatch`] if the element does not fit the
/// array or `fill` has the wrong length.
pub fn neighbourhood_extremum<T, O>(
    src: &PixelArray<T>,
    se: &StructuringElement,
    fill: Option<&[T]>,
    extremum: Extremum,
    ordering: &O,
    grouping: BandGrouping,
) -> Result<PixelArray<T>, MorphologyError>
where
    T: Copy + Default + Send + Sync,
    O: VectorialOrdering<T> + ?Sized,
{
    neighbourhood_extremum_with(
        src,
        se,
        fill,
        extremum,
        ordering,
        grouping,
        ExecutionStrategy::default(),
    )
}

/// [`neighbourhood_extremum`] with explicit control over lane execution.
pub fn neighbourhood_extremum_with<T, O>(
    src: &PixelArray<T>,
    se: &StructuringElement,
    fill: Option<&[T]>,
    extremum: Extremum,
    ordering: &O,
    grouping: BandGrouping,
    execution: ExecutionStrategy,
) -> Result<PixelArray<T>, MorphologyError>
where
    T: Copy + Default + Send + Sync,
    O: VectorialOrdering<T> + ?Sized,
{
    substituted_extremum(
        src,
        se,
        Substitutes::uniform(fill),
        extremum,
        ordering,
        grouping,
        execution,
    )
}

/// Neighbourhood extremum with distinct substitutes for out-of-domain and
/// absent neighbours.
pub(crate) fn substituted_extremum<T, O>(
    src: &PixelArray<T>,
    se: &StructuringElement,
    substitutes: Substitutes<'_, T>,
    extremum: Extremum,
    ordering: &O,
    grouping: BandGrouping,
    execution: ExecutionStrategy,
) -> Result<PixelArray<T>, MorphologyError>
where
    T: Copy + Default + Send + Sync,
    O: VectorialOrdering<T> + ?Sized,
{
    let shape = src.shape();
    se.check_fits(shape)?;

    let width = match grouping {
        BandGrouping::PerBand => 1,
        BandGrouping::WholePixel => shape.bands,
    };
    for fill in [substitutes.outside, substitutes.absent].into_iter().flatten() {
        if fill.len() != width {
            return Err(MorphologyError::DimensionMismatch(format!(
                "fill has {} values, expected {}",
                fill.len(),
                width
            )));
        }
    }

    let kernel = Neighbourhood {
        src,
        deltas: se.offsets().iter().map(|&p| p - se.center()).collect(),
        substitutes,
        extremum,
        ordering,
    };

    let mut dst = src.empty_like(T::default());

    match grouping {
        BandGrouping::PerBand => {
            parallel::for_each_lane(dst.as_slice_mut(), shape.x, execution, |row, lane| {
                let line = Scanline::from_index(row, shape);
                let mut neighbour = [T::default()];
                for (x, out) in lane.chunks_exact_mut(1).enumerate() {
                    kernel.apply(x, line, line.band..line.band + 1, out, &mut neighbour);
                }
            })?;
        }
        BandGrouping::WholePixel => {
            // interleaved scratch: one lane holds the pixel vectors of a scanline
            let lane_len = shape.x * width;
            let rows = shape.y * shape.z * shape.t;
            let mut buf = vec![T::default(); rows * lane_len];
            parallel::for_each_lane(&mut buf, lane_len, execution, |row, lane| {
                let line = Scanline::from_index(row, shape);
                let mut neighbour = vec![T::default(); width];
                for (x, out) in lane.chunks_exact_mut(width).enumerate() {
                    kernel.apply(x, line, 0..width, out, &mut neighbour);
                }
            })?;

            let band_len = rows * shape.x;
            let data = dst.as_slice_mut();
            for (i, pixel) in buf.chunks_exact(width.max(1)).enumerate() {
                for (b, &v) in pixel.iter().enumerate() {
                    data[b * band_len + i] = v;
                }
            }
        }
    }

    Ok(dst)
}

/// Vectorial erosion: the infimum of each neighbourhood under `ordering`,
/// with whole-pixel vectors and out-of-domain neighbours skipped.
///
/// # Example
///
/// ```rust
/// use imalgebra_image::{ArrayShape, PixelArray};
/// use imalgebra_imgproc::morphology::{vectorial_erode, MarginalOrdering, SeShape, StructuringElement};
///
/// let src = PixelArray::from_shape_fn(ArrayShape::new(3, 1, 1, 1, 2), |x, _, _, _, b| {
///     (x * 10 + b) as u8
/// });
/// let se = StructuringElement::new(SeShape::HorizontalLine { length: 3 }).unwrap();
/// let out = vectorial_erode(&src, &se, &MarginalOrdering).unwrap();
/// assert_eq!(out.get(2, 0, 0, 0, 1), Some(&11));
/// ```
pub fn vectorial_erode<T, O>(
    src: &PixelArray<T>,
    se: &StructuringElement,
    ordering: &O,
) -> Result<PixelArray<T>, MorphologyError>
where
    T: Copy + Default + Send + Sync,
    O: VectorialOrdering<T> + ?Sized,
{
    neighbourhood_extremum(
        src,
        se,
        None,
        Extremum::Minimum,
        ordering,
        BandGrouping::WholePixel,
    )
}

/// Vectorial dilation: the supremum under `ordering` over the reflected element.
pub fn vectorial_dilate<T, O>(
    src: &PixelArray<T>,
    se: &StructuringElement,
    ordering: &O,
) -> Result<PixelArray<T>, MorphologyError>
where
    T: Copy + Default + Send + Sync,
    O: VectorialOrdering<T> + ?Sized,
{
    neighbourhood_extremum(
        src,
        &se.reflect(),
        None,
        Extremum::Maximum,
        ordering,
        BandGrouping::WholePixel,
    )
}
