use imalgebra_image::{ArrayShape, PixelArray, Point4};

use super::MorphologyError;

/// Shapes of canonical structuring elements.
///
/// All shapes are centered at their geometric center (`size / 2` along each axis).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeShape {
    /// A square box of side `size`.
    Square {
        /// Side length.
        size: usize,
    },

    /// An axis-aligned rectangle.
    Rectangle {
        /// Extent along x.
        width: usize,
        /// Extent along y.
        height: usize,
    },

    /// A cross (plus) made of the central row and column of a `size x size` box.
    Cross {
        /// Side length.
        size: usize,
    },

    /// An ellipse inscribed in a `width x height` box, defined by
    /// `(x^2 / rx^2) + (y^2 / ry^2) <= 1` around the box center.
    Ellipse {
        /// Extent along x.
        width: usize,
        /// Extent along y.
        height: usize,
    },

    /// A horizontal segment.
    HorizontalLine {
        /// Number of pixels.
        length: usize,
    },

    /// A vertical segment.
    VerticalLine {
        /// Number of pixels.
        length: usize,
    },
}

/// A flat structuring element: a set of offset points and a center.
///
/// Offsets are expressed in the coordinates of the mask the element was built
/// from; during an operation the element is translated so that its center
/// lies on the processed pixel. The center does not have to be one of the
/// offsets. The element is immutable once built.
///
/// # Example
///
/// ```rust
/// use imalgebra_imgproc::morphology::{SeShape, StructuringElement};
///
/// let se = StructuringElement::new(SeShape::Cross { size: 3 }).unwrap();
/// assert_eq!(se.len(), 5);
/// assert_eq!(se.width(), 3);
/// assert_eq!(se.height(), 3);
/// assert!(!se.is_rectangle());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuringElement {
    offsets: Vec<Point4>,
    center: Point4,
    min: Point4,
    max: Point4,
}

impl StructuringElement {
    /// Create a structuring element from a canonical shape.
    ///
    /// # Errors
    ///
    /// A shape with a zero extent has no active point.
    pub fn new(shape: SeShape) -> Result<Self, MorphologyError> {
        match shape {
            SeShape::Square { size } => Self::rectangle(size, size, centered(size, size)),
            SeShape::Rectangle { width, height } => {
                Self::rectangle(width, height, centered(width, height))
            }
            SeShape::Cross { size } => cross(size),
            SeShape::Ellipse { width, height } => ellipse(width, height),
            SeShape::HorizontalLine { length } => Self::horizontal_line(length, (length / 2) as i32),
            SeShape::VerticalLine { length } => Self::vertical_line(length, (length / 2) as i32),
        }
    }

    /// Create a structuring element from a boolean mask and an explicit center.
    ///
    /// Only present cells holding `true` become offsets.
    ///
    /// # Errors
    ///
    /// * [`MorphologyError::DimensionMismatch`] if the mask has more than one band.
    /// * [`MorphologyError::EmptyStructuringElement`] if no cell is active.
    pub fn from_mask(mask: &PixelArray<bool>, center: Point4) -> Result<Self, MorphologyError> {
        if mask.bands() != 1 {
            return Err(MorphologyError::DimensionMismatch(format!(
                "structuring element mask must have one band, got {}",
                mask.bands()
            )));
        }

        let mut offsets = Vec::new();
        for t in 0..mask.t_dim() {
            for z in 0..mask.z_dim() {
                for y in 0..mask.y_dim() {
                    for x in 0..mask.x_dim() {
                        let off = mask.offset_unchecked(x, y, z, t, 0);
                        if mask.as_slice()[off] && mask.is_present_at(off) {
                            offsets.push(Point4::new(x as i32, y as i32, z as i32, t as i32));
                        }
                    }
                }
            }
        }

        Self::from_offsets(offsets, center)
    }

    /// Create a 2-D structuring element from a row-major `width x height` grid.
    ///
    /// # Errors
    ///
    /// Fails if the grid length does not match, or no cell is active.
    pub fn from_grid(
        width: usize,
        height: usize,
        grid: &[bool],
        center: Point4,
    ) -> Result<Self, MorphologyError> {
        let mask = PixelArray::from_grid_2d(width, height, grid.to_vec())?;
        Self::from_mask(&mask, center)
    }

    /// Create a structuring element from explicit offsets. Duplicates are merged.
    ///
    /// # Errors
    ///
    /// Fails with [`MorphologyError::EmptyStructuringElement`] if `offsets` is empty.
    pub fn from_offsets(
        offsets: impl IntoIterator<Item = Point4>,
        center: Point4,
    ) -> Result<Self, MorphologyError> {
        let mut offsets: Vec<Point4> = offsets.into_iter().collect();
        offsets.sort_unstable_by_key(|p| (p.t, p.z, p.y, p.x));
        offsets.dedup();

        let first = *offsets
            .first()
            .ok_or(MorphologyError::EmptyStructuringElement)?;
        let (min, max) = offsets.iter().fold((first, first), |(lo, hi), p| {
            (
                Point4::new(lo.x.min(p.x), lo.y.min(p.y), lo.z.min(p.z), lo.t.min(p.t)),
                Point4::new(hi.x.max(p.x), hi.y.max(p.y), hi.z.max(p.z), hi.t.max(p.t)),
            )
        });

        Ok(Self {
            offsets,
            center,
            min,
            max,
        })
    }

    /// A horizontal segment of `length` pixels whose center sits at `center_x`.
    pub fn horizontal_line(length: usize, center_x: i32) -> Result<Self, MorphologyError> {
        Self::from_offsets(
            (0..length as i32).map(|x| Point4::new_2d(x, 0)),
            Point4::new_2d(center_x, 0),
        )
    }

    /// A vertical segment of `length` pixels whose center sits at `center_y`.
    pub fn vertical_line(length: usize, center_y: i32) -> Result<Self, MorphologyError> {
        Self::from_offsets(
            (0..length as i32).map(|y| Point4::new_2d(0, y)),
            Point4::new_2d(0, center_y),
        )
    }

    /// A full `width x height` rectangle with the given center.
    pub fn rectangle(width: usize, height: usize, center: Point4) -> Result<Self, MorphologyError> {
        let offsets = (0..height as i32)
            .flat_map(|y| (0..width as i32).map(move |x| Point4::new_2d(x, y)));
        Self::from_offsets(offsets, center)
    }

    /// The offset points, sorted and unique.
    pub fn offsets(&self) -> &[Point4] {
        &self.offsets
    }

    /// The center of the element.
    pub fn center(&self) -> Point4 {
        self.center
    }

    /// Number of offset points.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Always false: an element holds at least one point.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Inclusive bounding box of the offsets.
    pub fn bounds(&self) -> (Point4, Point4) {
        (self.min, self.max)
    }

    /// Bounding extent along x.
    pub fn width(&self) -> usize {
        (self.max.x - self.min.x + 1) as usize
    }

    /// Bounding extent along y.
    pub fn height(&self) -> usize {
        (self.max.y - self.min.y + 1) as usize
    }

    /// Bounding extent along z.
    pub fn depth(&self) -> usize {
        (self.max.z - self.min.z + 1) as usize
    }

    /// Bounding extent along t.
    pub fn duration(&self) -> usize {
        (self.max.t - self.min.t + 1) as usize
    }

    /// Whether the element lies in a single `(z, t)` slice.
    pub fn is_planar(&self) -> bool {
        self.depth() == 1 && self.duration() == 1
    }

    /// Whether the offsets form one contiguous horizontal run.
    pub fn is_horizontal_line(&self) -> bool {
        self.is_planar() && self.height() == 1 && self.len() == self.width()
    }

    /// Whether the offsets form one contiguous vertical run.
    pub fn is_vertical_line(&self) -> bool {
        self.is_planar() && self.width() == 1 && self.len() == self.height()
    }

    /// Whether the offsets exactly fill their 2-D bounding box.
    pub fn is_rectangle(&self) -> bool {
        self.is_planar() && self.len() == self.width() * self.height()
    }

    /// Whether the center lies inside the bounding box.
    pub fn center_within_bounds(&self) -> bool {
        let c = self.center;
        (self.min.x..=self.max.x).contains(&c.x)
            && (self.min.y..=self.max.y).contains(&c.y)
            && (self.min.z..=self.max.z).contains(&c.z)
            && (self.min.t..=self.max.t).contains(&c.t)
    }

    /// Mirror the element through its center: each offset `p` becomes `2c - p`.
    pub fn reflect(&self) -> Self {
        let c = self.center;
        let reflected = self.offsets.iter().map(|&p| c + c - p);
        let mut offsets: Vec<Point4> = reflected.collect();
        offsets.sort_unstable_by_key(|p| (p.t, p.z, p.y, p.x));
        Self {
            offsets,
            center: c,
            min: c + c - self.max,
            max: c + c - self.min,
        }
    }

    /// Check that the element can be applied to an array of `shape`.
    ///
    /// An element spanning several z slices (or t frames) needs an array with
    /// more than one.
    pub(crate) fn check_fits(&self, shape: ArrayShape) -> Result<(), MorphologyError> {
        if self.depth() > 1 && shape.z == 1 {
            return Err(MorphologyError::DimensionMismatch(format!(
                "structuring element spans {} z slices, array {} has one",
                self.depth(),
                shape
            )));
        }
        if self.duration() > 1 && shape.t == 1 {
            return Err(MorphologyError::DimensionMismatch(format!(
                "structuring element spans {} t frames, array {} has one",
                self.duration(),
                shape
            )));
        }
        Ok(())
    }

    /// Whether every offset of `self` is also an offset of `other`, with equal centers.
    pub fn is_subset_of(&self, other: &StructuringElement) -> bool {
        self.center == other.center
            && self
                .offsets
                .iter()
                .all(|p| other.offsets.binary_search_by_key(&(p.t, p.z, p.y, p.x), key).is_ok())
    }
}

fn key(p: &Point4) -> (i32, i32, i32, i32) {
    (p.t, p.z, p.y, p.x)
}

fn centered(width: usize, height: usize) -> Point4 {
    Point4::new_2d((width / 2) as i32, (height / 2) as i32)
}

fn cross(size: usize) -> Result<StructuringElement, MorphologyError> {
    let mid = (size / 2) as i32;
    let row = (0..size as i32).map(|x| Point4::new_2d(x, mid));
    let col = (0..size as i32).map(|y| Point4::new_2d(mid, y));
    StructuringElement::from_offsets(row.chain(col), Point4::new_2d(mid, mid))
}

fn ellipse(width: usize, height: usize) -> Result<StructuringElement, MorphologyError> {
    let cx = (width as f32 - 1.0) / 2.0;
    let cy = (height as f32 - 1.0) / 2.0;
    let rx = (width as f32 / 2.0).max(f32::EPSILON);
    let ry = (height as f32 / 2.0).max(f32::EPSILON);

    let mut offsets = Vec::new();
    for i in 0..height {
        for j in 0..width {
            let x = j as f32 - cx;
            let y = i as f32 - cy;
            if (x * x) / (rx * rx) + (y * y) / (ry * ry) <= 1.0 {
                offsets.push(Point4::new_2d(j as i32, i as i32));
            }
        }
    }

    StructuringElement::from_offsets(offsets, centered(width, height))
}
