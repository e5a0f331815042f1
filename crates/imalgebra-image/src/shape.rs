use std::ops;

/// Extent of a pixel array along its five axes.
///
/// # Examples
///
/// ```
/// use imalgebra_image::ArrayShape;
///
/// let shape = ArrayShape::new_2d(10, 20);
/// assert_eq!(shape.x, 10);
/// assert_eq!(shape.y, 20);
/// assert_eq!(shape.bands, 1);
/// assert_eq!(shape.numel(), 200);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ArrayShape {
    /// Number of columns.
    pub x: usize,
    /// Number of rows.
    pub y: usize,
    /// Depth.
    pub z: usize,
    /// Number of time frames.
    pub t: usize,
    /// Number of bands.
    pub bands: usize,
}

impl ArrayShape {
    /// Create a shape from the five extents.
    pub fn new(x: usize, y: usize, z: usize, t: usize, bands: usize) -> Self {
        Self { x, y, z, t, bands }
    }

    /// A single-band, single-slice, single-frame 2-D shape.
    pub fn new_2d(x: usize, y: usize) -> Self {
        Self::new(x, y, 1, 1, 1)
    }

    /// Total number of cells.
    pub fn numel(&self) -> usize {
        self.x * self.y * self.z * self.t * self.bands
    }

    /// Number of cells in one (x, y) plane.
    pub fn plane_len(&self) -> usize {
        self.x * self.y
    }

    /// Shape of the backing tensor, laid out `[band, t, z, y, x]`.
    pub fn tensor_shape(&self) -> [usize; 5] {
        [self.bands, self.t, self.z, self.y, self.x]
    }

    /// Whether the signed coordinate lies inside the spatial domain.
    #[inline]
    pub fn contains(&self, p: Point4) -> bool {
        p.x >= 0
            && p.y >= 0
            && p.z >= 0
            && p.t >= 0
            && (p.x as usize) < self.x
            && (p.y as usize) < self.y
            && (p.z as usize) < self.z
            && (p.t as usize) < self.t
    }
}

impl std::fmt::Display for ArrayShape {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ArrayShape {{ x: {}, y: {}, z: {}, t: {}, bands: {} }}",
            self.x, self.y, self.z, self.t, self.bands
        )
    }
}

/// A signed point (or offset) in the four spatio-temporal axes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point4 {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
    /// Depth.
    pub z: i32,
    /// Time.
    pub t: i32,
}

impl Point4 {
    /// Create a point from its four coordinates.
    pub const fn new(x: i32, y: i32, z: i32, t: i32) -> Self {
        Self { x, y, z, t }
    }

    /// A point in the `z = 0, t = 0` plane.
    pub const fn new_2d(x: i32, y: i32) -> Self {
        Self::new(x, y, 0, 0)
    }
}

impl ops::Add for Point4 {
    type Output = Point4;

    fn add(self, rhs: Point4) -> Point4 {
        Point4::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z, self.t + rhs.t)
    }
}

impl ops::Sub for Point4 {
    type Output = Point4;

    fn sub(self, rhs: Point4) -> Point4 {
        Point4::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z, self.t - rhs.t)
    }
}

impl From<[i32; 2]> for Point4 {
    fn from(p: [i32; 2]) -> Self {
        Point4::new_2d(p[0], p[1])
    }
}
