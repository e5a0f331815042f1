use imalgebra_tensor::Tensor5;

use crate::error::ImageError;
use crate::shape::ArrayShape;

/// Represents a five-axis array of pixels.
///
/// Cells are addressed by `(x, y, z, t, band)`. The data is stored in a
/// [`Tensor5`] laid out `[band, t, z, y, x]`, so one horizontal scanline is a
/// contiguous run of `x_dim()` values and one `(x, y)` plane a contiguous run of
/// `x_dim() * y_dim()` values.
///
/// An optional presence mask flags cells that lie outside the irregular domain
/// of the array. Without a mask every cell is present.
///
/// # Examples
///
/// ```
/// use imalgebra_image::{ArrayShape, PixelArray};
///
/// let mut array = PixelArray::from_shape_val(ArrayShape::new_2d(3, 2), false);
/// array.set(1, 1, 0, 0, 0, true).unwrap();
///
/// assert_eq!(array.get(1, 1, 0, 0, 0), Some(&true));
/// assert!(array.is_present(1, 1, 0, 0, 0));
/// assert!(!array.is_present(3, 1, 0, 0, 0));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PixelArray<T> {
    shape: ArrayShape,
    data: Tensor5<T>,
    presence: Option<Tensor5<bool>>,
}

impl<T> PixelArray<T> {
    /// Create a new array from pixel data laid out `[band, t, z, y, x]`.
    ///
    /// # Errors
    ///
    /// If the length of the data does not match the shape, an error is returned.
    pub fn new(shape: ArrayShape, data: Vec<T>) -> Result<Self, ImageError> {
        let data = Tensor5::from_shape_vec(shape.tensor_shape(), data)?;
        Ok(Self {
            shape,
            data,
            presence: None,
        })
    }

    /// Create a single-band 2-D array from a row-major grid (`y` outer, `x` inner).
    ///
    /// # Examples
    ///
    /// ```
    /// use imalgebra_image::PixelArray;
    ///
    /// let array = PixelArray::from_grid_2d(3, 1, vec![1u8, 2, 3]).unwrap();
    /// assert_eq!(array.get(2, 0, 0, 0, 0), Some(&3));
    /// ```
    pub fn from_grid_2d(width: usize, height: usize, data: Vec<T>) -> Result<Self, ImageError> {
        Self::new(ArrayShape::new_2d(width, height), data)
    }

    /// Create a new array with every cell set to `val`.
    pub fn from_shape_val(shape: ArrayShape, val: T) -> Self
    where
        T: Clone,
    {
        Self {
            shape,
            data: Tensor5::from_shape_val(shape.tensor_shape(), val),
            presence: None,
        }
    }

    /// Create a new array whose cells are generated from `(x, y, z, t, band)`.
    pub fn from_shape_fn<F>(shape: ArrayShape, f: F) -> Self
    where
        F: Fn(usize, usize, usize, usize, usize) -> T,
    {
        Self {
            shape,
            data: Tensor5::from_shape_fn(shape.tensor_shape(), |[b, t, z, y, x]| f(x, y, z, t, b)),
            presence: None,
        }
    }

    /// Attach a presence mask, replacing any existing one.
    ///
    /// # Errors
    ///
    /// The mask must have exactly the shape of the array.
    pub fn with_presence(mut self, mask: &PixelArray<bool>) -> Result<Self, ImageError> {
        if mask.shape != self.shape {
            return Err(ImageError::DimensionMismatch(self.shape, mask.shape));
        }
        self.presence = Some(mask.data.clone());
        Ok(self)
    }

    /// Allocate an array of the same shape and presence mask, filled with `fill`.
    ///
    /// This is the shape-only copy operators use to allocate their output.
    pub fn empty_like<U: Clone>(&self, fill: U) -> PixelArray<U> {
        PixelArray {
            shape: self.shape,
            data: Tensor5::from_shape_val(self.shape.tensor_shape(), fill),
            presence: self.presence.clone(),
        }
    }

    /// Apply `f` to every cell, keeping the shape and presence mask.
    pub fn map<U, F>(&self, f: F) -> PixelArray<U>
    where
        F: Fn(&T) -> U,
    {
        PixelArray {
            shape: self.shape,
            data: self.data.map(f),
            presence: self.presence.clone(),
        }
    }

    /// Cast every cell to another numeric type.
    ///
    /// # Errors
    ///
    /// Fails with [`ImageError::InvalidParameter`] if a value does not fit the target type.
    pub fn cast<U>(&self) -> Result<PixelArray<U>, ImageError>
    where
        T: num_traits::NumCast + Copy,
        U: num_traits::NumCast,
    {
        let casted = self
            .data
            .as_slice()
            .iter()
            .map(|&v| {
                U::from(v).ok_or_else(|| ImageError::InvalidParameter("cast out of range".into()))
            })
            .collect::<Result<Vec<U>, ImageError>>()?;

        Ok(PixelArray {
            shape: self.shape,
            data: Tensor5::from_shape_vec(self.shape.tensor_shape(), casted)?,
            presence: self.presence.clone(),
        })
    }

    /// Get the shape of the array.
    pub fn shape(&self) -> ArrayShape {
        self.shape
    }

    /// Get the number of columns.
    pub fn x_dim(&self) -> usize {
        self.shape.x
    }

    /// Get the number of rows.
    pub fn y_dim(&self) -> usize {
        self.shape.y
    }

    /// Get the depth.
    pub fn z_dim(&self) -> usize {
        self.shape.z
    }

    /// Get the number of time frames.
    pub fn t_dim(&self) -> usize {
        self.shape.t
    }

    /// Get the number of bands.
    pub fn bands(&self) -> usize {
        self.shape.bands
    }

    /// Linear offset of a cell, or `None` when out of bounds.
    #[inline]
    pub fn offset(&self, x: usize, y: usize, z: usize, t: usize, b: usize) -> Option<usize> {
        self.data.get_iter_offset([b, t, z, y, x])
    }

    /// Linear offset of a cell without bounds checking.
    #[inline]
    pub fn offset_unchecked(&self, x: usize, y: usize, z: usize, t: usize, b: usize) -> usize {
        self.data.get_iter_offset_unchecked([b, t, z, y, x])
    }

    /// Get the value at the given coordinates, or `None` when out of bounds.
    pub fn get(&self, x: usize, y: usize, z: usize, t: usize, b: usize) -> Option<&T> {
        self.data.get([b, t, z, y, x])
    }

    /// Get the value at the given coordinates without checking each axis.
    ///
    /// # Panics
    ///
    /// Panics if the resulting offset is outside the buffer.
    #[inline]
    pub fn get_unchecked(&self, x: usize, y: usize, z: usize, t: usize, b: usize) -> &T {
        self.data.get_unchecked([b, t, z, y, x])
    }

    /// Set the value at the given coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::PixelIndexOutOfBounds`] for coordinates outside the array.
    pub fn set(
        &mut self,
        x: usize,
        y: usize,
        z: usize,
        t: usize,
        b: usize,
        val: T,
    ) -> Result<(), ImageError> {
        let shape = self.shape;
        match self.data.get_mut([b, t, z, y, x]) {
            Some(cell) => {
                *cell = val;
                Ok(())
            }
            None => Err(ImageError::PixelIndexOutOfBounds([x, y, z, t, b], shape)),
        }
    }

    /// Whether the cell is inside the array and flagged present.
    pub fn is_present(&self, x: usize, y: usize, z: usize, t: usize, b: usize) -> bool {
        match self.offset(x, y, z, t, b) {
            Some(off) => self.is_present_at(off),
            None => false,
        }
    }

    /// Whether the cell at a linear offset is present. The offset must be in bounds.
    #[inline]
    pub fn is_present_at(&self, offset: usize) -> bool {
        match &self.presence {
            Some(mask) => mask.as_slice()[offset],
            None => true,
        }
    }

    /// Flag a cell as present or absent, creating the mask on first use.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::PixelIndexOutOfBounds`] for coordinates outside the array.
    pub fn set_present(
        &mut self,
        x: usize,
        y: usize,
        z: usize,
        t: usize,
        b: usize,
        present: bool,
    ) -> Result<(), ImageError> {
        let shape = self.shape;
        let offset = self
            .offset(x, y, z, t, b)
            .ok_or(ImageError::PixelIndexOutOfBounds([x, y, z, t, b], shape))?;
        let mask = self
            .presence
            .get_or_insert_with(|| Tensor5::from_shape_val(shape.tensor_shape(), true));
        mask.as_slice_mut()[offset] = present;
        Ok(())
    }

    /// Whether the array carries a presence mask.
    pub fn has_presence_mask(&self) -> bool {
        self.presence.is_some()
    }

    /// The presence mask as a slice in storage order, if any.
    pub fn presence(&self) -> Option<&[bool]> {
        self.presence.as_ref().map(|m| m.as_slice())
    }

    /// The presence mask as a mutable slice, created all-present on first use.
    pub fn presence_mut(&mut self) -> &mut [bool] {
        let shape = self.shape;
        self.presence
            .get_or_insert_with(|| Tensor5::from_shape_val(shape.tensor_shape(), true))
            .as_slice_mut()
    }

    /// Number of cells.
    pub fn numel(&self) -> usize {
        self.data.numel()
    }

    /// Get the pixel data in storage order `[band, t, z, y, x]`.
    pub fn as_slice(&self) -> &[T] {
        self.data.as_slice()
    }

    /// Get the pixel data in storage order as a mutable slice.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        self.data.as_slice_mut()
    }
}

#[cfg(test)]
mod tests {
    use crate::{ArrayShape, ImageError, PixelArray};

    #[test]
    fn array_smoke() -> Result<(), ImageError> {
        let shape = ArrayShape::new(4, 3, 2, 1, 2);
        let array = PixelArray::new(shape, vec![0u8; shape.numel()])?;
        assert_eq!(array.x_dim(), 4);
        assert_eq!(array.y_dim(), 3);
        assert_eq!(array.z_dim(), 2);
        assert_eq!(array.t_dim(), 1);
        assert_eq!(array.bands(), 2);
        assert!(!array.has_presence_mask());
        Ok(())
    }

    #[test]
    fn array_invalid_len() {
        let res = PixelArray::new(ArrayShape::new_2d(2, 2), vec![0u8; 3]);
        assert!(matches!(res, Err(ImageError::InvalidShape(_))));
    }

    #[test]
    fn array_layout() {
        let shape = ArrayShape::new(3, 2, 1, 1, 2);
        let array = PixelArray::from_shape_fn(shape, |x, y, _, _, b| (b * 100 + y * 10 + x) as u16);
        assert_eq!(array.as_slice(), &[0, 1, 2, 10, 11, 12, 100, 101, 102, 110, 111, 112]);
        assert_eq!(array.offset(2, 1, 0, 0, 1), Some(11));
        assert_eq!(array.offset(3, 0, 0, 0, 0), None);
        assert_eq!(array.get(1, 1, 0, 0, 1), Some(&111));
    }

    #[test]
    fn array_set_out_of_bounds() {
        let mut array = PixelArray::from_shape_val(ArrayShape::new_2d(2, 2), 0u8);
        let err = array.set(2, 0, 0, 0, 0, 1);
        assert_eq!(
            err,
            Err(ImageError::PixelIndexOutOfBounds(
                [2, 0, 0, 0, 0],
                ArrayShape::new_2d(2, 2)
            ))
        );
    }

    #[test]
    fn array_presence() -> Result<(), ImageError> {
        let mut array = PixelArray::from_shape_val(ArrayShape::new_2d(2, 2), 1u8);
        array.set_present(0, 1, 0, 0, 0, false)?;
        assert!(array.has_presence_mask());
        assert!(!array.is_present(0, 1, 0, 0, 0));
        assert!(array.is_present(1, 1, 0, 0, 0));

        let like = array.empty_like(false);
        assert!(!like.is_present(0, 1, 0, 0, 0));
        assert_eq!(like.as_slice(), &[false; 4]);
        Ok(())
    }

    #[test]
    fn array_with_presence_shape_checked() {
        let array = PixelArray::from_shape_val(ArrayShape::new_2d(2, 2), 1u8);
        let mask = PixelArray::from_shape_val(ArrayShape::new_2d(3, 2), true);
        assert!(matches!(
            array.with_presence(&mask),
            Err(ImageError::DimensionMismatch(_, _))
        ));
    }

    #[test]
    fn array_cast() -> Result<(), ImageError> {
        let array = PixelArray::from_grid_2d(2, 1, vec![3u8, 250])?;
        let casted: PixelArray<f32> = array.cast()?;
        assert_eq!(casted.as_slice(), &[3.0, 250.0]);
        Ok(())
    }
}
