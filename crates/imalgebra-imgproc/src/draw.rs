use imalgebra_image::{ImageError, PixelArray};

/// Set every band of the pixel at `(x, y, 0, t)`, skipping points outside the array.
#[inline]
fn set_pixel(img: &mut PixelArray<u8>, x: i64, y: i64, t: usize, color: &[u8]) {
    if x < 0 || y < 0 || x >= img.x_dim() as i64 || y >= img.y_dim() as i64 {
        return;
    }
    for (b, &c) in color.iter().enumerate() {
        let off = img.offset_unchecked(x as usize, y as usize, 0, t, b);
        img.as_slice_mut()[off] = c;
    }
}

/// Draws a circle outline inplace with the midpoint (Bresenham) algorithm.
///
/// The circle is drawn in the `z = 0` slice of every time frame. Points falling
/// outside the array are skipped, and an array without z slices is left as is.
///
/// # Arguments
///
/// * `img` - The array to draw on.
/// * `center` - The center of the circle as a tuple of (x, y).
/// * `radius` - The radius of the circle in pixels.
/// * `color` - One value per band.
///
/// # Errors
///
/// * [`ImageError::InvalidChannelCount`] if `color` does not have one value per band.
/// * [`ImageError::InvalidParameter`] for a negative radius.
pub fn draw_circle(
    img: &mut PixelArray<u8>,
    center: (i64, i64),
    radius: i64,
    color: &[u8],
) -> Result<(), ImageError> {
    if color.len() != img.bands() {
        return Err(ImageError::InvalidChannelCount(color.len(), img.bands()));
    }
    if radius < 0 {
        return Err(ImageError::InvalidParameter(format!(
            "circle radius must be >= 0, got {radius}"
        )));
    }

    // no z = 0 slice to draw on
    if img.z_dim() == 0 {
        return Ok(());
    }

    let (cx, cy) = center;
    for t in 0..img.t_dim() {
        let (mut x, mut y) = (0i64, radius);
        let mut m = 5 - 4 * radius;
        while y >= x {
            for (px, py) in [
                (x, y),
                (y, x),
                (-x, y),
                (-y, x),
                (x, -y),
                (y, -x),
                (-x, -y),
                (-y, -x),
            ] {
                set_pixel(img, cx + px, cy + py, t, color);
            }
            if m > 0 {
                y -= 1;
                m -= 8 * y;
            }
            x += 1;
            m += 8 * x + 4;
        }
    }

    Ok(())
}
