use imalgebra_image::{ArrayShape, ImageError, PixelArray};
use rayon::prelude::*;

/// Parameters of the Harris corner detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HarrisParams {
    /// Keep at most this many corners, strongest first. `0` keeps them all.
    pub max_corners: usize,
    /// Standard deviation of the Gaussian window.
    pub sigma: f64,
    /// Weight of the squared trace in the corner measure.
    pub k: f64,
    /// A corner is dropped if a stronger one lies within this distance.
    pub spacing: usize,
}

impl Default for HarrisParams {
    fn default() -> Self {
        Self {
            max_corners: 0,
            sigma: 1.2,
            k: 0.06,
            spacing: 8,
        }
    }
}

/// A detected corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    /// Column of the corner.
    pub x: usize,
    /// Row of the corner.
    pub y: usize,
    /// Log-scaled Harris measure at the corner.
    pub response: f32,
}

/// Minimum log-scaled measure of a corner candidate.
const RESPONSE_THRESHOLD: f32 = 1e-3;

/// Band average of the `z = 0, t = 0` plane, row-major.
fn luminance(src: &PixelArray<u8>) -> Vec<f32> {
    let (cols, rows, bands) = (src.x_dim(), src.y_dim(), src.bands());
    let mut lum = vec![0.0f32; cols * rows];
    lum.par_chunks_exact_mut(cols)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, v) in row.iter_mut().enumerate() {
                let sum: f32 = (0..bands)
                    .map(|b| *src.get_unchecked(x, y, 0, 0, b) as f32)
                    .sum();
                *v = sum / bands as f32;
            }
        });
    lum
}

/// Sobel gradients with clamped borders, normalized to `[-1, 1]`.
fn sobel(lum: &[f32], cols: usize, rows: usize) -> Vec<[f32; 2]> {
    let mut grads = vec![[0.0f32; 2]; cols * rows];
    grads
        .par_chunks_exact_mut(cols)
        .enumerate()
        .for_each(|(y, row)| {
            let y0 = y.saturating_sub(1);
            let y2 = (y + 1).min(rows - 1);
            for (x, g) in row.iter_mut().enumerate() {
                let x0 = x.saturating_sub(1);
                let x2 = (x + 1).min(cols - 1);
                let v = |xx: usize, yy: usize| lum[yy * cols + xx];

                let sx = (v(x2, y0) + 2.0 * v(x2, y) + v(x2, y2))
                    - (v(x0, y0) + 2.0 * v(x0, y) + v(x0, y2));
                let sy = (v(x0, y2) + 2.0 * v(x, y2) + v(x2, y2))
                    - (v(x0, y0) + 2.0 * v(x, y0) + v(x2, y0));

                // filter normalization
                *g = [sx / (4.0 * 255.0), sy / (4.0 * 255.0)];
            }
        });
    grads
}

/// Compute the log-scaled Harris measure of every pixel.
///
/// The structure tensor is smoothed by a Gaussian window of radius `⌊2σ⌋`
/// whose taps outside the array are skipped. Pixels with a non-positive
/// measure `det - k·trace²` get `0`, the others `255·ln(1 + h) / ln(256)`.
///
/// # Arguments
///
/// * `src` - The input array. Its bands are averaged on the `z = 0, t = 0` plane.
/// * `sigma` - Standard deviation of the Gaussian window.
/// * `k` - Weight of the squared trace.
///
/// # Returns
///
/// A single-band 2-D array with the measure of every pixel.
///
/// # Errors
///
/// Returns [`ImageError::InvalidParameter`] if `sigma` is not positive.
pub fn harris_response(
    src: &PixelArray<u8>,
    sigma: f64,
    k: f64,
) -> Result<PixelArray<f32>, ImageError> {
    if sigma.is_nan() || sigma <= 0.0 {
        return Err(ImageError::InvalidParameter(format!(
            "sigma must be > 0, got {sigma}"
        )));
    }

    let (cols, rows) = (src.x_dim(), src.y_dim());
    let shape = ArrayShape::new_2d(cols, rows);
    if shape.numel() == 0 || src.bands() == 0 {
        return Ok(PixelArray::from_shape_val(shape, 0.0));
    }

    let grads = sobel(&luminance(src), cols, rows);

    // precompute the coefficients of the gaussian window
    let radius = (2.0 * sigma) as i64;
    let window = (2 * radius + 1) as usize;
    let sigma2 = sigma * sigma;
    let weights: Vec<f64> = (-radius..=radius)
        .flat_map(|j| (-radius..=radius).map(move |i| (i, j)))
        .map(|(i, j)| {
            let t = (i * i + j * j) as f64 / (2.0 * sigma2);
            (-t).exp() / (2.0 * std::f64::consts::PI * sigma2)
        })
        .collect();

    let k = k as f32;
    let mut measure = vec![0.0f32; cols * rows];
    measure
        .par_chunks_exact_mut(cols)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, h) in row.iter_mut().enumerate() {
                let (mut lx2, mut ly2, mut lxy) = (0.0f32, 0.0f32, 0.0f32);
                for dy in -radius..=radius {
                    let yk = y as i64 + dy;
                    if yk < 0 || yk >= rows as i64 {
                        continue;
                    }
                    for dx in -radius..=radius {
                        let xk = x as i64 + dx;
                        if xk < 0 || xk >= cols as i64 {
                            continue;
                        }
                        let w = weights[(dy + radius) as usize * window + (dx + radius) as usize]
                            as f32;
                        let [gx, gy] = grads[yk as usize * cols + xk as usize];
                        lx2 += w * gx * gx;
                        ly2 += w * gy * gy;
                        lxy += w * gx * gy;
                    }
                }

                let trace = lx2 + ly2;
                let m = lx2 * ly2 - lxy * lxy - k * trace * trace;
                *h = if m <= 0.0 {
                    0.0
                } else {
                    255.0 * m.ln_1p() / 256f32.ln()
                };
            }
        });

    PixelArray::new(shape, measure)
}

/// Whether `(x, y)` is strictly greater than its 8 neighbours. `(x, y)` must be interior.
fn is_spatial_maximum(measure: &[f32], cols: usize, x: usize, y: usize) -> bool {
    let h = measure[y * cols + x];
    (y - 1..=y + 1)
        .flat_map(|yy| (x - 1..=x + 1).map(move |xx| (xx, yy)))
        .filter(|&p| p != (x, y))
        .all(|(xx, yy)| measure[yy * cols + xx] < h)
}

/// Detect Harris corners.
///
/// Candidates are interior pixels whose measure exceeds a small threshold and
/// is a strict maximum of their 8-neighbourhood. Candidates are then visited
/// in scan order, and one is dropped when another remaining candidate within
/// `spacing` (integer Euclidean distance) has a measure at least as high.
///
/// # Arguments
///
/// * `src` - The input array. Its bands are averaged on the `z = 0, t = 0` plane.
/// * `params` - The detector parameters.
///
/// # Returns
///
/// The corners in scan order, or the `max_corners` strongest ones sorted by
/// decreasing response when there are more.
///
/// # Errors
///
/// Returns [`ImageError::InvalidParameter`] if `params.sigma` is not positive.
///
/// # Example
///
/// ```rust
/// use imalgebra_image::{ArrayShape, PixelArray};
/// use imalgebra_imgproc::features::{harris_corners, HarrisParams};
///
/// let src = PixelArray::from_shape_fn(ArrayShape::new_2d(16, 16), |x, y, _, _, _| {
///     if x >= 8 && y >= 6 { 255u8 } else { 0 }
/// });
/// let corners = harris_corners(&src, &HarrisParams::default()).unwrap();
/// assert_eq!(corners.len(), 1);
/// assert_eq!((corners[0].x, corners[0].y), (8, 6));
/// ```
pub fn harris_corners(
    src: &PixelArray<u8>,
    params: &HarrisParams,
) -> Result<Vec<Keypoint>, ImageError> {
    let response = harris_response(src, params.sigma, params.k)?;
    let (cols, rows) = (response.x_dim(), response.y_dim());
    let measure = response.as_slice();

    let mut candidates = Vec::new();
    for y in 1..rows.saturating_sub(1) {
        for x in 1..cols.saturating_sub(1) {
            let h = measure[y * cols + x];
            if h > RESPONSE_THRESHOLD && is_spatial_maximum(measure, cols, x, y) {
                candidates.push(Keypoint { x, y, response: h });
            }
        }
    }

    // remove corners too close to a stronger one
    let mut alive = vec![true; candidates.len()];
    for i in 0..candidates.len() {
        let p = candidates[i];
        let crowded = candidates.iter().enumerate().any(|(j, n)| {
            if j == i || !alive[j] {
                return false;
            }
            let dx = p.x as f64 - n.x as f64;
            let dy = p.y as f64 - n.y as f64;
            let dist = (dx * dx + dy * dy).sqrt() as usize;
            dist <= params.spacing && n.response >= p.response
        });
        if crowded {
            alive[i] = false;
        }
    }
    let mut corners: Vec<Keypoint> = candidates
        .into_iter()
        .zip(alive)
        .filter_map(|(p, keep)| keep.then_some(p))
        .collect();

    if params.max_corners > 0 && params.max_corners < corners.len() {
        corners.sort_by(|a, b| b.response.total_cmp(&a.response));
        corners.truncate(params.max_corners);
    }

    Ok(corners)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: usize, lo: usize, hi: usize) -> PixelArray<u8> {
        PixelArray::from_shape_fn(ArrayShape::new_2d(size, size), |x, y, _, _, _| {
            if (lo..=hi).contains(&x) && (lo..=hi).contains(&y) {
                255
            } else {
                0
            }
        })
    }

    #[test]
    fn test_square_corners() -> Result<(), ImageError> {
        let corners = harris_corners(&square(20, 5, 14), &HarrisParams::default())?;
        let found: Vec<(usize, usize)> = corners.iter().map(|k| (k.x, k.y)).collect();
        assert_eq!(found, vec![(5, 5), (14, 5), (5, 14), (14, 14)]);
        for k in &corners {
            approx::assert_relative_eq!(k.response, corners[0].response, max_relative = 1e-4);
        }
        Ok(())
    }

    #[test]
    fn test_max_corners_sorted() -> Result<(), ImageError> {
        let params = HarrisParams {
            max_corners: 2,
            ..Default::default()
        };
        let corners = harris_corners(&square(20, 5, 14), &params)?;
        assert_eq!(corners.len(), 2);
        assert!(corners[0].response >= corners[1].response);
        Ok(())
    }

    #[test]
    fn test_spacing_suppression() -> Result<(), ImageError> {
        // the square corners are 9 pixels apart
        let params = HarrisParams {
            spacing: 9,
            ..Default::default()
        };
        let corners = harris_corners(&square(20, 5, 14), &params)?;
        assert!(!corners.is_empty());
        assert!(corners.len() < 4);
        Ok(())
    }

    #[test]
    fn test_uniform_has_no_corner() -> Result<(), ImageError> {
        let src = PixelArray::from_shape_val(ArrayShape::new(12, 9, 1, 1, 3), 77u8);
        assert!(harris_corners(&src, &HarrisParams::default())?.is_empty());
        let response = harris_response(&src, 1.2, 0.06)?;
        assert!(response.as_slice().iter().all(|&h| h == 0.0));
        Ok(())
    }

    #[test]
    fn test_response_is_symmetric() -> Result<(), ImageError> {
        let response = harris_response(&square(20, 5, 14), 1.2, 0.06)?;
        for y in 0..20 {
            for x in 0..20 {
                let a = *response.get_unchecked(x, y, 0, 0, 0);
                let b = *response.get_unchecked(19 - x, y, 0, 0, 0);
                approx::assert_abs_diff_eq!(a, b, epsilon = 1e-5);
            }
        }
        Ok(())
    }

    #[test]
    fn test_bands_are_averaged() -> Result<(), ImageError> {
        let gray = square(20, 5, 14);
        let color = PixelArray::from_shape_fn(ArrayShape::new(20, 20, 1, 1, 3), |x, y, _, _, _| {
            *gray.get_unchecked(x, y, 0, 0, 0)
        });
        assert_eq!(
            harris_corners(&gray, &HarrisParams::default())?,
            harris_corners(&color, &HarrisParams::default())?
        );
        Ok(())
    }

    #[test]
    fn test_invalid_sigma() {
        let src = square(8, 2, 5);
        let params = HarrisParams {
            sigma: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            harris_corners(&src, &params),
            Err(ImageError::InvalidParameter(_))
        ));
    }
}
