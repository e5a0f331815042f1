//! Van Herk line erosion.
//!
//! Each scan line is split into blocks of the line length `λ`. A prefix fold
//! `g` restarts at every block start and a suffix fold `h` restarts at every
//! block end, so any window of `λ` consecutive cells is covered by at most one
//! suffix and one prefix. The cost per cell is constant whatever `λ` is.

use imalgebra_image::PixelArray;

use super::{MorphologyError, StructuringElement};
use crate::parallel::{self, ExecutionStrategy};

/// Scratch buffers of one scan line.
struct LineBuffers {
    values: Vec<bool>,
    present: Vec<bool>,
    g: Vec<bool>,
    h: Vec<bool>,
    out: Vec<bool>,
}

impl LineBuffers {
    fn new(len: usize) -> Self {
        Self {
            values: vec![false; len],
            present: vec![true; len],
            g: vec![false; len],
            h: vec![false; len],
            out: vec![false; len],
        }
    }

    /// Erode the loaded line with a run of `length` cells starting `origin`
    /// cells before the processed one.
    fn erode(&mut self, length: usize, origin: usize) {
        let len = self.values.len();
        if len == 0 {
            return;
        }

        // absent cells never force a zero
        for i in 0..len {
            let c = self.values[i] || !self.present[i];
            self.g[i] = if i % length == 0 { c } else { self.g[i - 1] && c };
        }
        for i in (0..len).rev() {
            let c = self.values[i] || !self.present[i];
            let block_end = i == len - 1 || (i + 1) % length == 0;
            self.h[i] = if block_end { c } else { self.h[i + 1] && c };
        }

        for i in 0..len {
            if !self.present[i] {
                self.out[i] = false;
                continue;
            }
            let n = i as isize - origin as isize;
            let m = (n + length as isize - 1).min(len as isize - 1) as usize;
            self.out[i] = if n < 0 {
                self.g[m]
            } else {
                let n = n as usize;
                if n / length == m / length {
                    self.h[n]
                } else {
                    self.g[m] && self.h[n]
                }
            };
        }
    }
}

/// Erode every horizontal scanline with a horizontal line element.
///
/// The element must be a contiguous horizontal run containing its center.
/// Out-of-domain neighbours are skipped, which makes the result valid for
/// the `Ignore` and `White` policies.
pub(crate) fn erode_horizontal(
    src: &PixelArray<bool>,
    se: &StructuringElement,
    execution: ExecutionStrategy,
) -> Result<PixelArray<bool>, MorphologyError> {
    let length = se.width();
    let origin = (se.center().x - se.bounds().0.x) as usize;
    let x_dim = src.x_dim();

    let mut dst = src.empty_like(false);
    parallel::for_each_lane(dst.as_slice_mut(), x_dim, execution, |row, lane| {
        let start = row * x_dim;
        let mut buf = LineBuffers::new(lane.len());
        buf.values.copy_from_slice(&src.as_slice()[start..start + lane.len()]);
        if let Some(presence) = src.presence() {
            buf.present
                .copy_from_slice(&presence[start..start + lane.len()]);
        }
        buf.erode(length, origin);
        lane.copy_from_slice(&buf.out);
    })?;

    Ok(dst)
}

/// Erode every column with a vertical line element.
///
/// Lanes are whole `(x, y)` planes; columns inside a plane are processed one
/// after the other.
pub(crate) fn erode_vertical(
    src: &PixelArray<bool>,
    se: &StructuringElement,
    execution: ExecutionStrategy,
) -> Result<PixelArray<bool>, MorphologyError> {
    let length = se.height();
    let origin = (se.center().y - se.bounds().0.y) as usize;
    let (x_dim, y_dim) = (src.x_dim(), src.y_dim());
    let plane_len = x_dim * y_dim;

    let mut dst = src.empty_like(false);
    parallel::for_each_lane(dst.as_slice_mut(), plane_len, execution, |plane, lane| {
        let base = plane * plane_len;
        let values = &src.as_slice()[base..base + plane_len];
        let presence = src.presence().map(|p| &p[base..base + plane_len]);

        let mut buf = LineBuffers::new(y_dim);
        for x in 0..x_dim {
            for y in 0..y_dim {
                buf.values[y] = values[y * x_dim + x];
                buf.present[y] = presence.map_or(true, |p| p[y * x_dim + x]);
            }
            buf.erode(length, origin);
            for y in 0..y_dim {
                lane[y * x_dim + x] = buf.out[y];
            }
        }
    })?;

    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn erode_row(values: &[bool], length: usize, origin: usize) -> Vec<bool> {
        let mut buf = LineBuffers::new(values.len());
        buf.values.copy_from_slice(values);
        buf.erode(length, origin);
        buf.out
    }

    fn naive(values: &[bool], length: usize, origin: usize) -> Vec<bool> {
        (0..values.len() as isize)
            .map(|i| {
                (0..length as isize)
                    .map(|k| i - origin as isize + k)
                    .filter(|&j| j >= 0 && j < values.len() as isize)
                    .all(|j| values[j as usize])
            })
            .collect()
    }

    #[test]
    fn test_line_not_multiple_of_length() {
        let values = [true, true, true, false, true, true, true, true, true, true, true];
        for length in 1..=6 {
            for origin in 0..length {
                assert_eq!(
                    erode_row(&values, length, origin),
                    naive(&values, length, origin),
                    "length {length} origin {origin}"
                );
            }
        }
    }

    #[test]
    fn test_length_longer_than_line() {
        let values = [true, true, false, true];
        assert_eq!(erode_row(&values, 7, 3), naive(&values, 7, 3));
        assert_eq!(erode_row(&[true; 3], 9, 4), vec![true; 3]);
    }

    #[test]
    fn test_absent_cells() {
        let mut buf = LineBuffers::new(5);
        buf.values.copy_from_slice(&[true, false, true, true, true]);
        buf.present.copy_from_slice(&[true, false, true, true, true]);
        buf.erode(3, 1);
        assert_eq!(buf.out, vec![true, false, true, true, true]);
    }

    #[test]
    fn test_empty_line() {
        assert!(erode_row(&[], 3, 1).is_empty());
    }
}
