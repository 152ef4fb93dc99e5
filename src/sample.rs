//! Strided pixel sampling.
//!
//! Extracts a bounded grid of representative pixels from a raster at a fixed
//! stride. The sampler is total: any raster geometry produces a matrix, and a
//! dimension shorter than the stride simply yields zero rows or columns.

use crate::frame::{Rgb, RgbRaster};

/// Pixel interval between consecutive sampled rows/columns.
pub const SAMPLE_STRIDE: u32 = 5;
/// Upper bound on sampled rows.
pub const MAX_SAMPLE_ROWS: usize = 10;
/// Upper bound on sampled columns.
pub const MAX_SAMPLE_COLS: usize = 20;

/// Bounded row-major grid of sampled colors. Recomputed fully per frame; no
/// state carries over between passes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleMatrix {
    cells: Vec<Rgb>,
    rows: usize,
    cols: usize,
}

impl SampleMatrix {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<Rgb> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.cells[row * self.cols + col])
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[Rgb]> {
        self.cells.chunks(self.cols.max(1))
    }
}

/// Sample `raster` on a fixed grid: cell (r, c) is the raster pixel at
/// (c * SAMPLE_STRIDE, r * SAMPLE_STRIDE), with row count
/// min(height / stride, MAX_SAMPLE_ROWS) and column count
/// min(width / stride, MAX_SAMPLE_COLS).
pub fn sample_grid(raster: &RgbRaster) -> SampleMatrix {
    let rows = ((raster.height / SAMPLE_STRIDE) as usize).min(MAX_SAMPLE_ROWS);
    let cols = ((raster.width / SAMPLE_STRIDE) as usize).min(MAX_SAMPLE_COLS);

    let mut cells = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        let source_y = row as u32 * SAMPLE_STRIDE;
        for col in 0..cols {
            let source_x = col as u32 * SAMPLE_STRIDE;
            cells.push(raster.pixel(source_x, source_y));
        }
    }

    SampleMatrix { cells, rows, cols }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::convert::yuv_to_rgb;
    use crate::frame::YuvFrame;

    /// Raster whose pixel (x, y) encodes its own coordinates as (x, y, 0).
    fn coordinate_raster(width: u32, height: u32) -> RgbRaster {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[x as u8, y as u8, 0]);
            }
        }
        RgbRaster::from_raw(data, width, height)
    }

    fn solid_raster(width: u32, height: u32, color: Rgb) -> RgbRaster {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..width * height {
            data.extend_from_slice(&[color.r, color.g, color.b]);
        }
        RgbRaster::from_raw(data, width, height)
    }

    #[test]
    fn dimensions_follow_stride_and_caps() {
        for (w, h, want_cols, want_rows) in [
            (640u32, 480u32, 20usize, 10usize),
            (100, 50, 20, 10),
            (47, 23, 9, 4),
            (5, 5, 1, 1),
            (4, 100, 0, 10),
            (100, 4, 20, 0),
            (0, 0, 0, 0),
        ] {
            let matrix = sample_grid(&solid_raster(w, h, Rgb::default()));
            assert_eq!(matrix.cols(), want_cols, "cols for {}x{}", w, h);
            assert_eq!(matrix.rows(), want_rows, "rows for {}x{}", w, h);
        }
    }

    #[test]
    fn degenerate_dimension_yields_empty_matrix() {
        assert!(sample_grid(&solid_raster(4, 100, Rgb::default())).is_empty());
        assert!(sample_grid(&solid_raster(100, 4, Rgb::default())).is_empty());
        assert_eq!(sample_grid(&solid_raster(4, 100, Rgb::default())).iter_rows().count(), 0);
    }

    #[test]
    fn every_cell_maps_to_strided_raster_coordinate() {
        let raster = coordinate_raster(100, 50);
        let matrix = sample_grid(&raster);
        for row in 0..matrix.rows() {
            for col in 0..matrix.cols() {
                let cell = matrix.cell(row, col).unwrap();
                assert_eq!(cell.r as u32, col as u32 * SAMPLE_STRIDE);
                assert_eq!(cell.g as u32, row as u32 * SAMPLE_STRIDE);
            }
        }
    }

    #[test]
    fn known_pixel_lands_in_expected_cell() {
        // 100x50 raster with pixel (25, 10) = (200, 100, 50): row 2, col 5.
        let mut data = vec![0u8; 100 * 50 * 3];
        let offset = (10 * 100 + 25) * 3;
        data[offset] = 200;
        data[offset + 1] = 100;
        data[offset + 2] = 50;
        let matrix = sample_grid(&RgbRaster::from_raw(data, 100, 50));
        assert_eq!(matrix.cell(2, 5), Some(Rgb::new(200, 100, 50)));
    }

    #[test]
    fn out_of_bounds_cell_is_none() {
        let matrix = sample_grid(&solid_raster(100, 50, Rgb::default()));
        assert_eq!(matrix.cell(10, 0), None);
        assert_eq!(matrix.cell(0, 20), None);
    }

    #[test]
    fn sampling_a_converted_frame_is_stable() {
        // Full path determinism: same planes -> same raster -> same matrix.
        let chroma = vec![128u8; crate::frame::chroma_extent(40) * crate::frame::chroma_extent(30)];
        let make = || {
            let frame = YuvFrame::tightly_packed(
                (0..40u32 * 30).map(|i| (i % 251) as u8).collect(),
                chroma.clone(),
                chroma.clone(),
                40,
                30,
            );
            sample_grid(&yuv_to_rgb(&frame).unwrap())
        };
        assert_eq!(make(), make());
    }
}
