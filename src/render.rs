//! Presentation formatting.
//!
//! Turns sampler and simulator output into the text blocks the presentation
//! boundary displays: the sampled pixel grid as `(R,G,B)` tuples, the camera
//! intrinsics/distortion block, and the motion/orientation block. Formatting
//! precision is fixed: focal lengths at 2 decimals, principal point at 1,
//! distortion coefficients at 4, motion and orientation at 1.

use crate::sample::SampleMatrix;
use crate::telemetry::Telemetry;

/// Consumer of formatted presentation text. The frame path publishes the
/// matrix block; the telemetry path publishes the other two. The two paths
/// share no data.
pub trait PresentationSink: Send + Sync {
    fn publish_matrix(&self, text: &str);
    fn publish_intrinsics(&self, text: &str);
    fn publish_motion(&self, text: &str);
}

/// Sample matrix as text: `(R,G,B)` tuples space-separated within a row,
/// rows newline-separated. An empty matrix formats as an empty string.
pub fn matrix_text(matrix: &SampleMatrix) -> String {
    matrix
        .iter_rows()
        .map(|row| {
            row.iter()
                .map(|px| format!("({},{},{})", px.r, px.g, px.b))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Camera intrinsics and distortion coefficients block.
pub fn intrinsics_text(t: &Telemetry) -> String {
    format!(
        "Camera Intrinsic Parameters:\n\
         fx: {:.2}\n\
         fy: {:.2}\n\
         cx: {:.1}\n\
         cy: {:.1}\n\
         \n\
         Distortion Coefficients:\n\
         k1: {:.4}\n\
         k2: {:.4}\n\
         p1: {:.4}\n\
         p2: {:.4}\n\
         k3: {:.4}",
        t.fx, t.fy, t.cx, t.cy, t.k1, t.k2, t.p1, t.p2, t.k3
    )
}

/// Movement and orientation block, ending with the current tick count.
pub fn motion_text(t: &Telemetry) -> String {
    format!(
        "Movement Data:\n\
         dx: {:.1} mm\n\
         dy: {:.1} mm\n\
         dz: {:.1} mm\n\
         \n\
         Orientation:\n\
         Roll: {:.1}\u{00b0}\n\
         Pitch: {:.1}\u{00b0}\n\
         Yaw: {:.1}\u{00b0}\n\
         \n\
         Frame: {}",
        t.dx, t.dy, t.dz, t.roll, t.pitch, t.yaw, t.tick
    )
}

/// Presentation sink that writes each block to stdout. The daemon's terminal
/// output is its presentation boundary; the platform preview stream is an
/// external concern.
pub struct StdoutPresenter;

impl PresentationSink for StdoutPresenter {
    fn publish_matrix(&self, text: &str) {
        println!("Sampled Pixels:\n{}\n", text);
    }

    fn publish_intrinsics(&self, text: &str) {
        println!("{}\n", text);
    }

    fn publish_motion(&self, text: &str) {
        println!("{}\n", text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::RgbRaster;
    use crate::sample::sample_grid;

    fn tiny_matrix() -> SampleMatrix {
        // 10x10 raster -> 2x2 matrix of coordinate-encoded colors.
        let mut data = Vec::new();
        for y in 0..10u32 {
            for x in 0..10u32 {
                data.extend_from_slice(&[x as u8, y as u8, 7]);
            }
        }
        sample_grid(&RgbRaster::from_raw(data, 10, 10))
    }

    #[test]
    fn matrix_rows_are_newline_separated_tuples() {
        let text = matrix_text(&tiny_matrix());
        assert_eq!(text, "(0,0,7) (5,0,7)\n(0,5,7) (5,5,7)");
    }

    #[test]
    fn empty_matrix_formats_as_empty_string() {
        let matrix = sample_grid(&RgbRaster::from_raw(vec![0; 4 * 4 * 3], 4, 4));
        assert!(matrix.is_empty());
        assert_eq!(matrix_text(&matrix), "");
    }

    #[test]
    fn intrinsics_block_uses_fixed_precision() {
        let t = Telemetry::default();
        let text = intrinsics_text(&t);
        assert!(text.starts_with("Camera Intrinsic Parameters:\n"));
        assert!(text.contains("fx: 1000.00"));
        assert!(text.contains("fy: 1000.00"));
        assert!(text.contains("cx: 640.0"));
        assert!(text.contains("cy: 480.0"));
        assert!(text.contains("k1: 0.1000"));
        assert!(text.contains("k2: -0.2000"));
        assert!(text.contains("p1: 0.0100"));
        assert!(text.contains("k3: 0.0500"));
    }

    #[test]
    fn motion_block_carries_units_and_tick() {
        let mut t = Telemetry::default();
        t.tick = 42;
        let text = motion_text(&t);
        assert!(text.contains("dx: 0.0 mm"));
        assert!(text.contains("dz: 200.0 mm"));
        assert!(text.contains("Roll: 0.0\u{00b0}"));
        assert!(text.contains("Pitch: 0.0\u{00b0}"));
        assert!(text.ends_with("Frame: 42"));
    }

    #[test]
    fn single_cell_matrix_has_no_separators() {
        let raster = RgbRaster::from_raw(vec![9; 5 * 5 * 3], 5, 5);
        let text = matrix_text(&sample_grid(&raster));
        assert_eq!(text, "(9,9,9)");
    }
}
