//! Planar YUV 4:2:0 to interleaved RGB conversion.
//!
//! BT.601 full-range conversion. The only contract is: same input planes,
//! same output colors, every output coordinate covered exactly once. A frame
//! whose planes do not match its declared geometry converts to an error, which
//! the pipeline treats as "no frame available" for that cycle.

use anyhow::{anyhow, Result};

use crate::frame::{RgbRaster, YuvFrame};

pub fn yuv_to_rgb(frame: &YuvFrame) -> Result<RgbRaster> {
    let w = frame.width as usize;
    let h = frame.height as usize;
    if w == 0 || h == 0 {
        return Err(anyhow!("empty frame ({}x{})", frame.width, frame.height));
    }

    let chroma_w = frame.chroma_width();
    let chroma_h = frame.chroma_height();
    if frame.y_stride < w {
        return Err(anyhow!(
            "luma stride {} shorter than width {}",
            frame.y_stride,
            w
        ));
    }
    if frame.chroma_stride < chroma_w {
        return Err(anyhow!(
            "chroma stride {} shorter than chroma width {}",
            frame.chroma_stride,
            chroma_w
        ));
    }

    let y_expected = frame
        .y_stride
        .checked_mul(h)
        .ok_or_else(|| anyhow!("luma plane dimensions overflow"))?;
    let chroma_expected = frame
        .chroma_stride
        .checked_mul(chroma_h)
        .ok_or_else(|| anyhow!("chroma plane dimensions overflow"))?;

    let y_plane = frame.y_plane();
    let u_plane = frame.u_plane();
    let v_plane = frame.v_plane();
    if y_plane.len() != y_expected {
        return Err(anyhow!(
            "luma plane length mismatch: expected {}, got {}",
            y_expected,
            y_plane.len()
        ));
    }
    if u_plane.len() != chroma_expected || v_plane.len() != chroma_expected {
        return Err(anyhow!(
            "chroma plane length mismatch: expected {}, got {}/{}",
            chroma_expected,
            u_plane.len(),
            v_plane.len()
        ));
    }

    let rgb_len = w
        .checked_mul(h)
        .and_then(|v| v.checked_mul(3))
        .ok_or_else(|| anyhow!("raster dimensions overflow"))?;

    let mut rgb = vec![0u8; rgb_len];
    for j in 0..h {
        for i in 0..w {
            let y = y_plane[j * frame.y_stride + i] as f32;
            let chroma_index = (j / 2) * frame.chroma_stride + i / 2;
            let u = u_plane[chroma_index] as f32 - 128.0;
            let v = v_plane[chroma_index] as f32 - 128.0;

            let r = y + 1.402_f32 * v;
            let g = y - 0.344_136_f32 * u - 0.714_136_f32 * v;
            let b = y + 1.772_f32 * u;

            let offset = (j * w + i) * 3;
            rgb[offset] = clamp_to_u8(r);
            rgb[offset + 1] = clamp_to_u8(g);
            rgb[offset + 2] = clamp_to_u8(b);
        }
    }

    Ok(RgbRaster::from_raw(rgb, frame.width, frame.height))
}

fn clamp_to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
