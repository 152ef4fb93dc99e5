//! V4L2 device backend.
//!
//! Captures planar YUV 4:2:0 (`YU12`) from a local device node and splits the
//! mapped buffer into luma/chroma planes. The stream runs with a small mmap
//! buffer ring, so frames the consumer does not pull are overwritten in place
//! rather than queued.

use anyhow::{anyhow, Context, Result};
use ouroboros::self_referencing;
use std::time::{Duration, Instant};

use super::camera::{CaptureConfig, CaptureStats};
use crate::frame::{chroma_extent, YuvFrame};

pub(super) struct DeviceCameraSource {
    config: CaptureConfig,
    state: Option<DeviceCameraState>,
    frame_count: u64,
    last_frame_at: Option<Instant>,
    last_error: Option<String>,
    active_width: u32,
    active_height: u32,
}

#[self_referencing]
struct DeviceCameraState {
    device: v4l::Device,
    #[borrows(mut device)]
    #[covariant]
    stream: v4l::prelude::MmapStream<'this, v4l::Device>,
}

impl DeviceCameraSource {
    pub(super) fn new(config: CaptureConfig) -> Result<Self> {
        Ok(Self {
            active_width: config.width,
            active_height: config.height,
            config,
            state: None,
            frame_count: 0,
            last_frame_at: None,
            last_error: None,
        })
    }

    pub(super) fn connect(&mut self) -> Result<()> {
        use v4l::buffer::Type;
        use v4l::video::Capture;

        let mut device = v4l::Device::with_path(&self.config.device).map_err(|err| {
            if err.kind() == std::io::ErrorKind::PermissionDenied {
                anyhow!("camera permission not granted for {}", self.config.device)
            } else {
                anyhow::Error::new(err)
                    .context(format!("open camera device {}", self.config.device))
            }
        })?;

        let mut format = device.format().context("read camera format")?;
        format.width = self.config.width;
        format.height = self.config.height;
        format.fourcc = v4l::FourCC::new(b"YU12");

        let format = device
            .set_format(&format)
            .with_context(|| format!("set format on {}", self.config.device))?;
        if format.fourcc != v4l::FourCC::new(b"YU12") {
            return Err(anyhow!(
                "{} does not support planar YUV capture (negotiated {})",
                self.config.device,
                format.fourcc
            ));
        }

        if self.config.target_fps > 0 {
            let params = v4l::video::capture::Parameters::with_fps(self.config.target_fps);
            if let Err(err) = device.set_params(&params) {
                log::warn!(
                    "CameraSource: failed to set fps on {}: {}",
                    self.config.device,
                    err
                );
            }
        }

        self.active_width = format.width;
        self.active_height = format.height;
        self.last_error = None;

        let state = DeviceCameraStateBuilder {
            device,
            stream_builder: |device| {
                v4l::prelude::MmapStream::with_buffers(device, Type::VideoCapture, 4)
                    .map_err(|err| anyhow::Error::new(err).context("create camera buffer stream"))
            },
        }
        .try_build()
        .map_err(|err| {
            self.last_error = Some(err.to_string());
            err
        })?;
        self.state = Some(state);

        log::info!(
            "CameraSource: connected to {} ({}x{})",
            self.config.device,
            self.active_width,
            self.active_height
        );
        Ok(())
    }

    pub(super) fn next_frame(&mut self) -> Result<YuvFrame> {
        use v4l::io::traits::CaptureStream;

        let state = self.state.as_mut().context("camera device not connected")?;
        let (buf, _meta) = state
            .with_mut(|fields| fields.stream.next())
            .map_err(|err| {
                self.last_error = Some(err.to_string());
                anyhow::Error::new(err).context("capture camera frame")
            })?;

        let frame = split_yu12_planes(buf, self.active_width, self.active_height)?;

        self.frame_count += 1;
        self.last_frame_at = Some(Instant::now());
        Ok(frame)
    }

    pub(super) fn is_healthy(&self) -> bool {
        if self.last_error.is_some() {
            return false;
        }
        let Some(last_frame_at) = self.last_frame_at else {
            return true;
        };
        last_frame_at.elapsed() <= self.health_grace()
    }

    pub(super) fn stats(&self) -> CaptureStats {
        CaptureStats {
            frames_captured: self.frame_count,
            device: self.config.device.clone(),
        }
    }

    pub(super) fn target_fps(&self) -> u32 {
        self.config.target_fps
    }

    fn health_grace(&self) -> Duration {
        let base_ms = if self.config.target_fps == 0 {
            2_000
        } else {
            (1000 / self.config.target_fps).saturating_mul(6)
        };
        Duration::from_millis(base_ms.max(2_000) as u64)
    }
}

/// Split a contiguous YU12 capture buffer into owned Y/U/V planes.
fn split_yu12_planes(buf: &[u8], width: u32, height: u32) -> Result<YuvFrame> {
    let w = width as usize;
    let h = height as usize;
    let chroma_len = chroma_extent(width) * chroma_extent(height);
    let y_len = w
        .checked_mul(h)
        .ok_or_else(|| anyhow!("camera frame dimensions overflow"))?;
    let expected = y_len
        .checked_add(chroma_len * 2)
        .ok_or_else(|| anyhow!("camera frame dimensions overflow"))?;
    if buf.len() < expected {
        return Err(anyhow!(
            "camera buffer too short: expected {} bytes for {}x{}, got {}",
            expected,
            width,
            height,
            buf.len()
        ));
    }

    let y = buf[..y_len].to_vec();
    let u = buf[y_len..y_len + chroma_len].to_vec();
    let v = buf[y_len + chroma_len..y_len + 2 * chroma_len].to_vec();
    Ok(YuvFrame::tightly_packed(y, u, v, width, height))
}
