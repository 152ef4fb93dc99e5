//! Camera frame source.
//!
//! `CameraSource` produces planar `YuvFrame`s at a fixed target resolution.
//! Two backends:
//! - a synthetic source for `stub://` device paths (tests and the
//!   out-of-the-box default), and
//! - a real V4L2 device behind the `capture-v4l2` feature.
//!
//! Sources hand each frame to the pipeline and retain nothing; the device
//! backend reuses a small buffer ring, so a slow consumer only ever sees the
//! most recent frame.

use anyhow::Result;
use std::time::Duration;

use crate::frame::{chroma_extent, YuvFrame};

/// Configuration for a camera source.
#[derive(Clone, Debug)]
pub struct CaptureConfig {
    /// Device path (e.g., "/dev/video0"), or "stub://..." for the synthetic
    /// backend.
    pub device: String,
    /// Target frame rate (frames per second).
    pub target_fps: u32,
    /// Target frame width.
    pub width: u32,
    /// Target frame height.
    pub height: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            device: "stub://front_camera".to_string(),
            target_fps: 10,
            width: 640,
            height: 480,
        }
    }
}

/// Camera frame source.
pub struct CameraSource {
    backend: CameraBackend,
}

enum CameraBackend {
    Synthetic(SyntheticCameraSource),
    #[cfg(feature = "capture-v4l2")]
    Device(super::v4l2::DeviceCameraSource),
}

impl CameraSource {
    pub fn new(config: CaptureConfig) -> Result<Self> {
        if config.device.starts_with("stub://") {
            Ok(Self {
                backend: CameraBackend::Synthetic(SyntheticCameraSource::new(config)),
            })
        } else {
            #[cfg(feature = "capture-v4l2")]
            {
                Ok(Self {
                    backend: CameraBackend::Device(super::v4l2::DeviceCameraSource::new(config)?),
                })
            }
            #[cfg(not(feature = "capture-v4l2"))]
            {
                anyhow::bail!("real camera capture requires the capture-v4l2 feature")
            }
        }
    }

    /// Bind to the camera. For a real device this opens the node, negotiates
    /// the pixel format, and starts streaming; failures here (permission not
    /// granted, device busy, unsupported format) leave the daemon running
    /// without a preview.
    pub fn connect(&mut self) -> Result<()> {
        match &mut self.backend {
            CameraBackend::Synthetic(source) => source.connect(),
            #[cfg(feature = "capture-v4l2")]
            CameraBackend::Device(source) => source.connect(),
        }
    }

    /// Capture the next frame.
    pub fn next_frame(&mut self) -> Result<YuvFrame> {
        match &mut self.backend {
            CameraBackend::Synthetic(source) => source.next_frame(),
            #[cfg(feature = "capture-v4l2")]
            CameraBackend::Device(source) => source.next_frame(),
        }
    }

    /// Check if the source is healthy.
    pub fn is_healthy(&self) -> bool {
        match &self.backend {
            CameraBackend::Synthetic(source) => source.is_healthy(),
            #[cfg(feature = "capture-v4l2")]
            CameraBackend::Device(source) => source.is_healthy(),
        }
    }

    /// Get frame statistics.
    pub fn stats(&self) -> CaptureStats {
        match &self.backend {
            CameraBackend::Synthetic(source) => source.stats(),
            #[cfg(feature = "capture-v4l2")]
            CameraBackend::Device(source) => source.stats(),
        }
    }

    /// Pacing interval derived from the target frame rate.
    pub fn frame_interval(&self) -> Duration {
        let fps = match &self.backend {
            CameraBackend::Synthetic(source) => source.config.target_fps,
            #[cfg(feature = "capture-v4l2")]
            CameraBackend::Device(source) => source.target_fps(),
        };
        Duration::from_millis(1000 / u64::from(fps.max(1)))
    }
}

/// Statistics for a camera source.
#[derive(Clone, Debug)]
pub struct CaptureStats {
    pub frames_captured: u64,
    pub device: String,
}

// ----------------------------------------------------------------------------
// Synthetic source (stub://) for tests and the default configuration
// ----------------------------------------------------------------------------

struct SyntheticCameraSource {
    config: CaptureConfig,
    frame_count: u64,
    /// Simulated "scene" state so the pattern changes occasionally.
    scene_state: u8,
}

impl SyntheticCameraSource {
    fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            frame_count: 0,
            scene_state: 0,
        }
    }

    /// Synthetic sources are always "connected".
    fn connect(&mut self) -> Result<()> {
        log::info!(
            "CameraSource: connected to {} (synthetic, {}x{})",
            self.config.device,
            self.config.width,
            self.config.height
        );
        Ok(())
    }

    fn next_frame(&mut self) -> Result<YuvFrame> {
        self.frame_count += 1;
        Ok(self.generate_synthetic_frame())
    }

    /// Generate a deterministic planar test pattern.
    ///
    /// The luma plane is a diagonal gradient that shifts with the frame
    /// count; the chroma planes tint the scene and change with the scene
    /// state to simulate occasional motion.
    fn generate_synthetic_frame(&mut self) -> YuvFrame {
        let w = self.config.width as usize;
        let h = self.config.height as usize;
        let chroma_w = chroma_extent(self.config.width);
        let chroma_h = chroma_extent(self.config.height);

        if self.frame_count % 50 == 0 {
            self.scene_state = self.scene_state.wrapping_add(1);
        }

        let mut y = vec![0u8; w * h];
        for row in 0..h {
            for col in 0..w {
                y[row * w + col] = ((row + col + self.frame_count as usize) % 256) as u8;
            }
        }

        let mut u = vec![0u8; chroma_w * chroma_h];
        let mut v = vec![0u8; chroma_w * chroma_h];
        for (i, (u_px, v_px)) in u.iter_mut().zip(v.iter_mut()).enumerate() {
            *u_px = (128 + (i % 16) as i32 + self.scene_state as i32).clamp(0, 255) as u8;
            *v_px = (128 - (i % 16) as i32 - self.scene_state as i32).clamp(0, 255) as u8;
        }

        YuvFrame::tightly_packed(y, u, v, self.config.width, self.config.height)
    }

    fn is_healthy(&self) -> bool {
        true
    }

    fn stats(&self) -> CaptureStats {
        CaptureStats {
            frames_captured: self.frame_count,
            device: self.config.device.clone(),
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
