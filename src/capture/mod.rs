//! Frame capture.
//!
//! This module provides the camera-facing half of the frame path:
//! - `CameraSource`: planar-YUV frame sources (synthetic `stub://` backend,
//!   plus a real V4L2 device behind the `capture-v4l2` feature)
//! - `convert`: planar luma/chroma to interleaved RGB conversion
//!
//! Sources deliver frames at a fixed target resolution and never queue more
//! than one pending frame; a slow consumer only ever sees the most recent
//! capture.

mod camera;
pub mod convert;
#[cfg(feature = "capture-v4l2")]
mod v4l2;

pub use camera::{CameraSource, CaptureConfig, CaptureStats};
