//! matrixcam
//!
//! Live camera pixel sampling with simulated calibration telemetry.
//!
//! # Architecture
//!
//! Two independent paths that share no data:
//!
//! 1. **Frame path**: a camera source delivers planar luma/chroma frames on a
//!    dedicated worker; the pipeline converts each frame to RGB, samples a
//!    bounded pixel grid at a fixed stride, and publishes it as text. An
//!    atomic in-flight flag guarantees at most one sampling pass at a time;
//!    excess frames are dropped, never queued.
//! 2. **Telemetry path**: a periodic ticker advances a deterministic
//!    simulator of camera intrinsics, lens distortion, and 6-DOF motion, and
//!    publishes the formatted values.
//!
//! # Module Structure
//!
//! - `capture`: camera sources and luma/chroma conversion
//! - `frame`: frame and raster types
//! - `sample`: strided pixel sampling
//! - `telemetry`: the tick-driven simulator
//! - `ticker`: periodic telemetry scheduling with idempotent cancellation
//! - `pipeline`: the frame pipeline coordinator and capture worker
//! - `render`: presentation text formatting
//! - `config`: daemon configuration

pub mod capture;
pub mod config;
pub mod frame;
pub mod pipeline;
pub mod render;
pub mod sample;
pub mod telemetry;
pub mod ticker;

pub use capture::{CameraSource, CaptureConfig, CaptureStats};
pub use frame::{Rgb, RgbRaster, YuvFrame};
pub use pipeline::{spawn_capture_worker, FramePipeline, PipelineStats, SubmitOutcome};
pub use render::{PresentationSink, StdoutPresenter};
pub use sample::{sample_grid, SampleMatrix, MAX_SAMPLE_COLS, MAX_SAMPLE_ROWS, SAMPLE_STRIDE};
pub use telemetry::{Telemetry, TelemetrySimulator};
pub use ticker::TelemetryTicker;
