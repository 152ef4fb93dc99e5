//! Frame pipeline coordination.
//!
//! `FramePipeline` runs the convert -> sample -> render pass for each
//! submitted frame, guarded by an atomic in-flight flag: at most one sampling
//! pass is active at any instant, and a frame arriving while a pass is in
//! flight is discarded immediately, never queued. The capture worker is the
//! single producer, which makes the flag defensive under current scheduling;
//! it is still the documented contract and is enforced unconditionally.
//!
//! No result is published after shutdown has been requested.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::capture::{convert, CameraSource};
use crate::frame::YuvFrame;
use crate::render::{self, PresentationSink};
use crate::sample;

/// What happened to a submitted frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Converted, sampled, and published.
    Published,
    /// A pass was already in flight; the frame was discarded.
    DroppedBusy,
    /// Conversion produced no raster; the cycle was skipped.
    SkippedNoRaster,
    /// Shutdown was requested; nothing was published.
    ShutDown,
}

/// Counters for the frame path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub published: u64,
    pub dropped: u64,
    pub skipped: u64,
}

pub struct FramePipeline<S: PresentationSink> {
    sink: S,
    shutdown: Arc<AtomicBool>,
    in_flight: AtomicBool,
    published: AtomicU64,
    dropped: AtomicU64,
    skipped: AtomicU64,
}

impl<S: PresentationSink> FramePipeline<S> {
    pub fn new(sink: S, shutdown: Arc<AtomicBool>) -> Self {
        Self {
            sink,
            shutdown,
            in_flight: AtomicBool::new(false),
            published: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Run one sampling pass for `frame`, unless one is already in flight or
    /// shutdown has been requested.
    pub fn submit(&self, frame: YuvFrame) -> SubmitOutcome {
        if self.shutdown.load(Ordering::Acquire) {
            return SubmitOutcome::ShutDown;
        }
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return SubmitOutcome::DroppedBusy;
        }

        let outcome = self.run_pass(frame);
        self.in_flight.store(false, Ordering::Release);
        outcome
    }

    fn run_pass(&self, frame: YuvFrame) -> SubmitOutcome {
        let raster = match convert::yuv_to_rgb(&frame) {
            Ok(raster) => raster,
            Err(err) => {
                log::warn!("frame conversion failed, skipping cycle: {:#}", err);
                self.skipped.fetch_add(1, Ordering::Relaxed);
                return SubmitOutcome::SkippedNoRaster;
            }
        };

        let matrix = sample::sample_grid(&raster);
        if self.shutdown.load(Ordering::Acquire) {
            return SubmitOutcome::ShutDown;
        }
        self.sink.publish_matrix(&render::matrix_text(&matrix));
        self.published.fetch_add(1, Ordering::Relaxed);
        SubmitOutcome::Published
    }

    pub fn stats(&self) -> PipelineStats {
        PipelineStats {
            published: self.published.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }
}

/// Spawn the dedicated capture worker: pull frames from `source`, submit each
/// to the pipeline, and pace to the source's target rate. Capture errors are
/// logged and retried after a grace period; the worker exits promptly once
/// shutdown is requested.
pub fn spawn_capture_worker<S>(
    mut source: CameraSource,
    pipeline: Arc<FramePipeline<S>>,
    shutdown: Arc<AtomicBool>,
) -> JoinHandle<()>
where
    S: PresentationSink + 'static,
{
    thread::spawn(move || {
        let frame_interval = source.frame_interval();
        let mut last_health_log = Instant::now();

        while !shutdown.load(Ordering::Acquire) {
            match source.next_frame() {
                Ok(frame) => {
                    pipeline.submit(frame);
                    thread::sleep(frame_interval);
                }
                Err(err) => {
                    log::warn!("frame capture failed: {:#}", err);
                    thread::sleep(frame_interval.max(Duration::from_millis(250)));
                }
            }

            if last_health_log.elapsed() >= Duration::from_secs(5) {
                let stats = source.stats();
                log::info!(
                    "capture health={} frames={} device={}",
                    source.is_healthy(),
                    stats.frames_captured,
                    stats.device
                );
                last_health_log = Instant::now();
            }
        }

        log::debug!(
            "capture worker stopped after {} frames",
            source.stats().frames_captured
        );
    })
}
