//! matrixcamd - live camera sampling daemon
//!
//! This daemon:
//! 1. Pulls planar-YUV frames from the configured camera source on a
//!    dedicated worker (keep-latest, one frame in flight at a time)
//! 2. Converts each frame to RGB and samples a bounded pixel grid
//! 3. Publishes the sampled grid as text
//! 4. Runs the telemetry simulator on an independent periodic ticker and
//!    publishes intrinsics/distortion and motion blocks
//! 5. Degrades to telemetry-only when the camera cannot be bound

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use matrixcam::{
    config::MatrixcamConfig, render, spawn_capture_worker, CameraSource, CaptureConfig,
    FramePipeline, PresentationSink, StdoutPresenter, TelemetryTicker,
};

#[derive(Debug, Parser)]
#[command(name = "matrixcamd", about = "Live camera pixel sampling daemon")]
struct Cli {
    /// Path to a JSON config file.
    #[arg(long, env = "MATRIXCAM_CONFIG")]
    config: Option<PathBuf>,

    /// Camera device override (e.g. /dev/video0, or stub://front_camera for
    /// the synthetic source).
    #[arg(long)]
    device: Option<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut cfg = MatrixcamConfig::load(cli.config.as_deref())?;
    if let Some(device) = cli.device {
        cfg.capture.device = device;
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || shutdown.store(true, Ordering::Release))?;
    }

    let pipeline = Arc::new(FramePipeline::new(StdoutPresenter, shutdown.clone()));

    let capture_config = CaptureConfig {
        device: cfg.capture.device.clone(),
        target_fps: cfg.capture.target_fps,
        width: cfg.capture.width,
        height: cfg.capture.height,
    };

    // Camera binding failures never take the daemon down: log, skip the
    // preview path, and keep the telemetry ticker running.
    let worker = match bind_camera(capture_config) {
        Ok(source) => Some(spawn_capture_worker(
            source,
            pipeline.clone(),
            shutdown.clone(),
        )),
        Err(err) => {
            log::error!("camera unavailable ({:#}); continuing without preview", err);
            None
        }
    };

    let ticker_pipeline = pipeline.clone();
    let mut ticker = TelemetryTicker::spawn(cfg.telemetry.interval, move |telemetry| {
        let sink = ticker_pipeline.sink();
        sink.publish_intrinsics(&render::intrinsics_text(telemetry));
        sink.publish_motion(&render::motion_text(telemetry));
    });

    log::info!(
        "matrixcamd running (device={}, {}x{} @ {} fps, telemetry every {:?})",
        cfg.capture.device,
        cfg.capture.width,
        cfg.capture.height,
        cfg.capture.target_fps,
        cfg.telemetry.interval
    );

    let mut last_stats_log = Instant::now();
    while !shutdown.load(Ordering::Acquire) {
        std::thread::sleep(Duration::from_millis(50));
        if last_stats_log.elapsed() >= Duration::from_secs(5) {
            let stats = pipeline.stats();
            log::info!(
                "pipeline published={} dropped={} skipped={}",
                stats.published,
                stats.dropped,
                stats.skipped
            );
            last_stats_log = Instant::now();
        }
    }

    log::info!("shutdown requested");
    ticker.cancel();
    if let Some(worker) = worker {
        let _ = worker.join();
    }

    let stats = pipeline.stats();
    log::info!(
        "final stats: published={} dropped={} skipped={}",
        stats.published,
        stats.dropped,
        stats.skipped
    );
    Ok(())
}

fn bind_camera(config: CaptureConfig) -> Result<CameraSource> {
    let mut source = CameraSource::new(config)?;
    source.connect()?;
    Ok(source)
}
