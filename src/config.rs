use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const DEFAULT_DEVICE: &str = "stub://front_camera";
const DEFAULT_TARGET_FPS: u32 = 10;
const DEFAULT_WIDTH: u32 = 640;
const DEFAULT_HEIGHT: u32 = 480;
const DEFAULT_TELEMETRY_INTERVAL_MS: u64 = 100;

#[derive(Debug, Deserialize, Default)]
struct MatrixcamConfigFile {
    capture: Option<CaptureConfigFile>,
    telemetry: Option<TelemetryConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct CaptureConfigFile {
    device: Option<String>,
    target_fps: Option<u32>,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
struct TelemetryConfigFile {
    interval_ms: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct MatrixcamConfig {
    pub capture: CaptureSettings,
    pub telemetry: TelemetrySettings,
}

#[derive(Debug, Clone)]
pub struct CaptureSettings {
    pub device: String,
    pub target_fps: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone)]
pub struct TelemetrySettings {
    pub interval: Duration,
}

impl MatrixcamConfig {
    /// Load configuration: optional JSON file, then environment overrides,
    /// then validation.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let file_cfg = match config_path {
            Some(path) => Some(read_config_file(path)?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: MatrixcamConfigFile) -> Self {
        let capture = CaptureSettings {
            device: file
                .capture
                .as_ref()
                .and_then(|capture| capture.device.clone())
                .unwrap_or_else(|| DEFAULT_DEVICE.to_string()),
            target_fps: file
                .capture
                .as_ref()
                .and_then(|capture| capture.target_fps)
                .unwrap_or(DEFAULT_TARGET_FPS),
            width: file
                .capture
                .as_ref()
                .and_then(|capture| capture.width)
                .unwrap_or(DEFAULT_WIDTH),
            height: file
                .capture
                .and_then(|capture| capture.height)
                .unwrap_or(DEFAULT_HEIGHT),
        };
        let telemetry = TelemetrySettings {
            interval: Duration::from_millis(
                file.telemetry
                    .and_then(|telemetry| telemetry.interval_ms)
                    .unwrap_or(DEFAULT_TELEMETRY_INTERVAL_MS),
            ),
        };
        Self { capture, telemetry }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(device) = std::env::var("MATRIXCAM_DEVICE") {
            if !device.trim().is_empty() {
                self.capture.device = device;
            }
        }
        if let Ok(fps) = std::env::var("MATRIXCAM_TARGET_FPS") {
            let fps: u32 = fps
                .parse()
                .map_err(|_| anyhow!("MATRIXCAM_TARGET_FPS must be an integer frame rate"))?;
            self.capture.target_fps = fps;
        }
        if let Ok(interval) = std::env::var("MATRIXCAM_TELEMETRY_MS") {
            let ms: u64 = interval.parse().map_err(|_| {
                anyhow!("MATRIXCAM_TELEMETRY_MS must be an integer number of milliseconds")
            })?;
            self.telemetry.interval = Duration::from_millis(ms);
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.capture.device.trim().is_empty() {
            return Err(anyhow!("capture device must not be empty"));
        }
        if self.capture.target_fps == 0 {
            return Err(anyhow!("capture target_fps must be at least 1"));
        }
        if self.capture.width == 0 || self.capture.height == 0 {
            return Err(anyhow!("capture resolution must be non-zero"));
        }
        if self.telemetry.interval.is_zero() {
            return Err(anyhow!("telemetry interval must be greater than zero"));
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<MatrixcamConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
