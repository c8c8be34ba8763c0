use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{LinesightError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    pub stream_interval_ms: u64,
}

/// Fixed camera geometry: scale of the ground footprint and the pixel
/// dimensions of the rendered canvas clicks are reported against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    pub altitude_m: f64,
    pub hfov_deg: f64,
    pub vfov_deg: f64,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UplinkConfig {
    pub relay_url: String,
    pub upload_interval_ms: u64,
    pub max_retries: u8,
    /// Poll the relay for flushed outage points every N upload ticks.
    /// Zero disables polling.
    pub flush_poll_ticks: u32,
    /// Replay pre-encoded frames from this directory instead of rendering
    /// synthetic ones.
    pub frame_dir: Option<String>,
    pub start_position: (f64, f64),
    pub drift_per_frame: (f64, f64),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpsConfig {
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinesightConfig {
    pub server: ServerConfig,
    pub camera: CameraConfig,
    pub uplink: UplinkConfig,
    pub ops: OpsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".into(),
            port: 5000,
            stream_interval_ms: 33,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            altitude_m: 25.0,
            hfov_deg: 95.0,
            vfov_deg: 75.0,
            canvas_width: 640,
            canvas_height: 480,
        }
    }
}

impl Default for UplinkConfig {
    fn default() -> Self {
        Self {
            relay_url: "http://127.0.0.1:5000".into(),
            upload_interval_ms: 200,
            max_retries: 3,
            flush_poll_ticks: 10,
            frame_dir: None,
            start_position: (0.0, 0.0),
            drift_per_frame: (0.0, 0.0),
        }
    }
}

impl Default for OpsConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
        }
    }
}

impl Default for LinesightConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            camera: CameraConfig::default(),
            uplink: UplinkConfig::default(),
            ops: OpsConfig::default(),
        }
    }
}

impl LinesightConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref).map_err(|err| {
            LinesightError::Configuration(format!(
                "unable to read config file {}: {err}",
                path_ref.display()
            ))
        })?;
        toml::from_str(&contents).map_err(|err| {
            LinesightError::Configuration(format!(
                "failed to parse config file {}: {err}",
                path_ref.display()
            ))
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(LinesightError::Configuration(
                "server.port must be a valid port (>0)".into(),
            ));
        }
        if self.server.stream_interval_ms == 0 {
            return Err(LinesightError::Configuration(
                "server.stream_interval_ms must be greater than zero".into(),
            ));
        }
        if self.camera.altitude_m <= 0.0 {
            return Err(LinesightError::Configuration(
                "camera.altitude_m must be greater than zero".into(),
            ));
        }
        if !(0.0..180.0).contains(&self.camera.hfov_deg) || self.camera.hfov_deg == 0.0 {
            return Err(LinesightError::Configuration(
                "camera.hfov_deg must be within (0, 180)".into(),
            ));
        }
        if !(0.0..180.0).contains(&self.camera.vfov_deg) || self.camera.vfov_deg == 0.0 {
            return Err(LinesightError::Configuration(
                "camera.vfov_deg must be within (0, 180)".into(),
            ));
        }
        if self.camera.canvas_width == 0 || self.camera.canvas_height == 0 {
            return Err(LinesightError::Configuration(
                "camera canvas dimensions must be greater than zero".into(),
            ));
        }
        if self.uplink.relay_url.is_empty() {
            return Err(LinesightError::Configuration(
                "uplink.relay_url must not be empty".into(),
            ));
        }
        if self.uplink.upload_interval_ms == 0 {
            return Err(LinesightError::Configuration(
                "uplink.upload_interval_ms must be greater than zero".into(),
            ));
        }
        if self.uplink.max_retries == 0 {
            return Err(LinesightError::Configuration(
                "uplink.max_retries must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
