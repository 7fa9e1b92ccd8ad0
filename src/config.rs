// Configuration file handling for snapcam.
//
// Loads configuration from `<config dir>/snapcam/config.toml` or a custom path.
// Every field has a default, so a partial file (or no file at all) is fine.

use crate::panel::MIN_VIDEO_WIDTH;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub face: FaceConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CameraConfig {
    pub index: u32,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self { index: 0, width: 640, height: 480, fps: 30 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub x: isize,
    pub y: isize,
    /// Size of the live image area; the control panel sits below it.
    pub video_width: usize,
    pub video_height: usize,
    /// Poll interval of the capture-and-render loop.
    pub poll_ms: u64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Face Detection".to_string(),
            x: 100,
            y: 100,
            video_width: 640,
            video_height: 480,
            poll_ms: 20,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Initial contents of the "Save Name" field.
    pub name: String,
    /// Initial contents of the "Save Path" field.
    pub path: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
    /// chrono format string; `/` is replaced with `-` before use in a file name.
    pub timestamp_format: String,
    pub cooldown_ms: u64,
    /// Largest width or height a snapshot may be resized to.
    pub max_dimension: u32,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            path: None,
            width: 640,
            height: 480,
            timestamp_format: "%m/%d_%I.%M.%S".to_string(),
            cooldown_ms: 1000,
            max_dimension: 8192,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FaceConfig {
    /// SeetaFace frontal model (`seeta_fd_frontal_v1.0.bin`).
    pub model_path: PathBuf,
    pub min_face_size: u32,
    pub score_threshold: f64,
    pub pyramid_scale: f32,
    pub window_step: u32,
    /// The face crop is resized to this before display.
    pub output_width: u32,
    pub output_height: u32,
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/seeta_fd_frontal_v1.0.bin"),
            min_face_size: 40,
            score_threshold: 2.0,
            pyramid_scale: 0.8,
            window_step: 4,
            output_width: 640,
            output_height: 480,
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        config.validate()?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject values the window or snapshot code cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.video_width < MIN_VIDEO_WIDTH {
            return Err(ConfigError::Invalid(format!(
                "window.video_width must be at least {MIN_VIDEO_WIDTH}, got {}",
                self.window.video_width
            )));
        }
        if self.window.video_height == 0 {
            return Err(ConfigError::Invalid("window.video_height must be positive".to_string()));
        }
        if self.snapshot.max_dimension == 0 {
            return Err(ConfigError::Invalid("snapshot.max_dimension must be positive".to_string()));
        }
        Ok(())
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("snapcam")
        .join("config.toml")
}
