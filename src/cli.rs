// CLI argument parsing with clap.

use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

/// Webcam preview with color effects, face crop, mirror view and snapshots
#[derive(Parser, Debug)]
#[command(name = "snapcam")]
#[command(version, about = "Webcam preview and snapshot tool", long_about = None)]
pub struct Args {
    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Camera device index
    #[arg(long)]
    pub camera: Option<u32>,

    /// SeetaFace model used for face detection
    #[arg(long)]
    pub face_model: Option<PathBuf>,

    /// Folder pre-filled in the "Save Path" field
    #[arg(long)]
    pub save_path: Option<PathBuf>,

    /// Log at debug level (RUST_LOG still wins)
    #[arg(long, short)]
    pub verbose: bool,
}

impl Args {
    /// Flags given on the command line override the config file.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(index) = self.camera {
            config.camera.index = index;
        }
        if let Some(model) = &self.face_model {
            config.face.model_path = model.clone();
        }
        if let Some(path) = &self.save_path {
            config.snapshot.path = Some(path.clone());
        }
    }
}
