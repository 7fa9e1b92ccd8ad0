// What you SEE:
// • A borderless window: live camera on top, control panel below.
// • Black and White / Mirror / Detect Face checkboxes change the live image.
// • R/G/B sliders shift each color channel; Reset Colors zeroes them.
// • Snap writes the current image as <name><MM-DD_HH.MM.SS>.png into Save Path.
// • Exit (or ESC) quits.

mod app;
mod camera;
mod cli;
mod config;
mod controls;
mod dialogs;
mod draw;
mod effects;
mod error;
mod face;
mod panel;
mod pipeline;
mod snapshot;
mod types;

use app::App;
use camera::CameraCapture;
use clap::Parser;
use cli::Args;
use config::Config;
use dialogs::{Dialogs, NativeDialogs};
use error::Error;
use face::{FaceDetector, SeetaFaceDetector};

fn main() -> Result<(), Error> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut config = Config::load(args.config.as_deref())?;
    args.apply_to(&mut config);

    let dialogs = NativeDialogs;

    // No camera, no loop.
    let camera = match CameraCapture::open(&config.camera) {
        Ok(cam) => cam,
        Err(e) => {
            log::error!("{e}");
            dialogs.error("Error", "No webcam found. Closing.");
            return Err(e);
        }
    };

    let detector: Option<Box<dyn FaceDetector>> = match SeetaFaceDetector::load(&config.face) {
        Ok(det) => {
            log::info!("Face model loaded from {}", config.face.model_path.display());
            Some(Box::new(det) as Box<dyn FaceDetector>)
        }
        Err(e) => {
            log::warn!("{e}; Detect Face will show the full frame");
            None
        }
    };

    let mut app = App::new(&config, camera, detector, Box::new(dialogs))?;
    app.run()
}
