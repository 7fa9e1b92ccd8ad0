// Face detection seam. The loop only needs "where is the first face?";
// the actual detector is rustface's SeetaFace cascade.

use crate::config::FaceConfig;
use crate::error::Error;
use image::{RgbImage, imageops};
use rustface::ImageData;

/// Bounding box of a detected face, in frame pixel coordinates.
/// May extend past the frame edges; callers clamp it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceRegion {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

pub trait FaceDetector {
    /// All faces found in `frame`, strongest first.
    fn detect(&mut self, frame: &RgbImage) -> Vec<FaceRegion>;

    /// The face the loop crops to, if any.
    fn first_face(&mut self, frame: &RgbImage) -> Option<FaceRegion> {
        self.detect(frame).into_iter().next()
    }
}

pub struct SeetaFaceDetector {
    inner: Box<dyn rustface::Detector>,
}

impl SeetaFaceDetector {
    /// Load the SeetaFace model named in `cfg` and tune the cascade.
    pub fn load(cfg: &FaceConfig) -> Result<Self, Error> {
        let path = cfg.model_path.to_string_lossy();
        let mut inner = rustface::create_detector(&path)
            .map_err(|e| Error::FaceModel(format!("{}: {e}", cfg.model_path.display())))?;

        inner.set_min_face_size(cfg.min_face_size);
        inner.set_score_thresh(cfg.score_threshold);
        inner.set_pyramid_scale_factor(cfg.pyramid_scale);
        inner.set_slide_window_step(cfg.window_step, cfg.window_step);

        Ok(Self { inner })
    }
}

impl FaceDetector for SeetaFaceDetector {
    fn detect(&mut self, frame: &RgbImage) -> Vec<FaceRegion> {
        // The cascade works on luminance only.
        let gray = imageops::grayscale(frame);
        let (w, h) = gray.dimensions();
        let mut data = ImageData::new(gray.as_raw(), w, h);

        let mut faces = self.inner.detect(&mut data);
        faces.sort_by(|a, b| b.score().total_cmp(&a.score()));

        let regions: Vec<FaceRegion> = faces
            .iter()
            .map(|f| {
                let bbox = f.bbox();
                FaceRegion { x: bbox.x(), y: bbox.y(), width: bbox.width(), height: bbox.height() }
            })
            .collect();
        log::debug!("Detected {} face(s)", regions.len());
        regions
    }
}
