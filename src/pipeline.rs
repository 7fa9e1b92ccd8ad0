// The per-iteration frame decision pipeline:
// color (or grayscale) -> optional face crop -> optional mirrored view.

use crate::controls::Controls;
use crate::effects::{apply_channel_offsets, crop_to_region, mirror_split, to_grayscale};
use crate::face::FaceDetector;
use image::{DynamicImage, RgbImage};

/// Result of one pass through the pipeline.
pub struct Processed {
    /// The frame a snapshot saves: effects and face crop applied, never mirrored.
    pub frame: DynamicImage,
    /// What goes on screen.
    pub view: DynamicImage,
}

pub struct FrameProcessor {
    face_size: (u32, u32),
}

impl FrameProcessor {
    /// `face_size` is what a detected face crop is resized to.
    pub fn new(face_size: (u32, u32)) -> Self {
        Self { face_size }
    }

    pub fn process<D: FaceDetector + ?Sized>(
        &self,
        raw: RgbImage,
        controls: &Controls,
        detector: Option<&mut D>,
    ) -> Processed {
        // 1) Find a face on the raw capture, before any color effect.
        let face = match (controls.detect_face, detector) {
            (true, Some(det)) => det.first_face(&raw),
            _ => None,
        };

        // 2) Color: grayscale replaces the channel offsets entirely.
        let mut frame = if controls.grayscale {
            DynamicImage::ImageLuma8(to_grayscale(&raw))
        } else {
            let mut rgb = raw;
            apply_channel_offsets(&mut rgb, controls.offsets());
            DynamicImage::ImageRgb8(rgb)
        };

        // 3) Face crop. Visual: without a face the full frame stays.
        if let Some(region) = face {
            let (w, h) = self.face_size;
            if let Some(cropped) = crop_to_region(&frame, region, w, h) {
                frame = cropped;
            }
        }

        // 4) Mirror only changes what is shown, never what Snap saves.
        let view = if controls.mirror { mirror_split(&frame) } else { frame.clone() };
        Processed { frame, view }
    }
}
