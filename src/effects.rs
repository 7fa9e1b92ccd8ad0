// Per-frame effects: color offsets, grayscale, face crop and the mirrored view.
// Heavy lifting (color conversion, resize, flip) stays in the `image` crate.

use crate::face::FaceRegion;
use image::{DynamicImage, GrayImage, RgbImage, imageops, imageops::FilterType};

pub const SLIDER_MIN: i32 = -180;
pub const SLIDER_MAX: i32 = 180;

/// Signed offsets added to the red, green and blue channels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelOffsets {
    pub red: i32,
    pub green: i32,
    pub blue: i32,
}

impl ChannelOffsets {
    pub fn is_zero(&self) -> bool {
        self.red == 0 && self.green == 0 && self.blue == 0
    }
}

/// Add a signed offset to one 8-bit channel value, wrapping modulo 256.
#[inline]
pub fn offset_channel(value: u8, offset: i32) -> u8 {
    (value as i32 + offset).rem_euclid(256) as u8
}

/// Shift every pixel's channels by `offsets` in place (8-bit wraparound).
/// Visual: a large red offset turns bright reds dark, since they wrap past 255.
pub fn apply_channel_offsets(img: &mut RgbImage, offsets: ChannelOffsets) {
    if offsets.is_zero() {
        return;
    }
    for px in img.pixels_mut() {
        px[0] = offset_channel(px[0], offsets.red);
        px[1] = offset_channel(px[1], offsets.green);
        px[2] = offset_channel(px[2], offsets.blue);
    }
}

/// Visual: the "Black and White" mode.
pub fn to_grayscale(img: &RgbImage) -> GrayImage {
    imageops::grayscale(img)
}

/// Crop `frame` to `region` and resize the crop to `out_w` x `out_h` (cubic).
///
/// The region is clamped to the frame first; `None` when nothing is left of it.
/// Visual: the face fills the whole video area.
pub fn crop_to_region(
    frame: &DynamicImage,
    region: FaceRegion,
    out_w: u32,
    out_h: u32,
) -> Option<DynamicImage> {
    // 1) Clamp the box to the frame; detectors can report faces half off-screen.
    let (fw, fh) = (frame.width() as i64, frame.height() as i64);
    let x0 = (region.x as i64).clamp(0, fw);
    let y0 = (region.y as i64).clamp(0, fh);
    let x1 = (region.x as i64 + region.width as i64).clamp(0, fw);
    let y1 = (region.y as i64 + region.height as i64).clamp(0, fh);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }

    // 2) Cut it out and scale it up with a cubic filter.
    let crop = frame.crop_imm(x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32);
    Some(crop.resize_exact(out_w, out_h, FilterType::CatmullRom))
}

/// Left half of `frame` next to its horizontally flipped copy.
/// Visual: a symmetric face, the left side reflected onto the right.
pub fn mirror_split(frame: &DynamicImage) -> DynamicImage {
    let half = frame.width() / 2;
    let height = frame.height();
    if half == 0 {
        return frame.clone();
    }

    // 1) Keep the left half, 2) flip it, 3) paste both side by side.
    let left = frame.crop_imm(0, 0, half, height);
    let right = left.fliph();

    let mut out = DynamicImage::new(half * 2, height, frame.color());
    imageops::replace(&mut out, &left, 0, 0);
    imageops::replace(&mut out, &right, half as i64, 0);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Luma, Rgb};

    fn gradient(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| Rgb([(x * 40) as u8, (y * 40) as u8, (x * 7 + y * 3) as u8]))
    }

    #[test]
    fn test_offset_wraps_both_ways() {
        assert_eq!(offset_channel(250, 10), 4);
        assert_eq!(offset_channel(5, -10), 251);
        assert_eq!(offset_channel(100, 0), 100);
        assert_eq!(offset_channel(0, 180), 180);
        assert_eq!(offset_channel(0, -180), 76);
    }

    #[test]
    fn test_offset_then_inverse_is_identity() {
        for offset in SLIDER_MIN..=SLIDER_MAX {
            for value in 0..=255u8 {
                assert_eq!(offset_channel(offset_channel(value, offset), -offset), value);
            }
        }
    }

    #[test]
    fn test_apply_offsets_then_inverse_restores_image() {
        let original = gradient(6, 5);
        let offsets = ChannelOffsets { red: 180, green: -37, blue: -180 };

        let mut img = original.clone();
        apply_channel_offsets(&mut img, offsets);
        assert_ne!(img, original);
        let inverse = ChannelOffsets { red: -offsets.red, green: -offsets.green, blue: -offsets.blue };
        apply_channel_offsets(&mut img, inverse);
        assert_eq!(img, original);
    }

    #[test]
    fn test_offsets_are_per_channel() {
        let mut img = RgbImage::from_pixel(1, 1, Rgb([10, 20, 30]));
        apply_channel_offsets(&mut img, ChannelOffsets { red: 1, green: -2, blue: 3 });
        assert_eq!(img.get_pixel(0, 0), &Rgb([11, 18, 33]));
    }

    #[test]
    fn test_grayscale_is_single_channel() {
        let gray = to_grayscale(&RgbImage::from_pixel(2, 2, Rgb([0, 0, 0])));
        assert_eq!(gray.dimensions(), (2, 2));
        assert_eq!(gray.get_pixel(1, 1), &Luma([0]));
    }

    #[test]
    fn test_crop_resizes_to_output() {
        let frame = DynamicImage::ImageRgb8(gradient(100, 80));
        let region = FaceRegion { x: 10, y: 10, width: 30, height: 20 };
        let out = crop_to_region(&frame, region, 64, 48).unwrap();
        assert_eq!(out.dimensions(), (64, 48));
    }

    #[test]
    fn test_crop_clamps_region_past_edges() {
        let frame = DynamicImage::ImageRgb8(RgbImage::from_pixel(20, 20, Rgb([9, 9, 9])));
        let region = FaceRegion { x: -5, y: 15, width: 10, height: 50 };
        let out = crop_to_region(&frame, region, 8, 8).unwrap();
        assert_eq!(out.dimensions(), (8, 8));
    }

    #[test]
    fn test_crop_outside_frame_is_none() {
        let frame = DynamicImage::ImageRgb8(gradient(20, 20));
        let region = FaceRegion { x: 30, y: 0, width: 10, height: 10 };
        assert!(crop_to_region(&frame, region, 8, 8).is_none());
    }

    #[test]
    fn test_mirror_split_duplicates_left_half_flipped() {
        let frame = DynamicImage::ImageRgb8(gradient(4, 2));
        let src = frame.to_rgb8();
        let out = mirror_split(&frame).to_rgb8();

        assert_eq!(out.dimensions(), (4, 2));
        for y in 0..2 {
            assert_eq!(out.get_pixel(0, y), src.get_pixel(0, y));
            assert_eq!(out.get_pixel(1, y), src.get_pixel(1, y));
            assert_eq!(out.get_pixel(2, y), src.get_pixel(1, y));
            assert_eq!(out.get_pixel(3, y), src.get_pixel(0, y));
        }
    }

    #[test]
    fn test_mirror_split_keeps_grayscale() {
        let frame = DynamicImage::ImageLuma8(GrayImage::from_pixel(6, 3, Luma([42])));
        let out = mirror_split(&frame);
        assert!(out.as_luma8().is_some());
        assert_eq!(out.dimensions(), (6, 3));
    }
}
