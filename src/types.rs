// Core types shared by the loop, the panel and the effects.

use image::{DynamicImage, imageops::FilterType};

/// The packed buffer minifb presents. Each entry is 0x00RRGGBB.
#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    pub fn fill(&mut self, color: u32) {
        self.pixels.iter_mut().for_each(|p| *p = color);
    }

    /// Fill `rect` with `color`, clipped to the buffer.
    pub fn fill_rect(&mut self, rect: Rect, color: u32) {
        let x0 = rect.x.max(0) as usize;
        let y0 = rect.y.max(0) as usize;
        let x1 = ((rect.x + rect.w as i32).max(0) as usize).min(self.width);
        let y1 = ((rect.y + rect.h as i32).max(0) as usize).min(self.height);
        for y in y0..y1 {
            let row = y * self.width;
            self.pixels[row + x0..row + x1.max(x0)].iter_mut().for_each(|p| *p = color);
        }
    }

    /// Scale `frame` to `area` and copy it in. Grayscale frames are shown as gray RGB.
    pub fn blit_image(&mut self, frame: &DynamicImage, area: Rect) {
        let scaled = if frame.width() == area.w && frame.height() == area.h {
            frame.to_rgb8()
        } else {
            // Display only: a cheap filter keeps the loop at camera rate.
            frame.resize_exact(area.w, area.h, FilterType::Triangle).to_rgb8()
        };

        for (x, y, px) in scaled.enumerate_pixels() {
            let dx = area.x + x as i32;
            let dy = area.y + y as i32;
            if dx < 0 || dy < 0 || dx as usize >= self.width || dy as usize >= self.height {
                continue;
            }
            let (r, g, b) = (px[0] as u32, px[1] as u32, px[2] as u32);
            self.pixels[dy as usize * self.width + dx as usize] = (r << 16) | (g << 8) | b;
        }
    }
}

/// Axis-aligned rectangle in window pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && py >= self.y && px < self.x + self.w as i32 && py < self.y + self.h as i32
    }
}
