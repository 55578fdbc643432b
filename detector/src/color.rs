//! RGB ↔ HSV conversion in the 8-bit convention (hue halved to fit 0..180)

use crate::frame::Frame;
use crate::types::Hsv;
use rayon::prelude::*;

/// Convert one RGB pixel.
///
/// V is the channel maximum, S is the chroma scaled by 255/V and H is the hue
/// angle divided by two. Gray pixels get H = S = 0.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> Hsv {
    let (r, g, b) = (r as i32, g as i32, b as i32);
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = v - min;

    let s = if v == 0 {
        0
    } else {
        ((diff * 255) as f32 / v as f32 + 0.5).floor() as i32
    };

    let h = if diff == 0 {
        0
    } else {
        // sixths of the hue circle, in units of `diff`
        let raw = if v == r {
            g - b
        } else if v == g {
            b - r + 2 * diff
        } else {
            r - g + 4 * diff
        };
        let h = (raw as f32 * 30.0 / diff as f32 + 0.5).floor() as i32;
        if h < 0 {
            h + 180
        } else {
            h
        }
    };

    Hsv::new(h as u8, s as u8, v as u8)
}

/// Convert one HSV pixel back to RGB
pub fn hsv_to_rgb(hsv: Hsv) -> [u8; 3] {
    let hue = hsv.h as f32 * 2.0;
    let saturation = hsv.s as f32 / 255.0;
    let value = hsv.v as f32 / 255.0;

    let c = value * saturation;
    let x = c * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
    let m = value - c;

    let (r, g, b) = match (hue / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    [
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    ]
}

/// HSV copy of a frame, computed once and shared by every class
#[derive(Debug, Clone)]
pub struct HsvPlane {
    width: u32,
    height: u32,
    data: Vec<Hsv>,
}

impl HsvPlane {
    pub fn from_frame(frame: &Frame) -> Self {
        let (width, height) = frame.dimensions();
        let data = frame
            .as_rgb()
            .as_raw()
            .par_chunks_exact(3)
            .map(|px| rgb_to_hsv(px[0], px[1], px[2]))
            .collect();

        Self {
            width,
            height,
            data,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn get(&self, x: u32, y: u32) -> Hsv {
        self.data[(y as usize) * (self.width as usize) + x as usize]
    }
}
