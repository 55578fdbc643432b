//! Foreground isolation against a bright, uniform backdrop

use crate::frame::Frame;
use crate::mask::BinaryMask;
use crate::types::PipelineConfig;
use image::imageops::grayscale;
use image::GrayImage;
use imageproc::contrast::otsu_level;
use imageproc::filter::separable_filter_equal;

/// Separates piece pixels from the backdrop
///
/// Intensity is smoothed, thresholded at the Otsu level (pixels at or below
/// the level are foreground) and cleaned with opening then closing.
#[derive(Debug, Clone)]
pub struct ForegroundIsolator {
    blur_kernel: Vec<f32>,
    kernel_radius: u32,
    open_rounds: u32,
    close_rounds: u32,
}

impl ForegroundIsolator {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            blur_kernel: gaussian_kernel(config.blur_kernel_size),
            kernel_radius: config.kernel_radius(),
            open_rounds: config.foreground_open_rounds,
            close_rounds: config.foreground_close_rounds,
        }
    }

    /// Build the foreground mask of a frame
    pub fn isolate(&self, frame: &Frame) -> BinaryMask {
        let gray = grayscale(frame.as_rgb());
        let smoothed = self.smooth(&gray);
        let level = otsu_level(&smoothed);

        let raw = BinaryMask::from_fn(smoothed.width(), smoothed.height(), |x, y| {
            smoothed.get_pixel(x, y)[0] <= level
        });

        let mask = raw
            .open(self.kernel_radius, self.open_rounds)
            .close(self.kernel_radius, self.close_rounds);

        if mask.is_empty() || mask.is_full() {
            log::warn!(
                "Degenerate foreground (otsu level {}, {} of {} pixels set)",
                level,
                mask.count(),
                smoothed.width() as usize * smoothed.height() as usize
            );
        } else {
            log::debug!(
                "Foreground: otsu level {}, {} pixels",
                level,
                mask.count()
            );
        }

        mask
    }

    fn smooth(&self, gray: &GrayImage) -> GrayImage {
        if self.blur_kernel.len() <= 1 {
            return gray.clone();
        }
        separable_filter_equal(gray, &self.blur_kernel)
    }
}

/// Normalized 1-D Gaussian of `size` taps.
///
/// Small sizes use the binomial tables; larger ones derive sigma from the size.
pub fn gaussian_kernel(size: u32) -> Vec<f32> {
    match size {
        0 | 1 => vec![1.0],
        3 => vec![0.25, 0.5, 0.25],
        5 => vec![0.0625, 0.25, 0.375, 0.25, 0.0625],
        7 => vec![0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125],
        _ => {
            let sigma = 0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8;
            let center = (size / 2) as f32;
            let weights: Vec<f32> = (0..size)
                .map(|i| {
                    let d = i as f32 - center;
                    (-(d * d) / (2.0 * sigma * sigma)).exp()
                })
                .collect();
            let sum: f32 = weights.iter().sum();
            weights.into_iter().map(|w| w / sum).collect()
        }
    }
}
