//! Per-class color masks restricted to the foreground

use crate::color::HsvPlane;
use crate::mask::BinaryMask;
use crate::types::{ColorClassSpec, PipelineConfig};

/// Builds the cleaned mask of one color class
#[derive(Debug, Clone)]
pub struct ClassMaskBuilder {
    kernel_radius: u32,
    open_rounds: u32,
    close_rounds: u32,
    dilate_rounds: u32,
}

impl ClassMaskBuilder {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            kernel_radius: config.kernel_radius(),
            open_rounds: config.class_open_rounds,
            close_rounds: config.class_close_rounds,
            dilate_rounds: config.class_dilate_rounds,
        }
    }

    /// Pixels inside the class bounds, before any cleanup
    pub fn raw_mask(&self, hsv: &HsvPlane, spec: &ColorClassSpec) -> BinaryMask {
        let (width, height) = hsv.dimensions();
        BinaryMask::from_fn(width, height, |x, y| spec.matches(hsv.get(x, y)))
    }

    /// Class pixels AND foreground, opened, closed, then slightly dilated
    pub fn build(
        &self,
        hsv: &HsvPlane,
        foreground: &BinaryMask,
        spec: &ColorClassSpec,
    ) -> BinaryMask {
        let r = self.kernel_radius;
        let masked = self.raw_mask(hsv, spec).and(foreground);

        let cleaned = masked
            .open(r, self.open_rounds)
            .close(r, self.close_rounds)
            .dilate(r, self.dilate_rounds);

        log::debug!(
            "Class '{}': {} raw pixels, {} after cleanup",
            spec.name,
            masked.count(),
            cleaned.count()
        );

        cleaned
    }
}
