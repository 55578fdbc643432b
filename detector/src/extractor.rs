//! Region extraction: connected components of a class mask into candidate detections

use crate::error::Result;
use crate::mask::BinaryMask;
use crate::types::{Detection, PipelineConfig};
use boxmerge::PixelBox;
use image::Luma;
use imageproc::region_labelling::{connected_components, Connectivity};
use std::collections::BTreeMap;

/// Running extent and size of one labelled component
#[derive(Debug, Clone, Copy)]
struct ComponentStats {
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
    pixel_count: u32,
}

impl ComponentStats {
    fn new(x: u32, y: u32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
            pixel_count: 1,
        }
    }

    fn add(&mut self, x: u32, y: u32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
        self.pixel_count += 1;
    }

    fn bounding_box(&self) -> PixelBox {
        PixelBox::from_corners(self.min_x, self.min_y, self.max_x + 1, self.max_y + 1)
    }
}

/// Turns a cleaned class mask into padded candidate detections
#[derive(Debug, Clone)]
pub struct RegionExtractor {
    min_area: u32,
    padding: u32,
}

impl RegionExtractor {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            min_area: config.min_area,
            padding: config.padding,
        }
    }

    /// One detection per 8-connected component of at least `min_area` pixels.
    ///
    /// Boxes are padded and clamped to the mask bounds; the anchor is the
    /// padded box center. Components come out in label order.
    pub fn extract(&self, mask: &BinaryMask, color_class: &str) -> Result<Vec<Detection>> {
        let (width, height) = mask.dimensions();
        let labels = connected_components(mask.as_gray(), Connectivity::Eight, Luma([0u8]));

        let mut components: BTreeMap<u32, ComponentStats> = BTreeMap::new();
        for (x, y, label) in labels.enumerate_pixels() {
            let label = label[0];
            if label == 0 {
                continue;
            }
            components
                .entry(label)
                .and_modify(|stats| stats.add(x, y))
                .or_insert_with(|| ComponentStats::new(x, y));
        }

        let total = components.len();
        let mut detections = Vec::new();
        for stats in components.values() {
            if stats.pixel_count < self.min_area {
                continue;
            }
            let bbox = stats
                .bounding_box()
                .padded_clamped(self.padding, width, height);
            detections.push(Detection::new(color_class, bbox, stats.pixel_count)?);
        }

        log::debug!(
            "Class '{}': {} components, {} at or above {} px",
            color_class,
            total,
            detections.len(),
            self.min_area
        );

        Ok(detections)
    }
}
