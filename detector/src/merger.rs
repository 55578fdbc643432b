//! Per-class merging of overlapping candidate detections

use crate::types::{Detection, DetectionSet, PipelineConfig};
use boxmerge::{merge_greedy, MergeRegion, PixelBox};
use rayon::prelude::*;

impl MergeRegion for Detection {
    fn bbox(&self) -> PixelBox {
        self.bbox
    }

    fn pixel_area(&self) -> u64 {
        self.area as u64
    }

    /// Union of the boxes, larger of the two pixel areas, anchor re-centered
    fn absorb(&mut self, other: &Self) {
        self.bbox = self.bbox.union(&other.bbox);
        self.area = self.area.max(other.area);
        self.centroid = self.bbox.center();
    }
}

/// Collapses duplicate detections within each color class
#[derive(Debug, Clone)]
pub struct RegionMerger {
    threshold: f64,
    parallel: bool,
}

impl RegionMerger {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            threshold: config.merge_threshold,
            parallel: !config.sequential,
        }
    }

    /// Merge candidates class by class; classes are never compared with each other.
    ///
    /// Output follows the order in which classes first appear in `candidates`.
    pub fn merge(&self, candidates: Vec<Detection>) -> DetectionSet {
        let before = candidates.len();
        let groups = group_by_class(candidates);

        let merged: Vec<Vec<Detection>> = if self.parallel {
            groups
                .into_par_iter()
                .map(|(_, group)| merge_greedy(group, self.threshold))
                .collect()
        } else {
            groups
                .into_iter()
                .map(|(_, group)| merge_greedy(group, self.threshold))
                .collect()
        };

        let detections: Vec<Detection> = merged.into_iter().flatten().collect();
        log::debug!("Merged {} candidates into {}", before, detections.len());
        DetectionSet::new(detections)
    }
}

/// Partition by class name, keeping first-appearance order of classes and
/// arrival order within each class
fn group_by_class(candidates: Vec<Detection>) -> Vec<(String, Vec<Detection>)> {
    let mut groups: Vec<(String, Vec<Detection>)> = Vec::new();
    for det in candidates {
        match groups.iter().position(|(name, _)| *name == det.color_class) {
            Some(idx) => groups[idx].1.push(det),
            None => groups.push((det.color_class.clone(), vec![det])),
        }
    }
    groups
}
