//! Greedy first-match merging of overlapping regions

use crate::bbox::{overlap_coefficient, PixelBox};

/// A region that can take part in greedy merging
pub trait MergeRegion {
    /// Bounding box used for the overlap test
    fn bbox(&self) -> PixelBox;

    /// Size used for ordering (largest first)
    fn pixel_area(&self) -> u64;

    /// Fold `other` into `self`
    fn absorb(&mut self, other: &Self);
}

/// Collapse overlapping regions into a minimal set of representatives.
///
/// Regions are visited in decreasing `pixel_area` order (stable for ties).
/// Each region is compared against the kept list in keep order and absorbed by
/// the first kept region whose overlap coefficient with it is at least
/// `threshold`; otherwise it is kept as is. The first match wins even when a
/// later kept region would overlap more.
///
/// All regions are assumed to belong to the same group; callers partition
/// beforehand when groups must not be compared.
pub fn merge_greedy<R: MergeRegion>(mut regions: Vec<R>, threshold: f64) -> Vec<R> {
    // sort_by is stable, ties keep arrival order
    regions.sort_by(|a, b| b.pixel_area().cmp(&a.pixel_area()));

    let mut kept: Vec<R> = Vec::with_capacity(regions.len());

    for candidate in regions {
        let candidate_box = candidate.bbox();
        let target = kept
            .iter()
            .position(|k| overlap_coefficient(&candidate_box, &k.bbox()) >= threshold);

        match target {
            Some(idx) => kept[idx].absorb(&candidate),
            None => kept.push(candidate),
        }
    }

    kept
}

/// Number of kept pairs whose overlap coefficient is still at least `threshold`
pub fn residual_overlaps<R: MergeRegion>(regions: &[R], threshold: f64) -> usize {
    let mut count = 0;
    for (i, a) in regions.iter().enumerate() {
        for b in &regions[i + 1..] {
            if overlap_coefficient(&a.bbox(), &b.bbox()) >= threshold {
                count += 1;
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Blob {
        id: u32,
        bbox: PixelBox,
        area: u64,
    }

    impl Blob {
        fn new(id: u32, x: u32, y: u32, w: u32, h: u32, area: u64) -> Self {
            Self {
                id,
                bbox: PixelBox::new(x, y, w, h),
                area,
            }
        }
    }

    impl MergeRegion for Blob {
        fn bbox(&self) -> PixelBox {
            self.bbox
        }

        fn pixel_area(&self) -> u64 {
            self.area
        }

        fn absorb(&mut self, other: &Self) {
            self.bbox = self.bbox.union(&other.bbox);
            self.area = self.area.max(other.area);
        }
    }

    #[test]
    fn test_empty_input() {
        let merged: Vec<Blob> = merge_greedy(Vec::new(), 0.2);
        assert!(merged.is_empty());
    }

    #[test]
    fn test_disjoint_regions_kept() {
        let blobs = vec![
            Blob::new(1, 0, 0, 10, 10, 80),
            Blob::new(2, 50, 50, 10, 10, 90),
        ];
        let merged = merge_greedy(blobs, 0.2);
        assert_eq!(merged.len(), 2);
        // largest first
        assert_eq!(merged[0].id, 2);
        assert_eq!(merged[1].id, 1);
    }

    #[test]
    fn test_contained_fragment_absorbed() {
        let blobs = vec![
            Blob::new(1, 12, 12, 20, 20, 300),
            Blob::new(2, 10, 10, 40, 40, 1500),
        ];
        let merged = merge_greedy(blobs, 0.2);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id, 2);
        assert_eq!(merged[0].bbox, PixelBox::new(10, 10, 40, 40));
        assert_eq!(merged[0].area, 1500);
    }

    #[test]
    fn test_below_threshold_not_merged() {
        // overlap 1x10 over a 10x10 smaller box = 0.1
        let blobs = vec![
            Blob::new(1, 0, 0, 20, 10, 200),
            Blob::new(2, 19, 0, 10, 10, 100),
        ];
        let merged = merge_greedy(blobs, 0.2);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // overlap 2x10 over a 10x10 smaller box = exactly 0.2
        let blobs = vec![
            Blob::new(1, 0, 0, 20, 10, 200),
            Blob::new(2, 18, 0, 10, 10, 100),
        ];
        let merged = merge_greedy(blobs, 0.2);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].bbox, PixelBox::new(0, 0, 28, 10));
    }

    #[test]
    fn test_first_match_not_best_match() {
        // Candidate 3 overlaps kept 1 at exactly the threshold (0.2) and kept 2
        // by more (0.3). It must still go to kept 1, the earlier entry.
        let blobs = vec![
            Blob::new(1, 0, 0, 30, 30, 900),
            Blob::new(2, 40, 0, 30, 30, 800),
            Blob::new(3, 26, 0, 20, 10, 100),
        ];
        let merged = merge_greedy(blobs, 0.2);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].id, 1);
        assert_eq!(merged[0].bbox, PixelBox::new(0, 0, 46, 30));
        assert_eq!(merged[1].bbox, PixelBox::new(40, 0, 30, 30));
    }

    #[test]
    fn test_stable_order_on_equal_area() {
        let blobs = vec![
            Blob::new(1, 0, 0, 10, 10, 100),
            Blob::new(2, 100, 0, 10, 10, 100),
            Blob::new(3, 200, 0, 10, 10, 100),
        ];
        let merged = merge_greedy(blobs, 0.2);
        let ids: Vec<u32> = merged.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_merge_output_is_stable_under_remerge() {
        let blobs = vec![
            Blob::new(1, 10, 10, 40, 40, 1500),
            Blob::new(2, 12, 12, 20, 20, 300),
            Blob::new(3, 45, 20, 20, 20, 350),
            Blob::new(4, 200, 200, 30, 30, 800),
        ];
        let once = merge_greedy(blobs, 0.2);
        assert_eq!(residual_overlaps(&once, 0.2), 0);

        let twice = merge_greedy(once.clone(), 0.2);
        assert_eq!(once, twice);
    }
}
