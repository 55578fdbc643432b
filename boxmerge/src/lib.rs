//! Integer bounding box geometry and greedy overlap merging
//!
//! This crate holds the pure geometry used by the piece detector: pixel-space
//! boxes, the overlap coefficient (intersection over the smaller box) and the
//! greedy first-match merge that collapses fragmented detections.
//!
//! ```rust
//! use boxmerge::{merge_greedy, MergeRegion, PixelBox};
//!
//! struct Region(PixelBox, u64);
//!
//! impl MergeRegion for Region {
//!     fn bbox(&self) -> PixelBox { self.0 }
//!     fn pixel_area(&self) -> u64 { self.1 }
//!     fn absorb(&mut self, other: &Self) {
//!         self.0 = self.0.union(&other.0);
//!         self.1 = self.1.max(other.1);
//!     }
//! }
//!
//! let regions = vec![
//!     Region(PixelBox::new(0, 0, 40, 40), 1400),
//!     Region(PixelBox::new(5, 5, 10, 10), 90),
//! ];
//! let merged = merge_greedy(regions, 0.2);
//! assert_eq!(merged.len(), 1);
//! ```

pub mod bbox;
pub mod merge;

pub use bbox::{calculate_iou, overlap_coefficient, PixelBox, Point};
pub use merge::{merge_greedy, residual_overlaps, MergeRegion};
