//! Color Piece Detection Library
//!
//! Locates colored construction pieces on a bright, uniform backdrop in a
//! single still frame. The pipeline separates foreground from backdrop with an
//! Otsu threshold, builds one cleaned HSV mask per color class, extracts
//! connected regions as padded boxes and merges fragmented regions of the same
//! class.
//!
//! ```no_run
//! use piece_detector::{PieceDetector, PipelineConfig};
//!
//! let detector = PieceDetector::new(PipelineConfig::default())?;
//! let detections = detector.detect_file("table.jpg")?;
//! println!("{}", detections.inventory());
//! # Ok::<(), piece_detector::DetectionError>(())
//! ```

pub mod class_mask;
pub mod color;
pub mod detector;
pub mod error;
pub mod extractor;
pub mod foreground;
pub mod frame;
pub mod image_utils;
pub mod inventory;
pub mod mask;
pub mod merger;
pub mod types;

pub use boxmerge::{PixelBox, Point};
pub use class_mask::ClassMaskBuilder;
pub use color::{hsv_to_rgb, rgb_to_hsv, HsvPlane};
pub use detector::PieceDetector;
pub use error::{DetectionError, Result};
pub use extractor::RegionExtractor;
pub use foreground::ForegroundIsolator;
pub use frame::Frame;
pub use inventory::{ClassCount, Inventory};
pub use mask::BinaryMask;
pub use merger::RegionMerger;
pub use types::{ColorClassSpec, Detection, DetectionSet, Hsv, PipelineConfig};

/// Get library version information
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Built-in color classes, in detection order
pub fn default_color_classes() -> Vec<ColorClassSpec> {
    ColorClassSpec::default_table()
}

/// Merge already-extracted candidates class by class with the given config
pub fn merge(candidates: Vec<Detection>, config: &PipelineConfig) -> DetectionSet {
    RegionMerger::new(config).merge(candidates)
}
