//! Type definitions for color piece detection

use crate::error::{DetectionError, Result};
use boxmerge::{PixelBox, Point};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// Smallest connected component (in pixels) that becomes a detection
pub const DEFAULT_MIN_AREA: u32 = 400;
/// Margin added around each region's bounding box
pub const DEFAULT_PADDING: u32 = 10;
/// Overlap coefficient at or above which two same-class boxes merge
pub const DEFAULT_MERGE_THRESHOLD: f64 = 0.2;
/// Side of the square structuring element
pub const DEFAULT_KERNEL_SIZE: u32 = 3;
/// Taps of the smoothing filter applied before thresholding
pub const DEFAULT_BLUR_KERNEL_SIZE: u32 = 5;
/// Upper bound for `radius * rounds` in a single morphology call
pub const MAX_MORPHOLOGY_RADIUS: u32 = 254;
/// Hue range of the 8-bit HSV convention (hue is stored halved)
pub const HUE_RANGE: u8 = 180;

/// Pixel color in the 8-bit HSV convention: H in [0, 180), S and V in [0, 255]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub const fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }
}

/// A named color class with inclusive lower/upper HSV bounds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorClassSpec {
    pub name: String,
    pub lower: Hsv,
    pub upper: Hsv,
}

impl ColorClassSpec {
    pub fn new<S: Into<String>>(name: S, lower: Hsv, upper: Hsv) -> Self {
        Self {
            name: name.into(),
            lower,
            upper,
        }
    }

    /// Per-channel inclusive range test
    pub fn matches(&self, hsv: Hsv) -> bool {
        (self.lower.h..=self.upper.h).contains(&hsv.h)
            && (self.lower.s..=self.upper.s).contains(&hsv.s)
            && (self.lower.v..=self.upper.v).contains(&hsv.v)
    }

    /// Midpoint of the bounds, used when drawing this class
    pub fn representative(&self) -> Hsv {
        let mid = |a: u8, b: u8| ((a as u16 + b as u16) / 2) as u8;
        Hsv::new(
            mid(self.lower.h, self.upper.h),
            mid(self.lower.s, self.upper.s),
            mid(self.lower.v, self.upper.v),
        )
    }

    /// Brick colors on a bright backdrop, in detection order
    pub fn default_table() -> Vec<Self> {
        vec![
            Self::new("red", Hsv::new(0, 150, 120), Hsv::new(8, 255, 240)),
            Self::new("dark_green", Hsv::new(30, 80, 80), Hsv::new(75, 255, 255)),
            Self::new("yellow", Hsv::new(20, 100, 100), Hsv::new(30, 255, 255)),
            Self::new("blue", Hsv::new(90, 100, 100), Hsv::new(140, 255, 255)),
            Self::new("orange", Hsv::new(10, 160, 160), Hsv::new(22, 255, 255)),
            Self::new("beige", Hsv::new(10, 25, 150), Hsv::new(32, 120, 255)),
            Self::new("light_blue", Hsv::new(85, 50, 150), Hsv::new(110, 200, 255)),
            Self::new("white", Hsv::new(0, 0, 180), Hsv::new(180, 40, 255)),
            Self::new("black", Hsv::new(0, 0, 0), Hsv::new(180, 255, 50)),
        ]
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(DetectionError::config("color class name is empty"));
        }
        let (lo, hi) = (self.lower, self.upper);
        if lo.h > hi.h || lo.s > hi.s || lo.v > hi.v {
            return Err(DetectionError::config(format!(
                "color class '{}': lower bound {:?} exceeds upper bound {:?}",
                self.name, lo, hi
            )));
        }
        if hi.h > HUE_RANGE {
            return Err(DetectionError::config(format!(
                "color class '{}': hue bound {} is above {}",
                self.name, hi.h, HUE_RANGE
            )));
        }
        Ok(())
    }
}

/// One located piece
///
/// Deserialization goes through [`Detection::new`]; an incoming `centroid` is
/// ignored and recomputed from the box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDetection")]
pub struct Detection {
    /// Name of the color class that produced this region
    #[serde(rename = "color")]
    pub color_class: String,
    /// Padded bounding box, clamped to the frame
    pub bbox: PixelBox,
    /// Pixel count of the originating connected component
    pub area: u32,
    /// Center of `bbox`
    pub centroid: Point,
}

/// Wire form of a detection before validation
#[derive(Deserialize)]
struct RawDetection {
    color: String,
    bbox: PixelBox,
    area: u32,
}

impl TryFrom<RawDetection> for Detection {
    type Error = DetectionError;

    fn try_from(raw: RawDetection) -> Result<Self> {
        Detection::new(raw.color, raw.bbox, raw.area)
    }
}

impl Detection {
    /// Create a detection anchored at the center of `bbox`
    pub fn new<S: Into<String>>(color_class: S, bbox: PixelBox, area: u32) -> Result<Self> {
        let color_class = color_class.into();
        if area == 0 {
            return Err(DetectionError::invalid_detection(format!(
                "{} region has zero area",
                color_class
            )));
        }
        if bbox.is_empty() {
            return Err(DetectionError::invalid_detection(format!(
                "{} region has an empty box {}",
                color_class, bbox
            )));
        }

        Ok(Self {
            color_class,
            centroid: bbox.center(),
            bbox,
            area,
        })
    }

    /// True if the box lies inside a `width × height` frame
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.bbox.right() <= width && self.bbox.bottom() <= height
    }
}

/// Final detections of one pipeline run
///
/// Ordered by class iteration order, then by merge-keep order within a class.
/// Serializes as `{"count": n, "bricks": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DetectionSet {
    #[serde(rename = "bricks")]
    detections: Vec<Detection>,
}

impl DetectionSet {
    pub fn new(detections: Vec<Detection>) -> Self {
        Self { detections }
    }

    /// Number of detections
    pub fn count(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    pub fn detections(&self) -> &[Detection] {
        &self.detections
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Detection> {
        self.detections.iter()
    }

    pub fn into_detections(self) -> Vec<Detection> {
        self.detections
    }

    /// Detections of a single class, in set order
    pub fn of_class<'a>(&'a self, color_class: &'a str) -> impl Iterator<Item = &'a Detection> {
        self.detections
            .iter()
            .filter(move |det| det.color_class == color_class)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Serialize for DetectionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("DetectionSet", 2)?;
        state.serialize_field("count", &self.count())?;
        state.serialize_field("bricks", &self.detections)?;
        state.end()
    }
}

impl<'a> IntoIterator for &'a DetectionSet {
    type Item = &'a Detection;
    type IntoIter = std::slice::Iter<'a, Detection>;

    fn into_iter(self) -> Self::IntoIter {
        self.detections.iter()
    }
}

impl fmt::Display for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} area={} centroid={}",
            self.color_class, self.bbox, self.area, self.centroid
        )
    }
}

/// Pipeline tunables
///
/// Missing fields in a JSON document fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Components smaller than this many pixels are dropped
    pub min_area: u32,

    /// Pixels added on every side of a region's bounding box
    pub padding: u32,

    /// Overlap coefficient (intersection / smaller box) that triggers a merge
    pub merge_threshold: f64,

    /// Side of the square structuring element (odd)
    pub kernel_size: u32,

    /// Taps of the smoothing filter before the foreground threshold (odd)
    pub blur_kernel_size: u32,

    pub foreground_open_rounds: u32,
    pub foreground_close_rounds: u32,
    pub class_open_rounds: u32,
    pub class_close_rounds: u32,
    pub class_dilate_rounds: u32,

    /// Run per-class stages on the calling thread instead of the rayon pool
    pub sequential: bool,

    /// Classes checked independently, in this order
    pub color_classes: Vec<ColorClassSpec>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_area: DEFAULT_MIN_AREA,
            padding: DEFAULT_PADDING,
            merge_threshold: DEFAULT_MERGE_THRESHOLD,
            kernel_size: DEFAULT_KERNEL_SIZE,
            blur_kernel_size: DEFAULT_BLUR_KERNEL_SIZE,
            foreground_open_rounds: 2,
            foreground_close_rounds: 2,
            class_open_rounds: 1,
            class_close_rounds: 2,
            class_dilate_rounds: 1,
            sequential: false,
            color_classes: ColorClassSpec::default_table(),
        }
    }
}

impl PipelineConfig {
    /// Parse a JSON document and validate it
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        log::debug!("Loaded pipeline config from {}", path.as_ref().display());
        Self::from_json_str(&contents)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Restrict detection to the named classes, keeping their configured order
    pub fn with_classes(mut self, names: &[&str]) -> Self {
        self.color_classes
            .retain(|spec| names.contains(&spec.name.as_str()));
        self
    }

    /// Radius of the square structuring element
    pub fn kernel_radius(&self) -> u32 {
        self.kernel_size / 2
    }

    /// Check every tunable; called by the detector before first use
    pub fn validate(&self) -> Result<()> {
        for (label, size) in [
            ("kernel_size", self.kernel_size),
            ("blur_kernel_size", self.blur_kernel_size),
        ] {
            if size == 0 || size % 2 == 0 {
                return Err(DetectionError::config(format!(
                    "{} must be a positive odd number, got {}",
                    label, size
                )));
            }
        }

        let max_rounds = [
            self.foreground_open_rounds,
            self.foreground_close_rounds,
            self.class_open_rounds,
            self.class_close_rounds,
            self.class_dilate_rounds,
        ]
        .into_iter()
        .max()
        .unwrap_or(0);
        if self.kernel_radius().saturating_mul(max_rounds) > MAX_MORPHOLOGY_RADIUS {
            return Err(DetectionError::config(format!(
                "kernel radius {} over {} rounds exceeds the morphology limit {}",
                self.kernel_radius(),
                max_rounds,
                MAX_MORPHOLOGY_RADIUS
            )));
        }

        if !self.merge_threshold.is_finite()
            || self.merge_threshold <= 0.0
            || self.merge_threshold > 1.0
        {
            return Err(DetectionError::config(format!(
                "merge_threshold must be in (0, 1], got {}",
                self.merge_threshold
            )));
        }

        if self.color_classes.is_empty() {
            return Err(DetectionError::config("no color classes configured"));
        }

        let mut seen = HashSet::new();
        for spec in &self.color_classes {
            spec.validate()?;
            if !seen.insert(spec.name.as_str()) {
                return Err(DetectionError::config(format!(
                    "duplicate color class '{}'",
                    spec.name
                )));
            }
        }

        Ok(())
    }
}
