//! Piece detector: runs the full pipeline on one frame

use crate::class_mask::ClassMaskBuilder;
use crate::color::HsvPlane;
use crate::error::{DetectionError, Result};
use crate::extractor::RegionExtractor;
use crate::foreground::ForegroundIsolator;
use crate::frame::Frame;
use crate::mask::BinaryMask;
use crate::merger::RegionMerger;
use crate::types::{ColorClassSpec, Detection, DetectionSet, PipelineConfig};
use rayon::prelude::*;
use std::path::Path;
use std::time::Instant;

/// Color piece detector
///
/// Holds the validated configuration and the stage objects built from it.
/// Each call to [`PieceDetector::detect`] is independent; nothing is carried
/// over between frames.
#[derive(Debug, Clone)]
pub struct PieceDetector {
    config: PipelineConfig,
    isolator: ForegroundIsolator,
    mask_builder: ClassMaskBuilder,
    extractor: RegionExtractor,
    merger: RegionMerger,
}

impl PieceDetector {
    /// Create a detector, validating the configuration
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;

        log::info!(
            "Initializing piece detector with {} color classes",
            config.color_classes.len()
        );
        log::debug!(
            "min_area={} padding={} merge_threshold={} kernel={} blur={}",
            config.min_area,
            config.padding,
            config.merge_threshold,
            config.kernel_size,
            config.blur_kernel_size
        );

        Ok(Self {
            isolator: ForegroundIsolator::new(&config),
            mask_builder: ClassMaskBuilder::new(&config),
            extractor: RegionExtractor::new(&config),
            merger: RegionMerger::new(&config),
            config,
        })
    }

    /// Detect pieces in a decoded frame
    pub fn detect(&self, frame: &Frame) -> Result<DetectionSet> {
        let start = Instant::now();

        let foreground = self.isolator.isolate(frame);
        let candidates = self.extract_candidates(frame, &foreground)?;
        let candidate_count = candidates.len();
        let detections = self.merger.merge(candidates);

        log::info!(
            "Detected {} pieces ({} candidates) in {}x{} frame in {:.1}ms",
            detections.count(),
            candidate_count,
            frame.width(),
            frame.height(),
            start.elapsed().as_secs_f32() * 1000.0
        );

        Ok(detections)
    }

    /// Load an image file and detect pieces in it
    pub fn detect_file<P: AsRef<Path>>(&self, path: P) -> Result<DetectionSet> {
        let frame = Frame::open(path)?;
        self.detect(&frame)
    }

    /// Decode an in-memory image and detect pieces in it
    pub fn detect_bytes(&self, bytes: &[u8]) -> Result<DetectionSet> {
        let frame = Frame::from_bytes(bytes)?;
        self.detect(&frame)
    }

    /// Candidates of every class against a given foreground mask, before merging.
    ///
    /// Classes run independently (on the rayon pool unless `sequential` is set)
    /// and results are concatenated in class order. The foreground must match
    /// the frame size.
    pub fn extract_candidates(
        &self,
        frame: &Frame,
        foreground: &BinaryMask,
    ) -> Result<Vec<Detection>> {
        if foreground.dimensions() != frame.dimensions() {
            return Err(DetectionError::MaskSize {
                expected: frame.dimensions(),
                actual: foreground.dimensions(),
            });
        }

        let hsv = HsvPlane::from_frame(frame);
        let classes = &self.config.color_classes;

        let per_class: Vec<Vec<Detection>> = if self.config.sequential {
            classes
                .iter()
                .map(|spec| self.detect_class(&hsv, foreground, spec))
                .collect::<Result<_>>()?
        } else {
            classes
                .par_iter()
                .map(|spec| self.detect_class(&hsv, foreground, spec))
                .collect::<Result<_>>()?
        };

        Ok(per_class.into_iter().flatten().collect())
    }

    fn detect_class(
        &self,
        hsv: &HsvPlane,
        foreground: &BinaryMask,
        spec: &ColorClassSpec,
    ) -> Result<Vec<Detection>> {
        let mask = self.mask_builder.build(hsv, foreground, spec);
        self.extractor.extract(&mask, &spec.name)
    }

    /// Get detector configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Replace the configuration, rebuilding every stage
    pub fn update_config(&mut self, config: PipelineConfig) -> Result<()> {
        log::info!("Updating piece detector configuration");
        *self = Self::new(config)?;
        Ok(())
    }
}
