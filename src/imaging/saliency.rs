//! Content-aware crop analysis on the `smartcrop` crate.
//!
//! `smartcrop` prescales the image, scores every pixel for edge detail, skin
//! tone and saturation, then slides windows of the requested aspect ratio
//! over the score map, weighting the centre and the rule-of-thirds lines.
//! The best window comes back in source coordinates.

use super::analyzer::{AnalysisError, CropAnalyzer, CropRect};
use crate::types::TargetSize;
use image::DynamicImage;
use std::num::NonZeroU32;

/// Saliency-driven crop analyzer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SaliencyAnalyzer;

impl SaliencyAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl CropAnalyzer for SaliencyAnalyzer {
    fn find_best_crop(
        &self,
        image: &DynamicImage,
        target: TargetSize,
    ) -> Result<CropRect, AnalysisError> {
        let (Some(width), Some(height)) =
            (NonZeroU32::new(target.width), NonZeroU32::new(target.height))
        else {
            return Err(AnalysisError::Failed(format!("zero-sized target {target}")));
        };

        // smartcrop samples 8-bit channels.
        let found = match image {
            DynamicImage::ImageRgb8(rgb) => smartcrop::find_best_crop(rgb, width, height),
            other => smartcrop::find_best_crop(&other.to_rgb8(), width, height),
        };
        let scored = found.map_err(|e| match e {
            smartcrop::Error::ZeroSizedImage => AnalysisError::EmptyImage,
        })?;
        tracing::debug!(score = scored.score.total, "smartcrop result");

        let crop = scored.crop;
        if crop.width == 0 || crop.height == 0 {
            return Err(AnalysisError::Failed(format!(
                "smartcrop returned an empty {}x{} window",
                crop.width, crop.height
            )));
        }
        Ok(CropRect::new(crop.x, crop.y, crop.width, crop.height))
    }
}
