//! Crop selection.
//!
//! A [`CropAnalyzer`] is a strategy: given a decoded image and the target
//! size, it proposes the rectangle to keep. The pipeline never looks inside
//! one; it calls [`select_crop`], which checks the preconditions every
//! strategy shares and clamps whatever comes back to the image bounds.
//!
//! Two strategies ship with the crate:
//!
//! - [`SaliencyAnalyzer`](super::saliency::SaliencyAnalyzer): the `smartcrop`
//!   crate's window search over edge detail, skin tone and saturation.
//! - [`CenterAnalyzer`]: the largest centered window with the target ratio.
//!
//! There is no fallback between them. If the chosen analyzer fails, the
//! file fails.

use super::calculations::{center_offset, fit_aspect};
use super::saliency::SaliencyAnalyzer;
use crate::config::Strategy;
use crate::types::TargetSize;
use image::{DynamicImage, GenericImageView};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("image has no pixels")]
    EmptyImage,
    #[error("source {width}x{height} is smaller than target {target}")]
    SourceTooSmall {
        width: u32,
        height: u32,
        target: TargetSize,
    },
    #[error("analyzer returned {rect}, which lies outside the {width}x{height} image")]
    OutOfBounds {
        rect: CropRect,
        width: u32,
        height: u32,
    },
    #[error("analyzer failed: {0}")]
    Failed(String),
}

/// An axis-aligned region of an image, in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the rectangle is non-empty and lies fully inside the image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && self.x as u64 + self.width as u64 <= width as u64
            && self.y as u64 + self.height as u64 <= height as u64
    }

    /// Shrink the rectangle so it lies inside the image.
    ///
    /// Returns `None` if nothing of it remains.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<CropRect> {
        if self.x >= width || self.y >= height {
            return None;
        }
        let w = self.width.min(width - self.x);
        let h = self.height.min(height - self.y);
        (w > 0 && h > 0).then_some(CropRect::new(self.x, self.y, w, h))
    }

    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl fmt::Display for CropRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} at ({}, {})",
            self.width, self.height, self.x, self.y
        )
    }
}

/// Strategy interface for choosing the region to keep.
///
/// Implementations should return a rectangle with the target's aspect ratio
/// (as close as integer pixels allow) inside the image bounds.
pub trait CropAnalyzer: Sync {
    fn find_best_crop(
        &self,
        image: &DynamicImage,
        target: TargetSize,
    ) -> Result<CropRect, AnalysisError>;
}

/// Keeps the largest centered window with the target aspect ratio.
#[derive(Debug, Clone, Copy, Default)]
pub struct CenterAnalyzer;

impl CropAnalyzer for CenterAnalyzer {
    fn find_best_crop(
        &self,
        image: &DynamicImage,
        target: TargetSize,
    ) -> Result<CropRect, AnalysisError> {
        let (w, h) = image.dimensions();
        let (cw, ch) = fit_aspect((w, h), target);
        Ok(CropRect::new(
            center_offset(w, cw),
            center_offset(h, ch),
            cw,
            ch,
        ))
    }
}

/// Build the analyzer for a configured strategy.
pub fn analyzer_for(strategy: Strategy) -> Box<dyn CropAnalyzer> {
    match strategy {
        Strategy::Saliency => Box::new(SaliencyAnalyzer::default()),
        Strategy::Center => Box::new(CenterAnalyzer),
    }
}

/// Run `analyzer` on `image` and return an in-bounds crop.
///
/// Sources smaller than the target on either side are rejected unless
/// `allow_upscale` is set.
pub fn select_crop<A: CropAnalyzer + ?Sized>(
    analyzer: &A,
    image: &DynamicImage,
    target: TargetSize,
    allow_upscale: bool,
) -> Result<CropRect, AnalysisError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(AnalysisError::EmptyImage);
    }
    if !allow_upscale && (width < target.width || height < target.height) {
        return Err(AnalysisError::SourceTooSmall {
            width,
            height,
            target,
        });
    }

    let rect = analyzer.find_best_crop(image, target)?;
    rect.clamp_to(width, height)
        .ok_or(AnalysisError::OutOfBounds {
            rect,
            width,
            height,
        })
}
