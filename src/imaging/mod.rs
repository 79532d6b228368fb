//! Image operations, pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (JPEG, PNG, content-sniffed) |
//! | **Crop selection** | `smartcrop` via [`SaliencyAnalyzer`], or [`CenterAnalyzer`] |
//! | **Extract** | `image::imageops::crop_imm` via [`RegionSource`] |
//! | **Resize** | `resize_exact` with Lanczos3 |
//! | **Encode** | `JpegEncoder` (quality 100 by default) / `PngEncoder` |
//!
//! The module is split into:
//! - **Calculations**: pure functions for crop geometry (unit testable)
//! - **Analyzer**: the [`CropAnalyzer`] strategy trait and its implementations
//! - **Transform**: region extraction + exact-size resampling
//! - **Parameters**: data describing an encode
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod analyzer;
pub mod backend;
mod calculations;
mod params;
pub mod rust_backend;
pub mod saliency;
pub mod transform;

pub use analyzer::{
    AnalysisError, CenterAnalyzer, CropAnalyzer, CropRect, analyzer_for, select_crop,
};
pub use backend::{BackendError, ImageBackend};
pub use calculations::fit_aspect;
pub use params::{EncodeParams, Quality};
pub use rust_backend::RustBackend;
pub use saliency::SaliencyAnalyzer;
pub use transform::{RegionSource, TransformError, transform};
