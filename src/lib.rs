//! # cropper
//!
//! Batch smart-crop for photos. Give it files and directories and a target
//! size; every JPEG and PNG is cropped to its most salient region at the
//! target aspect ratio, resized to exactly that size, and written next to
//! the source as `<stem>_<width>x<height><ext>`.
//!
//! # Pipeline
//!
//! ```text
//! paths ─ resolve ─ gate ─┬─ decode → select crop → extract → resize → encode
//!                          └─ (skipped: not .jpg/.png)
//! ```
//!
//! Files run strictly in order (or on a bounded worker pool, still in order
//! for results). The first failure aborts the batch and is reported with the
//! file and stage it came from.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`resolve`] | Expands path arguments; directories one level deep, sorted by name |
//! | [`format`] | Extension gate: `.jpg`/`.png` (any case) in, everything else skipped |
//! | [`imaging`] | Crop analyzers, region extraction + Lanczos3 resize, codec backend |
//! | [`naming`] | `photo.jpg` → `photo_580x434.jpg` |
//! | [`process`] | Per-file pipeline and fail-fast batch orchestration |
//! | [`config`] | Layered TOML configuration and validation |
//! | [`types`] | `TargetSize` descriptor parsing, `FileTask` |
//! | [`output`] | `--verbose` progress formatting |
//!
//! # Design Decisions
//!
//! ## No Fallback Crop
//!
//! When the analyzer fails the file fails. A silent center crop would hide
//! exactly the images a user most wants to look at. The center strategy
//! exists, but only when asked for.
//!
//! ## Undersized Sources Are Errors
//!
//! A source smaller than the target on either side would have to be
//! upscaled. That is rejected unless `allow_upscale` is set, so a batch of
//! thumbnails is never silently blown up to a blurry banner.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, resampling and encoding all use the `image` crate. No system
//! libraries, no ImageMagick; the binary is self-contained.

pub mod config;
pub mod format;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod process;
pub mod resolve;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
