//! Codec backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the codec capability the pipeline consumes:
//! decode a source file, encode a finished image. The production
//! implementation is [`RustBackend`](super::rust_backend::RustBackend); tests
//! use the recording `MockBackend` below so the orchestrator can be exercised
//! without touching real image files.
//!
//! Errors carry no path. The caller knows which file it was working on and
//! attaches it (see [`ProcessError`](crate::process::ProcessError)).

use super::params::EncodeParams;
use image::{DynamicImage, ImageError};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("cannot open source: {0}")]
    Open(#[source] std::io::Error),
    #[error("cannot decode image: {0}")]
    Decode(#[source] ImageError),
    #[error("cannot create output: {0}")]
    Create(#[source] std::io::Error),
    #[error("cannot encode image: {0}")]
    Encode(#[source] ImageError),
    #[error("cannot flush output: {0}")]
    Flush(#[source] std::io::Error),
}

impl BackendError {
    /// True for failures on the reading side (open/decode).
    pub fn is_decode(&self) -> bool {
        matches!(self, BackendError::Open(_) | BackendError::Decode(_))
    }
}

/// Codec capability: one decoder and one encoder per supported format.
pub trait ImageBackend: Sync {
    /// Decode the image at `path`, sniffing the format from its contents.
    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError>;

    /// Create or truncate `params.output` and encode `image` into it.
    fn encode(&self, image: &DynamicImage, params: &EncodeParams) -> Result<(), BackendError>;
}
