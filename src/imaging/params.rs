//! Parameter types for encoding.
//!
//! These describe *what* to write, not *how*; the
//! [`backend`](super::backend) decides how. Keeping them plain data lets the
//! pipeline be tested against a mock backend that just records them.

use crate::format::ImageKind;
use std::path::PathBuf;

/// Quality setting for lossy encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u8);

impl Quality {
    pub fn new(value: u8) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// Full quality: the default for JPEG output.
impl Default for Quality {
    fn default() -> Self {
        Self(100)
    }
}

/// Everything needed to write one output file.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeParams {
    pub output: PathBuf,
    pub kind: ImageKind,
    /// Only consulted for lossy formats.
    pub quality: Quality,
}
