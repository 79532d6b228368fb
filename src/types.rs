//! Shared types passed between pipeline stages.
//!
//! None of these outlive a single run: a [`TargetSize`] is fixed once the
//! configuration is resolved, and a [`FileTask`] lives only while its file
//! moves through the pipeline.

use crate::config::ConfigError;
use crate::format::ImageKind;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Exact output dimensions, parsed from a `<width>x<height>` descriptor.
///
/// Both sides are strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    pub const DEFAULT_DESCRIPTOR: &'static str = "580x434";

    /// Build a target size, rejecting zero on either side.
    pub fn new(width: u32, height: u32) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::MalformedSize {
                descriptor: format!("{width}x{height}"),
                reason: "width and height must be positive".into(),
            });
        }
        Ok(Self { width, height })
    }

    /// Parse a descriptor such as `"580x434"`.
    ///
    /// The grammar is two decimal integers joined by a single lowercase `x`;
    /// anything else (`"580X434"`, `"580x"`, `"1x2x3"`, `"abcxdef"`) is a
    /// [`ConfigError::MalformedSize`].
    pub fn parse(descriptor: &str) -> Result<Self, ConfigError> {
        let malformed = |reason: &str| ConfigError::MalformedSize {
            descriptor: descriptor.to_string(),
            reason: reason.to_string(),
        };

        let (w, h) = descriptor
            .split_once('x')
            .ok_or_else(|| malformed("expected <width>x<height>"))?;
        if h.contains('x') {
            return Err(malformed("expected exactly one 'x' separator"));
        }

        let width: u32 = w.parse().map_err(|_| malformed("width is not an integer"))?;
        let height: u32 = h.parse().map_err(|_| malformed("height is not an integer"))?;
        if width == 0 || height == 0 {
            return Err(malformed("width and height must be positive"));
        }
        Ok(Self { width, height })
    }

    /// Width divided by height.
    pub fn aspect(self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl Default for TargetSize {
    fn default() -> Self {
        Self {
            width: 580,
            height: 434,
        }
    }
}

impl FromStr for TargetSize {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TargetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A file accepted by the format gate, ready for processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    /// Absolute path to the source image.
    pub path: PathBuf,
    /// Lower-cased extension without the dot (`"jpg"`, `"png"`).
    pub extension: String,
    /// Codec selected from the extension.
    pub kind: ImageKind,
}

impl FileTask {
    pub fn path(&self) -> &Path {
        &self.path
    }
}
