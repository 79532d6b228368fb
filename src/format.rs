//! Format gate: decides which resolved paths are images we can process.
//!
//! Recognition is by extension only, case-insensitively, through a lookup
//! table. Anything not in the table is skipped silently; that is policy,
//! not a failure. Adding a codec means adding a row to [`EXTENSIONS`] and a
//! variant to [`ImageKind`].

use crate::types::FileTask;
use image::ImageFormat;
use std::path::{Path, PathBuf};

/// Image formats the pipeline can decode and re-encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Jpeg,
    Png,
}

impl ImageKind {
    /// The codec used for both decode and encode.
    pub fn format(self) -> ImageFormat {
        match self {
            ImageKind::Jpeg => ImageFormat::Jpeg,
            ImageKind::Png => ImageFormat::Png,
        }
    }

    /// Whether the encoder is lossy (and so takes a quality setting).
    pub fn is_lossy(self) -> bool {
        matches!(self, ImageKind::Jpeg)
    }
}

/// Lower-cased extension → codec.
const EXTENSIONS: &[(&str, ImageKind)] = &[("jpg", ImageKind::Jpeg), ("png", ImageKind::Png)];

/// Extensions accepted by the gate, lower-cased and without the dot.
pub fn supported_extensions() -> impl Iterator<Item = &'static str> {
    EXTENSIONS.iter().map(|(ext, _)| *ext)
}

/// Look up the codec for a path by its extension.
pub fn kind_for_path(path: &Path) -> Option<ImageKind> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    EXTENSIONS
        .iter()
        .find(|(candidate, _)| *candidate == ext)
        .map(|(_, kind)| *kind)
}

/// Admit a single path, or `None` if it should be skipped.
///
/// Only regular files (after following symlinks) are admitted. A
/// subdirectory called `archive.jpg`, a FIFO or a device node named like an
/// image is skipped, so decode never opens something that can block or
/// stream forever. Paths that do not exist are judged by extension alone;
/// opening them fails later with a decode error.
pub fn admit(path: &Path) -> Option<FileTask> {
    if let Ok(metadata) = std::fs::metadata(path) {
        if !metadata.is_file() {
            return None;
        }
    }
    let kind = kind_for_path(path)?;
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    Some(FileTask {
        path: path.to_path_buf(),
        extension,
        kind,
    })
}

/// Split resolved paths into accepted tasks and skipped paths, keeping order.
pub fn gate(paths: Vec<PathBuf>) -> (Vec<FileTask>, Vec<PathBuf>) {
    let mut accepted = Vec::new();
    let mut skipped = Vec::new();
    for path in paths {
        match admit(&path) {
            Some(task) => accepted.push(task),
            None => {
                tracing::debug!(path = %path.display(), "skipping unsupported file");
                skipped.push(path);
            }
        }
    }
    (accepted, skipped)
}
