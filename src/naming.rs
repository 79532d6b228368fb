//! Output filename derivation.
//!
//! Every output sits next to its source, named after it with the size
//! descriptor appended before the extension:
//!
//! ```text
//! /photos/beach.jpg   + "580x434"  →  /photos/beach_580x434.jpg
//! /photos/Logo.PNG    + "64x64"    →  /photos/Logo_64x64.PNG
//! ```
//!
//! The extension keeps the source's casing. The derivation is pure, so a
//! second run with the same inputs targets (and overwrites) the same files.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Derive the destination path for `source` at the given size descriptor.
pub fn output_path(source: &Path, descriptor: &str) -> PathBuf {
    let stem = source.file_stem().unwrap_or_default();

    let mut name = OsString::from(stem);
    name.push("_");
    name.push(descriptor);
    if let Some(ext) = source.extension() {
        name.push(".");
        name.push(ext);
    }

    source.with_file_name(name)
}
