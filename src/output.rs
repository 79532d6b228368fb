//! CLI output formatting for `--verbose` runs.
//!
//! # Display Contract
//!
//! Every written image gets a header line (positional index + file name +
//! source dimensions) followed by indented context lines:
//!
//! ```text
//! 001 photo.jpg (2000x1000)
//!     Crop: 1336x1000 at (332, 0)
//!     Output: photo_580x434.jpg
//! --- notes.txt (skipped)
//!
//! Wrote 1 image, skipped 1 file
//! ```
//!
//! # Architecture
//!
//! Each `format_*` function returns `Vec<String>` (or a `String`) and does no
//! I/O, so the layout is unit tested. `main` does the printing.

use crate::process::{ProcessEvent, ProcessSummary};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// File name for display; falls back to the whole path.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("1 {one}")
    } else {
        format!("{count} {many}")
    }
}

/// Format a single progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::ImageWritten { index, image } => {
            let (w, h) = image.source_dims;
            vec![
                format!(
                    "{} {} ({}x{})",
                    format_index(*index),
                    display_name(&image.source),
                    w,
                    h
                ),
                format!("{}Crop: {}", indent(1), image.crop),
                format!("{}Output: {}", indent(1), display_name(&image.output)),
            ]
        }
        ProcessEvent::Skipped { path } => {
            vec![format!("--- {} (skipped)", display_name(path))]
        }
    }
}

/// One-line summary printed after a successful run.
pub fn format_summary(summary: &ProcessSummary) -> String {
    let wrote = plural(summary.written.len(), "image", "images");
    if summary.skipped == 0 {
        format!("Wrote {wrote}")
    } else {
        format!(
            "Wrote {wrote}, skipped {}",
            plural(summary.skipped, "file", "files")
        )
    }
}
