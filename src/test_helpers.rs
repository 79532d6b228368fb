//! Shared test utilities: synthetic image fixtures on disk.
//!
//! The encoder is picked explicitly, never from the file name, so a test can
//! write PNG bytes under a `.jpg` name to check content sniffing.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! create_test_jpeg(&tmp.path().join("photo.jpg"), 2000, 1000);
//! ```

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage, RgbaImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write an RGB JPEG with a gradient and a bright block off-centre.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        if x > width * 2 / 3 && y > height / 3 && y < height * 2 / 3 {
            image::Rgb([220, 60, 40])
        } else {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        }
    });
    let writer = BufWriter::new(File::create(path).unwrap());
    JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
}

/// Write an RGBA PNG with a gradient and partial transparency.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x % 256) as u8, 64, (y % 256) as u8, if x % 2 == 0 { 255 } else { 180 }])
    });
    let writer = BufWriter::new(File::create(path).unwrap());
    PngEncoder::new(writer)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgba8)
        .unwrap();
}
