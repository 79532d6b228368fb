//! Pure Rust codec backend on the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG) | `image::ImageReader` with content sniffing |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` at the configured quality |
//! | Encode → PNG | `image::codecs::png::PngEncoder` with default settings |
//!
//! The output file is opened, written through a `BufWriter`, and flushed
//! explicitly inside one function. The handle drops on every return path;
//! the explicit flush makes a failed final write an error instead of
//! something `Drop` silently discards.

use super::backend::{BackendError, ImageBackend};
use super::params::EncodeParams;
use crate::format::ImageKind;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageReader};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Pure Rust backend using the `image` crate's JPEG and PNG codecs.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert to a pixel layout the target encoder accepts.
///
/// JPEG has no alpha channel and no 16-bit mode; PNG takes everything except
/// floating point.
fn encodable(image: &DynamicImage, kind: ImageKind) -> Cow<'_, DynamicImage> {
    match (kind, image) {
        (ImageKind::Jpeg, DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_)) => {
            Cow::Borrowed(image)
        }
        (ImageKind::Jpeg, _) => Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8())),
        (ImageKind::Png, DynamicImage::ImageRgb32F(_)) => {
            Cow::Owned(DynamicImage::ImageRgb16(image.to_rgb16()))
        }
        (ImageKind::Png, DynamicImage::ImageRgba32F(_)) => {
            Cow::Owned(DynamicImage::ImageRgba16(image.to_rgba16()))
        }
        (ImageKind::Png, _) => Cow::Borrowed(image),
    }
}

impl ImageBackend for RustBackend {
    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        ImageReader::open(path)
            .map_err(BackendError::Open)?
            .with_guessed_format()
            .map_err(BackendError::Open)?
            .decode()
            .map_err(BackendError::Decode)
    }

    fn encode(&self, image: &DynamicImage, params: &EncodeParams) -> Result<(), BackendError> {
        let file = File::create(&params.output).map_err(BackendError::Create)?;
        let mut writer = BufWriter::new(file);
        let image = encodable(image, params.kind);

        match params.kind {
            ImageKind::Jpeg => {
                let encoder = JpegEncoder::new_with_quality(&mut writer, params.quality.value());
                image.write_with_encoder(encoder)
            }
            ImageKind::Png => image.write_with_encoder(PngEncoder::new(&mut writer)),
        }
        .map_err(BackendError::Encode)?;

        writer.flush().map_err(BackendError::Flush)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::params::Quality;
    use crate::test_helpers::{create_test_jpeg, create_test_png};
    use image::{GenericImageView, RgbaImage};

    fn params(output: &Path, kind: ImageKind) -> EncodeParams {
        EncodeParams {
            output: output.to_path_buf(),
            kind,
            quality: Quality::default(),
        }
    }

    #[test]
    fn decode_synthetic_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        create_test_jpeg(&path, 200, 150);

        let img = RustBackend::new().decode(&path).unwrap();
        assert_eq!(img.dimensions(), (200, 150));
    }

    #[test]
    fn decode_synthetic_png_keeps_alpha() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.png");
        create_test_png(&path, 64, 48);

        let img = RustBackend::new().decode(&path).unwrap();
        assert_eq!(img.dimensions(), (64, 48));
        assert!(img.color().has_alpha());
    }

    #[test]
    fn decode_nonexistent_file_is_open_error() {
        let err = RustBackend::new()
            .decode(Path::new("/nonexistent/image.jpg"))
            .unwrap_err();
        assert!(matches!(err, BackendError::Open(_)));
    }

    #[test]
    fn decode_garbage_is_decode_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("broken.jpg");
        std::fs::write(&path, b"definitely not an image").unwrap();

        let err = RustBackend::new().decode(&path).unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
        assert!(err.is_decode());
    }

    #[test]
    fn decode_sniffs_content_not_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("actually-png.jpg");
        create_test_png(&path, 10, 12);

        let img = RustBackend::new().decode(&path).unwrap();
        assert_eq!(img.dimensions(), (10, 12));
    }

    #[test]
    fn encode_jpeg_roundtrips_dimensions() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("out.jpg");
        let img = DynamicImage::ImageRgb8(image::RgbImage::new(58, 43));

        RustBackend::new()
            .encode(&img, &params(&output, ImageKind::Jpeg))
            .unwrap();

        assert_eq!(image::image_dimensions(&output).unwrap(), (58, 43));
    }

    #[test]
    fn encode_jpeg_drops_alpha() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("out.jpg");
        let img = DynamicImage::ImageRgba8(RgbaImage::new(20, 10));

        RustBackend::new()
            .encode(&img, &params(&output, ImageKind::Jpeg))
            .unwrap();

        let decoded = RustBackend::new().decode(&output).unwrap();
        assert_eq!(decoded.dimensions(), (20, 10));
        assert!(!decoded.color().has_alpha());
    }

    #[test]
    fn encode_png_is_lossless() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("out.png");
        let source = RgbaImage::from_fn(16, 16, |x, y| {
            image::Rgba([(x * 16) as u8, (y * 16) as u8, 7, 200])
        });
        let img = DynamicImage::ImageRgba8(source.clone());

        RustBackend::new()
            .encode(&img, &params(&output, ImageKind::Png))
            .unwrap();

        let decoded = RustBackend::new().decode(&output).unwrap();
        assert_eq!(decoded.to_rgba8(), source);
    }

    #[test]
    fn encode_truncates_existing_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("out.png");
        std::fs::write(&output, vec![0xAB; 1 << 20]).unwrap();

        let img = DynamicImage::ImageRgb8(image::RgbImage::new(4, 4));
        RustBackend::new()
            .encode(&img, &params(&output, ImageKind::Png))
            .unwrap();

        assert!(std::fs::metadata(&output).unwrap().len() < 1 << 20);
        assert_eq!(image::image_dimensions(&output).unwrap(), (4, 4));
    }

    #[test]
    fn encode_into_missing_directory_is_create_error() {
        let img = DynamicImage::ImageRgb8(image::RgbImage::new(4, 4));
        let err = RustBackend::new()
            .encode(
                &img,
                &params(Path::new("/nonexistent/dir/out.jpg"), ImageKind::Jpeg),
            )
            .unwrap_err();
        assert!(matches!(err, BackendError::Create(_)));
    }

    #[test]
    fn float_images_encode_as_png() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("out.png");
        let img = DynamicImage::ImageRgb32F(image::Rgb32FImage::new(6, 5));

        RustBackend::new()
            .encode(&img, &params(&output, ImageKind::Png))
            .unwrap();

        assert_eq!(image::image_dimensions(&output).unwrap(), (6, 5));
    }
}
