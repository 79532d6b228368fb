//! Crop extraction and final resize.
//!
//! Extraction needs a concrete pixel buffer. [`RegionSource`] is the
//! capability check: it borrows the buffer out of a [`DynamicImage`] for
//! every layout the crate knows how to crop, and refuses anything else
//! before any work is done.

use super::analyzer::CropRect;
use crate::types::TargetSize;
use image::imageops::{self, FilterType};
use image::{
    DynamicImage, ImageBuffer, Luma, LumaA, Pixel, Rgb, Rgb32FImage, RgbImage, Rgba,
    Rgba32FImage, RgbaImage,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("pixel layout {color:?} does not support region extraction")]
    NoRegionSupport { color: image::ColorType },
    #[error("crop {rect} lies outside the {width}x{height} image")]
    RegionOutOfBounds {
        rect: CropRect,
        width: u32,
        height: u32,
    },
}

type Buffer<P> = ImageBuffer<P, Vec<<P as Pixel>::Subpixel>>;

/// Borrowed view of a decoded image whose pixels can be sub-imaged.
#[derive(Debug, Clone, Copy)]
pub enum RegionSource<'a> {
    Luma8(&'a Buffer<Luma<u8>>),
    LumaA8(&'a Buffer<LumaA<u8>>),
    Rgb8(&'a RgbImage),
    Rgba8(&'a RgbaImage),
    Luma16(&'a Buffer<Luma<u16>>),
    LumaA16(&'a Buffer<LumaA<u16>>),
    Rgb16(&'a Buffer<Rgb<u16>>),
    Rgba16(&'a Buffer<Rgba<u16>>),
    Rgb32F(&'a Rgb32FImage),
    Rgba32F(&'a Rgba32FImage),
}

impl<'a> RegionSource<'a> {
    pub fn from_image(image: &'a DynamicImage) -> Result<Self, TransformError> {
        Ok(match image {
            DynamicImage::ImageLuma8(b) => Self::Luma8(b),
            DynamicImage::ImageLumaA8(b) => Self::LumaA8(b),
            DynamicImage::ImageRgb8(b) => Self::Rgb8(b),
            DynamicImage::ImageRgba8(b) => Self::Rgba8(b),
            DynamicImage::ImageLuma16(b) => Self::Luma16(b),
            DynamicImage::ImageLumaA16(b) => Self::LumaA16(b),
            DynamicImage::ImageRgb16(b) => Self::Rgb16(b),
            DynamicImage::ImageRgba16(b) => Self::Rgba16(b),
            DynamicImage::ImageRgb32F(b) => Self::Rgb32F(b),
            DynamicImage::ImageRgba32F(b) => Self::Rgba32F(b),
            other => {
                return Err(TransformError::NoRegionSupport {
                    color: other.color(),
                });
            }
        })
    }

    /// Copy `rect` out into an owned image of the same layout.
    ///
    /// `rect` must already lie inside the image.
    pub fn extract(&self, rect: CropRect) -> DynamicImage {
        match *self {
            Self::Luma8(b) => DynamicImage::ImageLuma8(crop_buffer(b, rect)),
            Self::LumaA8(b) => DynamicImage::ImageLumaA8(crop_buffer(b, rect)),
            Self::Rgb8(b) => DynamicImage::ImageRgb8(crop_buffer(b, rect)),
            Self::Rgba8(b) => DynamicImage::ImageRgba8(crop_buffer(b, rect)),
            Self::Luma16(b) => DynamicImage::ImageLuma16(crop_buffer(b, rect)),
            Self::LumaA16(b) => DynamicImage::ImageLumaA16(crop_buffer(b, rect)),
            Self::Rgb16(b) => DynamicImage::ImageRgb16(crop_buffer(b, rect)),
            Self::Rgba16(b) => DynamicImage::ImageRgba16(crop_buffer(b, rect)),
            Self::Rgb32F(b) => DynamicImage::ImageRgb32F(crop_buffer(b, rect)),
            Self::Rgba32F(b) => DynamicImage::ImageRgba32F(crop_buffer(b, rect)),
        }
    }
}

fn crop_buffer<P: Pixel + 'static>(buffer: &Buffer<P>, rect: CropRect) -> Buffer<P> {
    imageops::crop_imm(buffer, rect.x, rect.y, rect.width, rect.height).to_image()
}

/// Extract `rect` from `image` and resize it to exactly `target` with
/// Lanczos3. The aspect ratio is not preserved if `rect` doesn't match.
pub fn transform(
    image: &DynamicImage,
    rect: CropRect,
    target: TargetSize,
) -> Result<DynamicImage, TransformError> {
    let source = RegionSource::from_image(image)?;
    if !rect.fits_within(image.width(), image.height()) {
        return Err(TransformError::RegionOutOfBounds {
            rect,
            width: image.width(),
            height: image.height(),
        });
    }
    let region = source.extract(rect);
    Ok(region.resize_exact(target.width, target.height, FilterType::Lanczos3))
}
