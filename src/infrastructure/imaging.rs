//! Image decoding and resizing via the `image` crate

use image::imageops::{self, FilterType};
use image::{GrayImage, RgbImage};

use crate::domain::error::DomainError;
use crate::domain::image::{ImageDecoder, ImageSource, PixelFormat, RasterImage};

/// Decoder backed by the `image` crate; resampling is bilinear
#[derive(Debug, Default, Clone)]
pub struct BilinearDecoder;

impl BilinearDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl ImageDecoder for BilinearDecoder {
    fn decode(&self, source: &ImageSource) -> Result<RasterImage, DomainError> {
        let dynamic = match source {
            ImageSource::Path(path) => image::open(path)
                .map_err(|e| DomainError::image_decode(format!("{}: {e}", path.display())))?,
            ImageSource::Memory { name, bytes } => image::load_from_memory(bytes)
                .map_err(|e| DomainError::image_decode(format!("upload '{name}': {e}")))?,
        };

        let rgb = dynamic.to_rgb8();
        let (width, height) = rgb.dimensions();
        RasterImage::new(width, height, PixelFormat::Rgb8, rgb.into_raw())
    }

    fn resize(
        &self,
        image: &RasterImage,
        width: u32,
        height: u32,
    ) -> Result<RasterImage, DomainError> {
        match image.format() {
            PixelFormat::Rgb8 => {
                let buffer =
                    RgbImage::from_raw(image.width(), image.height(), image.data().to_vec())
                        .ok_or_else(|| {
                            DomainError::internal("rgb pixel buffer does not match its dimensions")
                        })?;
                let resized = imageops::resize(&buffer, width, height, FilterType::Triangle);
                RasterImage::new(width, height, PixelFormat::Rgb8, resized.into_raw())
            }
            PixelFormat::Gray8 => {
                let buffer =
                    GrayImage::from_raw(image.width(), image.height(), image.data().to_vec())
                        .ok_or_else(|| {
                            DomainError::internal("gray pixel buffer does not match its dimensions")
                        })?;
                let resized = imageops::resize(&buffer, width, height, FilterType::Triangle);
                RasterImage::new(width, height, PixelFormat::Gray8, resized.into_raw())
            }
        }
    }
}
