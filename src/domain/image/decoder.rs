//! Image decoding seam

use super::raster::RasterImage;
use super::source::ImageSource;
use crate::domain::error::DomainError;

/// Decodes and resizes query images.
///
/// `decode` always yields 8-bit RGB; grayscale conversion is the
/// preprocessor's business. `resize` preserves the input's pixel format.
pub trait ImageDecoder: Send + Sync + std::fmt::Debug {
    fn decode(&self, source: &ImageSource) -> Result<RasterImage, DomainError>;

    fn resize(
        &self,
        image: &RasterImage,
        width: u32,
        height: u32,
    ) -> Result<RasterImage, DomainError>;
}
