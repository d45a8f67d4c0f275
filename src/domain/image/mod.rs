//! Query images: sources, pixel buffers, decoding seam

mod decoder;
mod raster;
mod source;

pub use decoder::ImageDecoder;
pub use raster::{PixelFormat, RasterImage};
pub use source::{derive_class_name, ImageSource, QueryImageEntry};

#[cfg(test)]
pub use decoder::mock::MockImageDecoder;
