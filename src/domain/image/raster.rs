//! Raw pixel buffers exchanged between the decoder and the preprocessor

use crate::domain::error::DomainError;

/// Pixel layout of a [`RasterImage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Interleaved 8-bit RGB
    Rgb8,
    /// Single 8-bit luminance channel
    Gray8,
}

impl PixelFormat {
    pub fn channels(&self) -> usize {
        match self {
            Self::Rgb8 => 3,
            Self::Gray8 => 1,
        }
    }
}

/// Decoded image: row-major, channel-interleaved 8-bit pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl RasterImage {
    pub fn new(
        width: u32,
        height: u32,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<Self, DomainError> {
        let expected = width as usize * height as usize * format.channels();
        if data.len() != expected {
            return Err(DomainError::internal(format!(
                "pixel buffer length {} does not match {}x{} {:?} (expected {})",
                data.len(),
                width,
                height,
                format,
                expected
            )));
        }
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn channels(&self) -> usize {
        self.format.channels()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Convert to single-channel grayscale with BT.601 luma weights
    /// (0.299 R + 0.587 G + 0.114 B), rounding to the nearest integer.
    pub fn to_grayscale(&self) -> Self {
        match self.format {
            PixelFormat::Gray8 => self.clone(),
            PixelFormat::Rgb8 => {
                let data = self
                    .data
                    .chunks_exact(3)
                    .map(|px| {
                        let luma = 0.299 * f32::from(px[0])
                            + 0.587 * f32::from(px[1])
                            + 0.114 * f32::from(px[2]);
                        luma.round().clamp(0.0, 255.0) as u8
                    })
                    .collect();
                Self {
                    width: self.width,
                    height: self.height,
                    format: PixelFormat::Gray8,
                    data,
                }
            }
        }
    }
}
