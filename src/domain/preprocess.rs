//! Adaptive preprocessing: fit a decoded image to a model's declared input

use std::sync::Arc;

use ndarray::{Array3, Array4};
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::image::{ImageDecoder, ImageSource, RasterImage};
use crate::domain::runtime::InputShape;

/// Channel layout produced by the preprocessor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Rgb,
    Grayscale,
}

/// Normalized pixels shaped for a model's input layer.
///
/// The two variants are asymmetric on purpose: RGB tensors carry a leading
/// batch axis of 1, grayscale tensors do not. A model consuming grayscale
/// input receives an unbatched (height, width, 1) volume.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageTensor {
    Rgb(Array4<f32>),
    Gray(Array3<f32>),
}

impl ImageTensor {
    pub fn shape(&self) -> Vec<usize> {
        match self {
            Self::Rgb(tensor) => tensor.shape().to_vec(),
            Self::Gray(tensor) => tensor.shape().to_vec(),
        }
    }
}

/// Resizes, normalizes and reshapes decoded images to a model's input volume
#[derive(Debug, Clone)]
pub struct Preprocessor {
    decoder: Arc<dyn ImageDecoder>,
    mode: ColorMode,
}

impl Preprocessor {
    pub fn new(decoder: Arc<dyn ImageDecoder>, mode: ColorMode) -> Self {
        Self { decoder, mode }
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    /// Decode `source` and fit it to `shape`.
    ///
    /// The target size comes from the model, not the image, so every model in
    /// a comparison can receive a differently-sized tensor from the same
    /// source.
    pub fn prepare(
        &self,
        source: &ImageSource,
        shape: InputShape,
    ) -> Result<ImageTensor, DomainError> {
        let decoded = self.decoder.decode(source)?;
        match self.mode {
            ColorMode::Rgb => self.prepare_rgb(&decoded, shape),
            ColorMode::Grayscale => self.prepare_gray(&decoded, shape),
        }
    }

    fn prepare_rgb(
        &self,
        decoded: &RasterImage,
        shape: InputShape,
    ) -> Result<ImageTensor, DomainError> {
        let resized = self.decoder.resize(decoded, shape.width, shape.height)?;
        let data = normalize(resized.data());
        let tensor =
            Array4::from_shape_vec((1, shape.height as usize, shape.width as usize, 3), data)
                .map_err(|e| DomainError::internal(format!("rgb tensor shape: {e}")))?;
        Ok(ImageTensor::Rgb(tensor))
    }

    fn prepare_gray(
        &self,
        decoded: &RasterImage,
        shape: InputShape,
    ) -> Result<ImageTensor, DomainError> {
        let gray = decoded.to_grayscale();
        let resized = self.decoder.resize(&gray, shape.width, shape.height)?;
        let data = normalize(resized.data());
        let tensor = Array3::from_shape_vec((shape.height as usize, shape.width as usize, 1), data)
            .map_err(|e| DomainError::internal(format!("gray tensor shape: {e}")))?;
        Ok(ImageTensor::Gray(tensor))
    }
}

/// Scale 8-bit samples into [0, 1]
fn normalize(data: &[u8]) -> Vec<f32> {
    data.iter().map(|byte| f32::from(*byte) / 255.0).collect()
}
