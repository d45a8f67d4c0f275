//! Model loading and inference seams

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::catalog::ArtifactReference;
use crate::domain::error::DomainError;
use crate::domain::preprocess::ImageTensor;

/// Input volume declared by a model's first layer, batch axis excluded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputShape {
    pub height: u32,
    pub width: u32,
    pub channels: u32,
}

impl InputShape {
    pub fn new(height: u32, width: u32, channels: u32) -> Self {
        Self {
            height,
            width,
            channels,
        }
    }
}

impl fmt::Display for InputShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.height, self.width, self.channels)
    }
}

/// A model materialized in memory, ready to run
pub trait LoadedModel: Send {
    /// Input volume the model expects; drives preprocessing
    fn input_shape(&self) -> InputShape;

    /// Run a forward pass and return the class scores of the single input
    fn predict(&self, input: &ImageTensor) -> Result<Vec<f32>, DomainError>;
}

/// Materializes models from catalog references.
///
/// Loading is uncached. Every prediction pays the full artifact read, even
/// when the same name repeats within one comparison.
pub trait ModelRuntime: Send + Sync + fmt::Debug {
    fn load(&self, reference: &ArtifactReference) -> Result<Box<dyn LoadedModel>, DomainError>;
}
