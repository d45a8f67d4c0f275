//! Weights payloads: named f32 tensors plus optional header metadata

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ndarray::{Array1, Array2, Array4};
use safetensors::{Dtype, SafeTensors};

use crate::domain::error::DomainError;

/// Key under which self-contained payloads embed their architecture JSON
const ARCHITECTURE_METADATA_KEY: &str = "architecture";

#[derive(Debug, Clone)]
struct RawTensor {
    shape: Vec<usize>,
    values: Vec<f32>,
}

/// A decoded weights file.
///
/// Tensors follow the `<layer>.kernel` / `<layer>.bias` naming convention.
/// Self-contained payloads additionally carry the architecture JSON in the
/// header metadata.
#[derive(Debug, Clone)]
pub struct WeightStore {
    source: PathBuf,
    tensors: HashMap<String, RawTensor>,
    metadata: HashMap<String, String>,
}

impl WeightStore {
    pub fn from_bytes(source: impl Into<PathBuf>, bytes: &[u8]) -> Result<Self, DomainError> {
        let source = source.into();

        let parsed = SafeTensors::deserialize(bytes).map_err(|e| {
            DomainError::model_load(
                source.display().to_string(),
                format!("invalid weights payload: {e}"),
            )
        })?;

        let mut tensors = HashMap::new();
        for (name, view) in parsed.tensors() {
            if view.dtype() != Dtype::F32 {
                return Err(DomainError::model_load(
                    source.display().to_string(),
                    format!("tensor '{}' has dtype {:?}, expected F32", name, view.dtype()),
                ));
            }
            let values = view
                .data()
                .chunks_exact(4)
                .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
                .collect();
            tensors.insert(
                name,
                RawTensor {
                    shape: view.shape().to_vec(),
                    values,
                },
            );
        }

        let (_, header) = SafeTensors::read_metadata(bytes).map_err(|e| {
            DomainError::model_load(
                source.display().to_string(),
                format!("unreadable weights header: {e}"),
            )
        })?;
        let metadata = header.metadata().clone().unwrap_or_default();

        Ok(Self {
            source,
            tensors,
            metadata,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Architecture JSON embedded in a self-contained payload, if any
    pub fn embedded_architecture(&self) -> Option<&str> {
        self.metadata.get(ARCHITECTURE_METADATA_KEY).map(String::as_str)
    }

    /// Convolution kernel for `layer`, shaped (kh, kw, in, out)
    pub fn conv_kernel(&self, layer: &str) -> Result<Array4<f32>, DomainError> {
        let name = format!("{layer}.kernel");
        let tensor = self.named(&name)?;
        let [kh, kw, c_in, c_out] = tensor.shape[..] else {
            return Err(self.error(format!(
                "tensor '{name}' has {} axes, expected 4 (kh, kw, in, out)",
                tensor.shape.len()
            )));
        };
        Array4::from_shape_vec((kh, kw, c_in, c_out), tensor.values.clone())
            .map_err(|e| self.error(format!("tensor '{name}': {e}")))
    }

    /// Dense kernel for `layer`, shaped (in, units)
    pub fn dense_kernel(&self, layer: &str) -> Result<Array2<f32>, DomainError> {
        let name = format!("{layer}.kernel");
        let tensor = self.named(&name)?;
        let [rows, cols] = tensor.shape[..] else {
            return Err(self.error(format!(
                "tensor '{name}' has {} axes, expected 2 (in, units)",
                tensor.shape.len()
            )));
        };
        Array2::from_shape_vec((rows, cols), tensor.values.clone())
            .map_err(|e| self.error(format!("tensor '{name}': {e}")))
    }

    /// Bias vector for `layer`
    pub fn bias(&self, layer: &str) -> Result<Array1<f32>, DomainError> {
        let name = format!("{layer}.bias");
        let tensor = self.named(&name)?;
        let [units] = tensor.shape[..] else {
            return Err(self.error(format!(
                "tensor '{name}' has {} axes, expected 1",
                tensor.shape.len()
            )));
        };
        Array1::from_shape_vec(units, tensor.values.clone())
            .map_err(|e| self.error(format!("tensor '{name}': {e}")))
    }

    fn named(&self, name: &str) -> Result<&RawTensor, DomainError> {
        self.tensors
            .get(name)
            .ok_or_else(|| self.error(format!("missing tensor '{name}'")))
    }

    fn error(&self, message: impl Into<String>) -> DomainError {
        DomainError::model_load(self.source.display().to_string(), message)
    }
}
