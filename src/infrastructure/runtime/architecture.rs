//! Architecture descriptors: the JSON half of a model

use std::path::Path;

use serde::Deserialize;

use crate::domain::error::DomainError;
use crate::domain::runtime::InputShape;

/// A declared network: a name and an ordered layer list
#[derive(Debug, Clone, Deserialize)]
pub struct ArchitectureDescriptor {
    pub name: String,
    pub layers: Vec<LayerDescriptor>,
}

/// One layer declaration. Fields beyond `name` and `kind` apply only to the
/// kinds that use them; extras are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct LayerDescriptor {
    pub name: String,
    pub kind: LayerKind,
    #[serde(default)]
    pub shape: Option<ShapeDeclaration>,
    #[serde(default)]
    pub filters: Option<usize>,
    #[serde(default)]
    pub kernel_size: Option<[usize; 2]>,
    #[serde(default)]
    pub pool_size: Option<[usize; 2]>,
    #[serde(default)]
    pub strides: Option<[usize; 2]>,
    #[serde(default)]
    pub padding: Option<Padding>,
    #[serde(default)]
    pub units: Option<usize>,
    #[serde(default)]
    pub activation: Option<Activation>,
    #[serde(default)]
    pub rate: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Input,
    Conv2d,
    MaxPool2d,
    GlobalAvgPool2d,
    Flatten,
    Dense,
    Dropout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Padding {
    #[default]
    Same,
    Valid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    #[default]
    Linear,
    Relu,
    Sigmoid,
    Tanh,
    Softmax,
}

/// Input shape as written in a descriptor: a dimension list, or a one-element
/// list of dimension lists. The batch dimension is null either way.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ShapeDeclaration {
    Flat(Vec<Option<u32>>),
    Nested(Vec<Vec<Option<u32>>>),
}

impl ShapeDeclaration {
    fn dims(&self, source: &Path) -> Result<&[Option<u32>], DomainError> {
        match self {
            Self::Flat(dims) => Ok(dims),
            Self::Nested(outer) => match outer.as_slice() {
                [dims] => Ok(dims),
                _ => Err(malformed(
                    source,
                    format!("expected exactly one nested input shape, found {}", outer.len()),
                )),
            },
        }
    }
}

impl ArchitectureDescriptor {
    /// Input volume from the leading input layer.
    ///
    /// Height and width sit at dimension indices 1 and 2, channels at 3; the
    /// batch dimension is skipped.
    pub fn input_shape(&self, source: &Path) -> Result<InputShape, DomainError> {
        let first = self
            .layers
            .first()
            .ok_or_else(|| malformed(source, "architecture has no layers"))?;

        if first.kind != LayerKind::Input {
            return Err(malformed(
                source,
                format!("first layer '{}' is not an input layer", first.name),
            ));
        }

        let declared = first.shape.as_ref().ok_or_else(|| {
            malformed(source, format!("input layer '{}' declares no shape", first.name))
        })?;
        let dims = declared.dims(source)?;

        if dims.len() != 4 {
            return Err(malformed(
                source,
                format!(
                    "input shape has {} dimensions, expected 4 (batch, height, width, channels)",
                    dims.len()
                ),
            ));
        }

        let height = dims[1].ok_or_else(|| malformed(source, "input height is null"))?;
        let width = dims[2].ok_or_else(|| malformed(source, "input width is null"))?;
        let channels = dims[3].ok_or_else(|| malformed(source, "input channels is null"))?;

        if height == 0 || width == 0 || channels == 0 {
            return Err(malformed(source, "input dimensions must be non-zero"));
        }

        Ok(InputShape::new(height, width, channels))
    }
}

/// Parse a descriptor from its JSON text
pub fn parse_descriptor(source: &Path, json: &str) -> Result<ArchitectureDescriptor, DomainError> {
    serde_json::from_str(json)
        .map_err(|e| malformed(source, format!("invalid architecture descriptor: {e}")))
}

fn malformed(source: &Path, message: impl Into<String>) -> DomainError {
    DomainError::model_load(source.display().to_string(), message)
}
