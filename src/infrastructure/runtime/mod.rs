//! Sequential model runtime: artifact files in, forward passes out

mod architecture;
mod forward;
mod weights;

pub use architecture::{
    parse_descriptor, Activation, ArchitectureDescriptor, LayerDescriptor, LayerKind, Padding,
    ShapeDeclaration,
};
pub use forward::LayerOp;
pub use weights::WeightStore;

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::domain::catalog::ArtifactReference;
use crate::domain::error::DomainError;
use crate::domain::preprocess::ImageTensor;
use crate::domain::runtime::{InputShape, LoadedModel, ModelRuntime};

/// Loads sequential models from catalog references and runs them on the CPU.
///
/// The runtime holds no state; every `load` reads the artifact files again.
#[derive(Debug, Default, Clone)]
pub struct SequentialRuntime;

impl SequentialRuntime {
    pub fn new() -> Self {
        Self
    }
}

impl ModelRuntime for SequentialRuntime {
    fn load(&self, reference: &ArtifactReference) -> Result<Box<dyn LoadedModel>, DomainError> {
        let model = match reference {
            ArtifactReference::Single { path } => {
                let store = read_weights(path)?;
                let json = store
                    .embedded_architecture()
                    .ok_or_else(|| {
                        DomainError::model_load(
                            path.display().to_string(),
                            "payload has no embedded architecture",
                        )
                    })?
                    .to_string();
                let descriptor = parse_descriptor(path, &json)?;
                SequentialModel::assemble(path, descriptor, &store)?
            }
            ArtifactReference::Paired {
                architecture,
                weights,
            } => {
                let json = fs::read_to_string(architecture).map_err(|e| {
                    DomainError::model_load(architecture.display().to_string(), e.to_string())
                })?;
                let descriptor = parse_descriptor(architecture, &json)?;
                let store = read_weights(weights)?;
                SequentialModel::assemble(weights, descriptor, &store)?
            }
        };

        Ok(Box::new(model))
    }
}

fn read_weights(path: &Path) -> Result<WeightStore, DomainError> {
    let bytes = fs::read(path)
        .map_err(|e| DomainError::model_load(path.display().to_string(), e.to_string()))?;
    WeightStore::from_bytes(path, &bytes)
}

/// A descriptor joined with its weights, ready to run
pub struct SequentialModel {
    input_shape: InputShape,
    ops: Vec<LayerOp>,
}

impl SequentialModel {
    fn assemble(
        source: &Path,
        descriptor: ArchitectureDescriptor,
        weights: &WeightStore,
    ) -> Result<Self, DomainError> {
        let input_shape = descriptor.input_shape(source)?;

        let mut ops = Vec::new();
        for (index, layer) in descriptor.layers.iter().enumerate() {
            match layer.kind {
                LayerKind::Input => {
                    if index != 0 {
                        return Err(load_error(
                            source,
                            format!("layer '{}': input layers may only appear first", layer.name),
                        ));
                    }
                }
                // dropout only acts during training
                LayerKind::Dropout => {}
                LayerKind::Flatten => ops.push(LayerOp::Flatten),
                LayerKind::GlobalAvgPool2d => ops.push(LayerOp::GlobalAvgPool2d),
                LayerKind::MaxPool2d => {
                    let pool = layer.pool_size.ok_or_else(|| {
                        load_error(
                            source,
                            format!("layer '{}': max_pool2d requires pool_size", layer.name),
                        )
                    })?;
                    let strides = layer.strides.unwrap_or(pool);
                    ops.push(LayerOp::MaxPool2d {
                        name: layer.name.clone(),
                        pool: (pool[0], pool[1]),
                        strides: (strides[0], strides[1]),
                    });
                }
                LayerKind::Conv2d => {
                    let kernel = weights.conv_kernel(&layer.name)?;
                    let bias = weights.bias(&layer.name)?;

                    let (kh, kw, _, c_out) = kernel.dim();
                    if let Some(declared) = layer.kernel_size {
                        if declared != [kh, kw] {
                            return Err(load_error(
                                source,
                                format!(
                                    "layer '{}': declared kernel_size {:?} but weights are {}x{}",
                                    layer.name, declared, kh, kw
                                ),
                            ));
                        }
                    }
                    if let Some(filters) = layer.filters {
                        if filters != c_out {
                            return Err(load_error(
                                source,
                                format!(
                                    "layer '{}': declared {} filters but weights hold {}",
                                    layer.name, filters, c_out
                                ),
                            ));
                        }
                    }

                    let strides = layer.strides.unwrap_or([1, 1]);
                    ops.push(LayerOp::Conv2d {
                        name: layer.name.clone(),
                        kernel,
                        bias,
                        strides: (strides[0], strides[1]),
                        padding: layer.padding.unwrap_or_default(),
                        activation: layer.activation.unwrap_or_default(),
                    });
                }
                LayerKind::Dense => {
                    let kernel = weights.dense_kernel(&layer.name)?;
                    let bias = weights.bias(&layer.name)?;

                    if let Some(units) = layer.units {
                        if units != kernel.ncols() {
                            return Err(load_error(
                                source,
                                format!(
                                    "layer '{}': declared {} units but weights hold {}",
                                    layer.name,
                                    units,
                                    kernel.ncols()
                                ),
                            ));
                        }
                    }

                    ops.push(LayerOp::Dense {
                        name: layer.name.clone(),
                        kernel,
                        bias,
                        activation: layer.activation.unwrap_or_default(),
                    });
                }
            }
        }

        debug!(
            model = %descriptor.name,
            input = %input_shape,
            layers = ops.len(),
            "model assembled"
        );

        Ok(Self { input_shape, ops })
    }
}

impl LoadedModel for SequentialModel {
    fn input_shape(&self) -> InputShape {
        self.input_shape
    }

    fn predict(&self, input: &ImageTensor) -> Result<Vec<f32>, DomainError> {
        forward::run(&self.ops, input)
    }
}

fn load_error(source: &Path, message: impl Into<String>) -> DomainError {
    DomainError::model_load(source.display().to_string(), message)
}
