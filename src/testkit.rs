//! Shared test fixtures: model artifacts and encoded images

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use image::RgbImage;
use safetensors::tensor::TensorView;
use safetensors::{serialize, Dtype};
use tempfile::TempDir;

pub fn tempdir() -> TempDir {
    tempfile::tempdir().expect("create temp dir")
}

pub fn write_file(dir: &Path, name: &str, bytes: impl AsRef<[u8]>) {
    fs::write(dir.join(name), bytes).expect("write fixture");
}

/// Architecture JSON for an input -> flatten -> dense network
pub fn descriptor_json(
    name: &str,
    height: u32,
    width: u32,
    channels: u32,
    units: usize,
    activation: &str,
) -> String {
    serde_json::json!({
        "name": name,
        "layers": [
            { "name": "input", "kind": "input", "shape": [null, height, width, channels] },
            { "name": "flatten", "kind": "flatten" },
            { "name": "output", "kind": "dense", "units": units, "activation": activation }
        ]
    })
    .to_string()
}

/// Serialize named f32 tensors into a safetensors payload
pub fn weights_payload(
    tensors: &[(&str, Vec<usize>, Vec<f32>)],
    metadata: Option<HashMap<String, String>>,
) -> Vec<u8> {
    let raw: Vec<(String, Vec<usize>, Vec<u8>)> = tensors
        .iter()
        .map(|(name, shape, values)| {
            let bytes = values.iter().flat_map(|v| v.to_le_bytes()).collect();
            (name.to_string(), shape.clone(), bytes)
        })
        .collect();

    let views: Vec<(String, TensorView<'_>)> = raw
        .iter()
        .map(|(name, shape, bytes)| {
            let view =
                TensorView::new(Dtype::F32, shape.clone(), bytes).expect("build tensor view");
            (name.clone(), view)
        })
        .collect();

    serialize(views, &metadata).expect("serialize weights")
}

/// Weights for the `descriptor_json` network: one dense layer named `output`
pub fn dense_weights(input_len: usize, units: usize, kernel: Vec<f32>, bias: Vec<f32>) -> Vec<u8> {
    weights_payload(
        &[
            ("output.kernel", vec![input_len, units], kernel),
            ("output.bias", vec![units], bias),
        ],
        None,
    )
}

/// Self-contained payload: weights plus the architecture JSON in the header
pub fn self_contained_payload(
    descriptor: &str,
    tensors: &[(&str, Vec<usize>, Vec<f32>)],
) -> Vec<u8> {
    let mut metadata = HashMap::new();
    metadata.insert("architecture".to_string(), descriptor.to_string());
    weights_payload(tensors, Some(metadata))
}

/// Solid-color PNG, encoded
pub fn png_bytes(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    let mut buffer = RgbImage::new(width, height);
    for pixel in buffer.pixels_mut() {
        *pixel = image::Rgb(color);
    }

    let mut bytes = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut bytes);
    buffer
        .write_to(&mut cursor, image::ImageFormat::Png)
        .expect("encode png");
    bytes
}

/// A ready-to-load paired model: `<stem>_model.json` + `<stem>_weights.h5`.
///
/// The network flattens an (height, width, channels) input and applies one
/// linear dense layer with a zero kernel, so its output is exactly `bias`.
pub fn write_paired_model(
    dir: &Path,
    stem: &str,
    height: u32,
    width: u32,
    channels: u32,
    bias: Vec<f32>,
) {
    let units = bias.len();
    let input_len = (height * width * channels) as usize;
    let descriptor = descriptor_json(stem, height, width, channels, units, "linear");
    let weights = dense_weights(input_len, units, vec![0.0; input_len * units], bias);

    write_file(dir, &format!("{stem}_model.json"), descriptor);
    write_file(dir, &format!("{stem}_weights.h5"), weights);
}

/// A ready-to-load self-contained model: `<stem>_model.h5`
pub fn write_single_model(
    dir: &Path,
    stem: &str,
    height: u32,
    width: u32,
    channels: u32,
    bias: Vec<f32>,
) {
    let units = bias.len();
    let input_len = (height * width * channels) as usize;
    let descriptor = descriptor_json(stem, height, width, channels, units, "linear");
    let payload = self_contained_payload(
        &descriptor,
        &[
            (
                "output.kernel",
                vec![input_len, units],
                vec![0.0; input_len * units],
            ),
            ("output.bias", vec![units], bias),
        ],
    );

    write_file(dir, &format!("{stem}_model.h5"), payload);
}
