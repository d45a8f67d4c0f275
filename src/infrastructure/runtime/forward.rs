//! Sequential forward pass over ndarray feature maps

use ndarray::{Array1, Array2, Array3, Array4, Axis};

use crate::domain::error::DomainError;
use crate::domain::preprocess::ImageTensor;

use super::architecture::{Activation, Padding};

/// One executable layer. Input and dropout layers never appear here; neither
/// has inference-time behavior.
#[derive(Debug, Clone)]
pub enum LayerOp {
    Conv2d {
        name: String,
        kernel: Array4<f32>,
        bias: Array1<f32>,
        strides: (usize, usize),
        padding: Padding,
        activation: Activation,
    },
    MaxPool2d {
        name: String,
        pool: (usize, usize),
        strides: (usize, usize),
    },
    GlobalAvgPool2d,
    Flatten,
    Dense {
        name: String,
        kernel: Array2<f32>,
        bias: Array1<f32>,
        activation: Activation,
    },
}

/// Value flowing between layers: a spatial map or a flat vector
enum Feature {
    Map(Array3<f32>),
    Vector(Array1<f32>),
}

/// Run `ops` over `input` and return the final class scores.
///
/// The batched RGB tensor contributes its single row; the unbatched gray
/// tensor is used as-is.
pub fn run(ops: &[LayerOp], input: &ImageTensor) -> Result<Vec<f32>, DomainError> {
    let mut feature = match input {
        ImageTensor::Rgb(tensor) => Feature::Map(tensor.index_axis(Axis(0), 0).to_owned()),
        ImageTensor::Gray(tensor) => Feature::Map(tensor.clone()),
    };

    for op in ops {
        feature = apply(op, feature)?;
    }

    match feature {
        Feature::Vector(vector) => Ok(vector.to_vec()),
        Feature::Map(_) => Err(DomainError::inference(
            "network ended on a feature map; the final layer must produce a vector",
        )),
    }
}

fn apply(op: &LayerOp, feature: Feature) -> Result<Feature, DomainError> {
    match op {
        LayerOp::Conv2d {
            name,
            kernel,
            bias,
            strides,
            padding,
            activation,
        } => {
            let map = expect_map(feature, name)?;
            let out = conv2d(&map, kernel, bias, *strides, *padding, name)?;
            Ok(Feature::Map(activate_map(out, *activation)))
        }
        LayerOp::MaxPool2d { name, pool, strides } => {
            let map = expect_map(feature, name)?;
            Ok(Feature::Map(max_pool2d(&map, *pool, *strides, name)?))
        }
        LayerOp::GlobalAvgPool2d => {
            let map = expect_map(feature, "global_avg_pool2d")?;
            Ok(Feature::Vector(global_avg_pool(&map)))
        }
        LayerOp::Flatten => Ok(Feature::Vector(flatten(feature))),
        LayerOp::Dense {
            name,
            kernel,
            bias,
            activation,
        } => {
            let vector = expect_vector(feature, name)?;
            let out = dense(&vector, kernel, bias, name)?;
            Ok(Feature::Vector(activate_vector(out, *activation)))
        }
    }
}

fn expect_map(feature: Feature, layer: &str) -> Result<Array3<f32>, DomainError> {
    match feature {
        Feature::Map(map) => Ok(map),
        Feature::Vector(_) => Err(DomainError::inference(format!(
            "layer '{layer}' expects a feature map but received a vector"
        ))),
    }
}

fn expect_vector(feature: Feature, layer: &str) -> Result<Array1<f32>, DomainError> {
    match feature {
        Feature::Vector(vector) => Ok(vector),
        Feature::Map(_) => Err(DomainError::inference(format!(
            "layer '{layer}' expects a vector but received a feature map"
        ))),
    }
}

/// Output length and leading pad for one spatial axis.
///
/// Same padding keeps `ceil(input / stride)` positions and splits the pad
/// with the extra cell trailing. Valid padding requires the kernel to fit.
fn padded_extent(
    input: usize,
    kernel: usize,
    stride: usize,
    padding: Padding,
    layer: &str,
    axis: &str,
) -> Result<(usize, usize), DomainError> {
    match padding {
        Padding::Same => {
            let output = input.div_ceil(stride);
            let needed = ((output - 1) * stride + kernel).saturating_sub(input);
            Ok((output, needed / 2))
        }
        Padding::Valid => {
            if input < kernel {
                return Err(DomainError::inference(format!(
                    "layer '{layer}': {axis} {input} is smaller than the {kernel}-wide kernel"
                )));
            }
            Ok(((input - kernel) / stride + 1, 0))
        }
    }
}

fn conv2d(
    input: &Array3<f32>,
    kernel: &Array4<f32>,
    bias: &Array1<f32>,
    strides: (usize, usize),
    padding: Padding,
    layer: &str,
) -> Result<Array3<f32>, DomainError> {
    let (h, w, c_in) = input.dim();
    let (kh, kw, kc_in, c_out) = kernel.dim();

    if kc_in != c_in {
        return Err(DomainError::inference(format!(
            "layer '{layer}': kernel expects {kc_in} input channels, feature map has {c_in}"
        )));
    }
    if bias.len() != c_out {
        return Err(DomainError::inference(format!(
            "layer '{layer}': bias length {} does not match {c_out} filters",
            bias.len()
        )));
    }
    if strides.0 == 0 || strides.1 == 0 {
        return Err(DomainError::inference(format!("layer '{layer}': zero stride")));
    }

    let (out_h, pad_top) = padded_extent(h, kh, strides.0, padding, layer, "height")?;
    let (out_w, pad_left) = padded_extent(w, kw, strides.1, padding, layer, "width")?;

    let mut output = Array3::<f32>::zeros((out_h, out_w, c_out));
    for oy in 0..out_h {
        for ox in 0..out_w {
            for oc in 0..c_out {
                let mut acc = bias[oc];
                for ky in 0..kh {
                    let Some(iy) = (oy * strides.0 + ky).checked_sub(pad_top) else {
                        continue;
                    };
                    if iy >= h {
                        continue;
                    }
                    for kx in 0..kw {
                        let Some(ix) = (ox * strides.1 + kx).checked_sub(pad_left) else {
                            continue;
                        };
                        if ix >= w {
                            continue;
                        }
                        for ic in 0..c_in {
                            acc += input[[iy, ix, ic]] * kernel[[ky, kx, ic, oc]];
                        }
                    }
                }
                output[[oy, ox, oc]] = acc;
            }
        }
    }

    Ok(output)
}

fn max_pool2d(
    input: &Array3<f32>,
    pool: (usize, usize),
    strides: (usize, usize),
    layer: &str,
) -> Result<Array3<f32>, DomainError> {
    let (h, w, c) = input.dim();

    if pool.0 == 0 || pool.1 == 0 || strides.0 == 0 || strides.1 == 0 {
        return Err(DomainError::inference(format!(
            "layer '{layer}': zero pool size or stride"
        )));
    }
    if h < pool.0 || w < pool.1 {
        return Err(DomainError::inference(format!(
            "layer '{layer}': {h}x{w} feature map is smaller than the {}x{} window",
            pool.0, pool.1
        )));
    }

    let out_h = (h - pool.0) / strides.0 + 1;
    let out_w = (w - pool.1) / strides.1 + 1;

    let mut output = Array3::<f32>::zeros((out_h, out_w, c));
    for oy in 0..out_h {
        for ox in 0..out_w {
            for ch in 0..c {
                let mut best = f32::NEG_INFINITY;
                for ky in 0..pool.0 {
                    for kx in 0..pool.1 {
                        best = best.max(input[[oy * strides.0 + ky, ox * strides.1 + kx, ch]]);
                    }
                }
                output[[oy, ox, ch]] = best;
            }
        }
    }

    Ok(output)
}

fn global_avg_pool(input: &Array3<f32>) -> Array1<f32> {
    let (h, w, c) = input.dim();
    let denominator = (h * w) as f32;

    let mut output = Array1::<f32>::zeros(c);
    for ch in 0..c {
        let mut sum = 0.0;
        for y in 0..h {
            for x in 0..w {
                sum += input[[y, x, ch]];
            }
        }
        output[ch] = sum / denominator;
    }
    output
}

/// Row-major flatten: height, then width, then channels. A vector passes
/// through unchanged.
fn flatten(feature: Feature) -> Array1<f32> {
    match feature {
        Feature::Map(map) => Array1::from_vec(map.iter().copied().collect()),
        Feature::Vector(vector) => vector,
    }
}

fn dense(
    input: &Array1<f32>,
    kernel: &Array2<f32>,
    bias: &Array1<f32>,
    layer: &str,
) -> Result<Array1<f32>, DomainError> {
    let (rows, cols) = kernel.dim();

    if input.len() != rows {
        return Err(DomainError::inference(format!(
            "layer '{layer}': kernel expects {rows} inputs, received {}",
            input.len()
        )));
    }
    if bias.len() != cols {
        return Err(DomainError::inference(format!(
            "layer '{layer}': bias length {} does not match {cols} units",
            bias.len()
        )));
    }

    Ok(input.dot(kernel) + bias)
}

fn activate_vector(mut vector: Array1<f32>, activation: Activation) -> Array1<f32> {
    match activation {
        Activation::Linear => vector,
        Activation::Relu => {
            vector.mapv_inplace(|v| v.max(0.0));
            vector
        }
        Activation::Sigmoid => {
            vector.mapv_inplace(sigmoid);
            vector
        }
        Activation::Tanh => {
            vector.mapv_inplace(f32::tanh);
            vector
        }
        Activation::Softmax => softmax(vector),
    }
}

fn activate_map(mut map: Array3<f32>, activation: Activation) -> Array3<f32> {
    match activation {
        Activation::Linear => map,
        Activation::Relu => {
            map.mapv_inplace(|v| v.max(0.0));
            map
        }
        Activation::Sigmoid => {
            map.mapv_inplace(sigmoid);
            map
        }
        Activation::Tanh => {
            map.mapv_inplace(f32::tanh);
            map
        }
        Activation::Softmax => {
            // per-position softmax across the channel axis
            for mut lane in map.lanes_mut(Axis(2)) {
                let max = lane.iter().copied().fold(f32::NEG_INFINITY, f32::max);
                lane.mapv_inplace(|v| (v - max).exp());
                let sum = lane.sum();
                if sum > 0.0 {
                    lane.mapv_inplace(|v| v / sum);
                }
            }
            map
        }
    }
}

fn sigmoid(v: f32) -> f32 {
    1.0 / (1.0 + (-v).exp())
}

/// Numerically-stable softmax: shift by the max before exponentiating
fn softmax(mut vector: Array1<f32>) -> Array1<f32> {
    let max = vector.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    vector.mapv_inplace(|v| (v - max).exp());
    let sum = vector.sum();
    if sum > 0.0 {
        vector.mapv_inplace(|v| v / sum);
    }
    vector
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2, Array4};

    fn rgb_input(h: usize, w: usize, value: f32) -> ImageTensor {
        ImageTensor::Rgb(Array4::from_elem((1, h, w, 3), value))
    }

    fn ones_kernel(kh: usize, kw: usize, c_in: usize, c_out: usize) -> Array4<f32> {
        Array4::from_elem((kh, kw, c_in, c_out), 1.0)
    }

    #[test]
    fn test_flatten_then_dense() {
        // 1x2x1 map flattened to [1, 2]; kernel picks [a+2b, a-b]
        let map = Array3::from_shape_vec((1, 2, 1), vec![1.0, 2.0]).unwrap();
        let ops = vec![
            LayerOp::Flatten,
            LayerOp::Dense {
                name: "fc".to_string(),
                kernel: arr2(&[[1.0, 1.0], [2.0, -1.0]]),
                bias: arr1(&[0.5, 0.0]),
                activation: Activation::Linear,
            },
        ];

        let scores = run(&ops, &ImageTensor::Gray(map)).unwrap();
        assert_eq!(scores, vec![5.5, -1.0]);
    }

    #[test]
    fn test_conv_same_padding_sums_neighborhood() {
        // 3x3 ones input, 3x3 ones kernel, stride 1, same padding:
        // corners see 4 cells, edges 6, the center all 9
        let input = Array3::from_elem((3, 3, 1), 1.0);
        let out = conv2d(
            &input,
            &ones_kernel(3, 3, 1, 1),
            &arr1(&[0.0]),
            (1, 1),
            Padding::Same,
            "c1",
        )
        .unwrap();

        assert_eq!(out.dim(), (3, 3, 1));
        assert_eq!(out[[0, 0, 0]], 4.0);
        assert_eq!(out[[0, 1, 0]], 6.0);
        assert_eq!(out[[1, 1, 0]], 9.0);
    }

    #[test]
    fn test_conv_valid_padding_shrinks() {
        let input = Array3::from_elem((4, 5, 1), 1.0);
        let out = conv2d(
            &input,
            &ones_kernel(3, 3, 1, 2),
            &arr1(&[0.0, 1.0]),
            (1, 1),
            Padding::Valid,
            "c1",
        )
        .unwrap();

        assert_eq!(out.dim(), (2, 3, 2));
        assert_eq!(out[[0, 0, 0]], 9.0);
        // second filter carries its bias
        assert_eq!(out[[0, 0, 1]], 10.0);
    }

    #[test]
    fn test_conv_stride_two_same() {
        let input = Array3::from_elem((5, 5, 1), 1.0);
        let out = conv2d(
            &input,
            &ones_kernel(1, 1, 1, 1),
            &arr1(&[0.0]),
            (2, 2),
            Padding::Same,
            "c1",
        )
        .unwrap();

        // ceil(5 / 2) = 3
        assert_eq!(out.dim(), (3, 3, 1));
    }

    #[test]
    fn test_conv_channel_mismatch() {
        let input = Array3::from_elem((3, 3, 3), 1.0);
        let err = conv2d(
            &input,
            &ones_kernel(3, 3, 1, 1),
            &arr1(&[0.0]),
            (1, 1),
            Padding::Same,
            "c1",
        )
        .unwrap_err();

        assert!(matches!(err, DomainError::Inference { .. }));
        assert!(err.to_string().contains("input channels"));
    }

    #[test]
    fn test_conv_valid_kernel_too_large() {
        let input = Array3::from_elem((2, 2, 1), 1.0);
        let err = conv2d(
            &input,
            &ones_kernel(3, 3, 1, 1),
            &arr1(&[0.0]),
            (1, 1),
            Padding::Valid,
            "c1",
        )
        .unwrap_err();
        assert!(err.to_string().contains("smaller than"));
    }

    #[test]
    fn test_max_pool() {
        let input = Array3::from_shape_vec(
            (4, 4, 1),
            vec![
                1.0, 2.0, 5.0, 3.0, //
                4.0, 0.0, 1.0, 2.0, //
                9.0, 1.0, 0.0, 0.0, //
                2.0, 3.0, 0.0, 7.0,
            ],
        )
        .unwrap();

        let out = max_pool2d(&input, (2, 2), (2, 2), "p1").unwrap();
        assert_eq!(out.dim(), (2, 2, 1));
        assert_eq!(out[[0, 0, 0]], 4.0);
        assert_eq!(out[[0, 1, 0]], 5.0);
        assert_eq!(out[[1, 0, 0]], 9.0);
        assert_eq!(out[[1, 1, 0]], 7.0);
    }

    #[test]
    fn test_max_pool_window_too_large() {
        let input = Array3::from_elem((2, 2, 1), 1.0);
        let err = max_pool2d(&input, (3, 3), (1, 1), "p1").unwrap_err();
        assert!(err.to_string().contains("smaller than"));
    }

    #[test]
    fn test_global_avg_pool() {
        let input = Array3::from_shape_vec(
            (2, 2, 2),
            vec![1.0, 10.0, 2.0, 20.0, 3.0, 30.0, 4.0, 40.0],
        )
        .unwrap();

        let out = global_avg_pool(&input);
        assert_eq!(out.to_vec(), vec![2.5, 25.0]);
    }

    #[test]
    fn test_dense_input_mismatch() {
        let err = dense(
            &arr1(&[1.0, 2.0, 3.0]),
            &arr2(&[[1.0], [1.0]]),
            &arr1(&[0.0]),
            "fc",
        )
        .unwrap_err();
        assert!(err.to_string().contains("expects 2 inputs"));
    }

    #[test]
    fn test_dense_on_map_fails() {
        let ops = vec![LayerOp::Dense {
            name: "fc".to_string(),
            kernel: arr2(&[[1.0]]),
            bias: arr1(&[0.0]),
            activation: Activation::Linear,
        }];

        let err = run(&ops, &rgb_input(2, 2, 1.0)).unwrap_err();
        assert!(err.to_string().contains("expects a vector"));
    }

    #[test]
    fn test_network_must_end_in_a_vector() {
        let err = run(&[], &rgb_input(2, 2, 0.0)).unwrap_err();
        assert!(err.to_string().contains("must produce a vector"));
    }

    #[test]
    fn test_rgb_batch_axis_is_dropped() {
        let ops = vec![LayerOp::Flatten];
        let scores = run(&ops, &rgb_input(1, 2, 0.25)).unwrap();
        // 1x2x3 volume, batch row taken once
        assert_eq!(scores, vec![0.25; 6]);
    }

    #[test]
    fn test_relu_and_sigmoid() {
        let relu = activate_vector(arr1(&[-1.0, 0.5]), Activation::Relu);
        assert_eq!(relu.to_vec(), vec![0.0, 0.5]);

        let sig = activate_vector(arr1(&[0.0]), Activation::Sigmoid);
        assert!((sig[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let out = activate_vector(arr1(&[0.0, 0.0]), Activation::Softmax);
        assert!((out[0] - 0.5).abs() < 1e-6);
        assert!((out[1] - 0.5).abs() < 1e-6);

        let skewed = activate_vector(arr1(&[100.0, 0.0, -100.0]), Activation::Softmax);
        let sum: f32 = skewed.sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(skewed[0] > 0.99);
    }
}
