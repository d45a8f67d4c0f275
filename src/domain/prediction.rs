//! Prediction results and their rounding rules

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Decimal places kept on percentage scores
const SCORE_DECIMALS: i32 = 3;

/// Decimal places kept on elapsed seconds
const ELAPSED_DECIMALS: i32 = 4;

/// Outcome of one inference run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Catalog entry the scores came from
    pub model: String,
    /// Per-class scores as percentages, one per output unit
    pub scores: Vec<f64>,
    /// Wall-clock seconds spent inside the forward pass only
    pub elapsed_seconds: f64,
}

impl Prediction {
    /// Build from raw model output. Scores scale to percentages at three
    /// decimals; the elapsed time keeps four. Callers time the forward pass
    /// alone, so artifact reads and preprocessing never count.
    pub fn from_output(model: impl Into<String>, output: &[f32], elapsed: Duration) -> Self {
        Self {
            model: model.into(),
            scores: output
                .iter()
                .map(|score| round_to(f64::from(*score) * 100.0, SCORE_DECIMALS))
                .collect(),
            elapsed_seconds: round_to(elapsed.as_secs_f64(), ELAPSED_DECIMALS),
        }
    }
}

/// Round half away from zero to `decimals` places
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
