//! Prediction request and response types

use serde::{Deserialize, Serialize};

use crate::domain::Prediction;

/// Single-model prediction request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub model: String,
    /// Path of the image to classify, relative to the server's working directory
    pub image: String,
}

/// Multi-model comparison request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareRequest {
    pub models: Vec<String>,
    pub image: String,
}

/// One class label with its rounded percentage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledScore {
    pub label: String,
    pub score: f64,
}

/// Result of one model run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub model: String,
    pub image: String,
    pub scores: Vec<LabeledScore>,
    pub elapsed_seconds: f64,
}

impl PredictionResponse {
    /// Zip configured labels with the score vector, positionally.
    /// The zip stops at the shorter side.
    pub fn from_prediction(prediction: &Prediction, image: &str, labels: &[String]) -> Self {
        let scores = labels
            .iter()
            .zip(prediction.scores.iter())
            .map(|(label, score)| LabeledScore {
                label: label.clone(),
                score: *score,
            })
            .collect();

        Self {
            model: prediction.model.clone(),
            image: image.to_string(),
            scores,
            elapsed_seconds: prediction.elapsed_seconds,
        }
    }
}

/// Result of a multi-model comparison. Models missing from the catalog are
/// absent rather than reported as errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareResponse {
    pub image: String,
    pub predictions: Vec<PredictionResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<String> {
        vec![
            "GLIOMA".to_string(),
            "MENINGIOMA".to_string(),
            "PITUITARY".to_string(),
        ]
    }

    fn prediction(scores: Vec<f64>) -> Prediction {
        Prediction {
            model: "VGG19_model".to_string(),
            scores,
            elapsed_seconds: 0.1234,
        }
    }

    #[test]
    fn test_request_deserialization() {
        let json = r#"{"model": "VGG19_model", "image": "static/queryImage/Glioma_1.jpg"}"#;
        let request: PredictRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.model, "VGG19_model");
        assert_eq!(request.image, "static/queryImage/Glioma_1.jpg");
    }

    #[test]
    fn test_labels_zip_positionally() {
        let response = PredictionResponse::from_prediction(
            &prediction(vec![12.5, 80.0, 7.5]),
            "static/queryImage/Glioma_1.jpg",
            &labels(),
        );

        assert_eq!(response.scores.len(), 3);
        assert_eq!(response.scores[0].label, "GLIOMA");
        assert_eq!(response.scores[0].score, 12.5);
        assert_eq!(response.scores[2].label, "PITUITARY");
        assert_eq!(response.elapsed_seconds, 0.1234);
    }

    #[test]
    fn test_zip_stops_at_shorter_side() {
        let fewer_scores =
            PredictionResponse::from_prediction(&prediction(vec![100.0]), "img.jpg", &labels());
        assert_eq!(fewer_scores.scores.len(), 1);
        assert_eq!(fewer_scores.scores[0].label, "GLIOMA");

        let fewer_labels = PredictionResponse::from_prediction(
            &prediction(vec![25.0, 25.0, 25.0, 25.0]),
            "img.jpg",
            &labels(),
        );
        assert_eq!(fewer_labels.scores.len(), 3);
    }

    #[test]
    fn test_compare_response_serialization() {
        let response = CompareResponse {
            image: "img.jpg".to_string(),
            predictions: vec![PredictionResponse::from_prediction(
                &prediction(vec![50.0, 50.0]),
                "img.jpg",
                &labels(),
            )],
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"predictions\""));
        assert!(json.contains("VGG19_model"));
        assert!(json.contains("MENINGIOMA"));
    }
}
