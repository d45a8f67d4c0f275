//! Prediction service - load, preprocess, infer, round

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, warn};

use crate::domain::catalog::{ArtifactReference, CatalogBuilder, DirectoryLister};
use crate::domain::error::DomainError;
use crate::domain::image::{ImageDecoder, ImageSource};
use crate::domain::prediction::Prediction;
use crate::domain::preprocess::{ColorMode, Preprocessor};
use crate::domain::runtime::ModelRuntime;

/// Runs predictions against cataloged models.
///
/// Nothing is cached: each call re-derives the catalog, and each prediction
/// re-loads its model from disk, duplicates included. The reported time
/// covers the forward pass only.
#[derive(Debug, Clone)]
pub struct PredictionService {
    catalog: CatalogBuilder,
    preprocessor: Preprocessor,
    runtime: Arc<dyn ModelRuntime>,
}

impl PredictionService {
    pub fn new(
        lister: Arc<dyn DirectoryLister>,
        decoder: Arc<dyn ImageDecoder>,
        runtime: Arc<dyn ModelRuntime>,
        mode: ColorMode,
    ) -> Self {
        Self {
            catalog: CatalogBuilder::new(lister),
            preprocessor: Preprocessor::new(decoder, mode),
            runtime,
        }
    }

    /// Predict with one model. An unknown name is an error.
    pub fn predict_one(
        &self,
        name: &str,
        model_dir: &Path,
        image: &ImageSource,
    ) -> Result<Prediction, DomainError> {
        let build = self.catalog.build(model_dir)?;
        let reference = build
            .catalog
            .get(name)
            .ok_or_else(|| DomainError::not_found(format!("Model '{name}' not found")))?;

        self.run(name, reference, image)
    }

    /// Predict with each of `names` in request order against the same image.
    ///
    /// Unknown names are skipped, not failed, so the result can be shorter
    /// than the request. Every surviving name pays a full model load, even
    /// when the same name appears twice.
    pub fn predict_many(
        &self,
        names: &[String],
        model_dir: &Path,
        image: &ImageSource,
    ) -> Result<Vec<Prediction>, DomainError> {
        let build = self.catalog.build(model_dir)?;

        let mut predictions = Vec::new();
        for name in names {
            let Some(reference) = build.catalog.get(name) else {
                warn!(model = %name, "requested model not in catalog, skipping");
                continue;
            };
            predictions.push(self.run(name, reference, image)?);
        }

        Ok(predictions)
    }

    fn run(
        &self,
        name: &str,
        reference: &ArtifactReference,
        image: &ImageSource,
    ) -> Result<Prediction, DomainError> {
        let model = match self.runtime.load(reference) {
            Ok(model) => model,
            Err(error) => {
                error!(model = %name, %error, "model load failed");
                return Err(error);
            }
        };
        let tensor = self.preprocessor.prepare(image, model.input_shape())?;

        let started = Instant::now();
        let output = model.predict(&tensor)?;
        let elapsed = started.elapsed();

        let prediction = Prediction::from_output(name, &output, elapsed);
        info!(
            model = %name,
            image = %image.describe(),
            elapsed_seconds = prediction.elapsed_seconds,
            "prediction complete"
        );

        Ok(prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::MockDirectoryLister;
    use crate::domain::image::MockImageDecoder;
    use crate::domain::runtime::mock::MockModelRuntime;
    use crate::domain::runtime::InputShape;
    use crate::testkit;

    fn service_with(runtime: MockModelRuntime) -> (PredictionService, Arc<MockModelRuntime>) {
        let runtime = Arc::new(runtime);
        let service = PredictionService::new(
            Arc::new(MockDirectoryLister::new().with_entries(["A_model.h5", "B_model.h5"])),
            Arc::new(MockImageDecoder::new().with_solid_rgb(8, 8, [100, 100, 100])),
            runtime.clone(),
            ColorMode::Rgb,
        );
        (service, runtime)
    }

    fn image() -> ImageSource {
        ImageSource::from_path("static/queryImage/Glioma_1.jpg")
    }

    #[test]
    fn test_predict_one() {
        let (service, runtime) = service_with(
            MockModelRuntime::new()
                .with_shape(InputShape::new(4, 4, 3))
                .with_scores([0.25, 0.75]),
        );

        let prediction = service
            .predict_one("A_model", Path::new("m"), &image())
            .unwrap();

        assert_eq!(prediction.model, "A_model");
        assert_eq!(prediction.scores, vec![25.0, 75.0]);
        assert!(prediction.elapsed_seconds >= 0.0);
        assert_eq!(runtime.loads(), 1);
    }

    #[test]
    fn test_predict_one_unknown_model() {
        let (service, runtime) = service_with(MockModelRuntime::new());

        let err = service
            .predict_one("MISSING_model", Path::new("m"), &image())
            .unwrap_err();

        assert!(matches!(err, DomainError::NotFound { .. }));
        assert!(err.to_string().contains("MISSING_model"));
        assert_eq!(runtime.loads(), 0);
    }

    #[test]
    fn test_predict_many_skips_unknown_names() {
        let (service, runtime) = service_with(MockModelRuntime::new().with_scores([1.0]));

        let names = vec![
            "A_model".to_string(),
            "MISSING_model".to_string(),
            "B_model".to_string(),
        ];
        let predictions = service
            .predict_many(&names, Path::new("m"), &image())
            .unwrap();

        // shorter result, order preserved
        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0].model, "A_model");
        assert_eq!(predictions[1].model, "B_model");
        assert_eq!(runtime.loads(), 2);
    }

    #[test]
    fn test_predict_many_reloads_duplicates() {
        let (service, runtime) = service_with(MockModelRuntime::new());

        let names = vec!["A_model".to_string(), "A_model".to_string()];
        let predictions = service
            .predict_many(&names, Path::new("m"), &image())
            .unwrap();

        assert_eq!(predictions.len(), 2);
        assert_eq!(runtime.loads(), 2);
    }

    #[test]
    fn test_predict_many_with_no_known_names_is_empty() {
        let (service, _) = service_with(MockModelRuntime::new());

        let predictions = service
            .predict_many(&["X".to_string(), "Y".to_string()], Path::new("m"), &image())
            .unwrap();

        assert!(predictions.is_empty());
    }

    #[test]
    fn test_decode_failure_propagates() {
        let service = PredictionService::new(
            Arc::new(MockDirectoryLister::new().with_entries(["A_model.h5"])),
            Arc::new(MockImageDecoder::new().with_error("truncated jpeg")),
            Arc::new(MockModelRuntime::new()),
            ColorMode::Rgb,
        );

        let err = service
            .predict_one("A_model", Path::new("m"), &image())
            .unwrap_err();
        assert!(matches!(err, DomainError::ImageDecode { .. }));
    }

    #[test]
    fn test_load_failure_propagates() {
        let (service, _) = service_with(MockModelRuntime::new().with_error("corrupt weights"));

        let err = service
            .predict_one("A_model", Path::new("m"), &image())
            .unwrap_err();
        assert!(matches!(err, DomainError::ModelLoad { .. }));
    }

    #[test]
    fn test_catalog_failure_propagates() {
        let service = PredictionService::new(
            Arc::new(MockDirectoryLister::new().with_error("unreadable")),
            Arc::new(MockImageDecoder::new()),
            Arc::new(MockModelRuntime::new()),
            ColorMode::Rgb,
        );

        let err = service
            .predict_one("A_model", Path::new("m"), &image())
            .unwrap_err();
        assert!(matches!(err, DomainError::CatalogIo { .. }));
    }

    fn real_service() -> PredictionService {
        use crate::infrastructure::fs_lister::FsDirectoryLister;
        use crate::infrastructure::imaging::BilinearDecoder;
        use crate::infrastructure::runtime::SequentialRuntime;

        PredictionService::new(
            Arc::new(FsDirectoryLister::new()),
            Arc::new(BilinearDecoder::new()),
            Arc::new(SequentialRuntime::new()),
            ColorMode::Rgb,
        )
    }

    #[test]
    fn test_predict_from_real_artifacts() {
        let dir = testkit::tempdir();
        testkit::write_paired_model(dir.path(), "VGG19", 4, 4, 3, vec![0.25, 0.5, 0.75]);
        testkit::write_file(dir.path(), "query.png", testkit::png_bytes(16, 16, [128, 64, 32]));

        let prediction = real_service()
            .predict_one(
                "VGG19_model",
                dir.path(),
                &ImageSource::from_path(dir.path().join("query.png")),
            )
            .unwrap();

        // zero kernel: scores are the bias, as percentages
        assert_eq!(prediction.scores, vec![25.0, 50.0, 75.0]);
    }

    #[test]
    fn test_predict_from_in_memory_upload() {
        let dir = testkit::tempdir();
        testkit::write_single_model(dir.path(), "RESNET", 2, 2, 3, vec![1.0]);

        let upload = ImageSource::from_bytes("temp.jpg", testkit::png_bytes(6, 6, [0, 0, 0]));
        let prediction = real_service()
            .predict_one("RESNET_model", dir.path(), &upload)
            .unwrap();

        assert_eq!(prediction.scores, vec![100.0]);
    }

    #[test]
    fn test_models_with_different_input_sizes_share_one_image() {
        let dir = testkit::tempdir();
        testkit::write_paired_model(dir.path(), "SMALL", 2, 2, 3, vec![0.1]);
        testkit::write_paired_model(dir.path(), "LARGE", 8, 8, 3, vec![0.9]);
        testkit::write_file(dir.path(), "q.png", testkit::png_bytes(5, 5, [10, 10, 10]));

        let names = vec!["SMALL_model".to_string(), "LARGE_model".to_string()];
        let predictions = real_service()
            .predict_many(
                &names,
                dir.path(),
                &ImageSource::from_path(dir.path().join("q.png")),
            )
            .unwrap();

        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0].scores, vec![10.0]);
        assert_eq!(predictions[1].scores, vec![90.0]);
    }
}
