//! Predict command - one-shot classification

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;

use crate::config::AppConfig;
use crate::domain::ImageSource;
use crate::infrastructure::fs_lister::FsDirectoryLister;
use crate::infrastructure::imaging::BilinearDecoder;
use crate::infrastructure::runtime::SequentialRuntime;
use crate::infrastructure::services::PredictionService;

/// Arguments for the predict command
#[derive(Args, Clone)]
pub struct PredictArgs {
    /// Catalog name of the model to run
    #[arg(long)]
    pub model: String,

    /// Path of the image to classify
    #[arg(long)]
    pub image: PathBuf,

    /// Model directory (overrides config)
    #[arg(long)]
    pub model_dir: Option<PathBuf>,
}

/// Classify one image and print labeled percentages
pub fn run(args: PredictArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    config.validate()?;
    let model_dir = args.model_dir.unwrap_or(config.artifacts.model_dir);

    let service = PredictionService::new(
        Arc::new(FsDirectoryLister),
        Arc::new(BilinearDecoder),
        Arc::new(SequentialRuntime::new()),
        config.classifier.color_mode,
    );

    let image = ImageSource::from_path(&args.image);
    let prediction = service.predict_one(&args.model, &model_dir, &image)?;

    for (label, score) in config
        .classifier
        .labels
        .iter()
        .zip(prediction.scores.iter())
    {
        println!("{label}: {score}%");
    }
    println!("elapsed: {}s", prediction.elapsed_seconds);

    Ok(())
}
