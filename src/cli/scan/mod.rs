//! Scan command - one-shot catalog build

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, ValueEnum};

use crate::config::AppConfig;
use crate::domain::CatalogBuild;
use crate::infrastructure::fs_lister::FsDirectoryLister;
use crate::infrastructure::services::CatalogService;

/// Arguments for the scan command
#[derive(Args, Clone)]
pub struct ScanArgs {
    /// Model directory to scan (overrides config)
    #[arg(long)]
    pub model_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Build the catalog once and print it
pub fn run(args: ScanArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    let model_dir = args.model_dir.unwrap_or(config.artifacts.model_dir);

    let service = CatalogService::new(Arc::new(FsDirectoryLister));
    let build = service.scan(&model_dir)?;

    match args.format {
        OutputFormat::Json => print_json(&build)?,
        OutputFormat::Table => print_table(&build),
    }

    Ok(())
}

fn print_json(build: &CatalogBuild) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(build)?);
    Ok(())
}

fn print_table(build: &CatalogBuild) {
    if build.catalog.is_empty() {
        println!("no models found");
    }

    for entry in build.catalog.iter() {
        let kind = if entry.reference.is_paired() {
            "paired"
        } else {
            "single"
        };
        let sources: Vec<String> = entry
            .reference
            .source_paths()
            .iter()
            .map(|path| path.display().to_string())
            .collect();

        println!("{:<24} {:<8} {}", entry.name, kind, sources.join(" + "));
    }

    for warning in &build.warnings {
        println!("warning: {warning}");
    }
}
