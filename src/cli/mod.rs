//! CLI module for the vision gateway
//!
//! Provides subcommands for running and exercising the classifier:
//! - `serve`: HTTP server (default when no subcommand is given)
//! - `scan`: one-shot catalog build
//! - `predict`: one-shot classification

pub mod predict;
pub mod scan;
pub mod serve;

use clap::{Parser, Subcommand};

/// Image classification service over filesystem model artifacts
#[derive(Parser)]
#[command(name = "pmp-vision-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,

    /// Build the model catalog once and print it
    Scan(scan::ScanArgs),

    /// Classify one image with one model
    Predict(predict::PredictArgs),
}
