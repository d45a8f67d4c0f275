//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, ArtifactConfig, ClassifierConfig, LogFormat, LoggingConfig, ServerConfig,
};
