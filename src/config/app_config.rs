use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::error::DomainError;
use crate::domain::preprocess::ColorMode;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub artifacts: ArtifactConfig,
    pub classifier: ClassifierConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Directories holding model artifacts, sample query images and uploads
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    pub model_dir: PathBuf,
    pub query_image_dir: PathBuf,
    pub upload_dir: PathBuf,
}

/// Class labels and image channel handling
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub labels: Vec<String>,
    pub color_mode: ColorMode,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("static/model"),
            query_image_dir: PathBuf::from("static/queryImage"),
            upload_dir: PathBuf::from("static/queryUpload"),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            labels: vec![
                "GLIOMA".to_string(),
                "MENINGIOMA".to_string(),
                "PITUITARY".to_string(),
            ],
            color_mode: ColorMode::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Rejects configurations the service cannot start with.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.server.port == 0 {
            return Err(DomainError::configuration("server.port must not be 0"));
        }

        if self.classifier.labels.is_empty() {
            return Err(DomainError::configuration(
                "classifier.labels must name at least one class",
            ));
        }

        if self.classifier.labels.iter().any(|label| label.trim().is_empty()) {
            return Err(DomainError::configuration(
                "classifier.labels must not contain blank entries",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.artifacts.model_dir, PathBuf::from("static/model"));
        assert_eq!(
            config.artifacts.query_image_dir,
            PathBuf::from("static/queryImage")
        );
        assert_eq!(
            config.artifacts.upload_dir,
            PathBuf::from("static/queryUpload")
        );
        assert_eq!(config.classifier.labels.len(), 3);
        assert_eq!(config.classifier.color_mode, ColorMode::Rgb);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_config_keeps_defaults_elsewhere() {
        let json = r#"{"classifier": {"color_mode": "grayscale"}}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.classifier.color_mode, ColorMode::Grayscale);
        assert_eq!(config.classifier.labels.len(), 3);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn log_format_parses_lowercase() {
        let json = r#"{"logging": {"format": "json"}}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn validate_rejects_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("server.port"));
    }

    #[test]
    fn validate_rejects_empty_label_list() {
        let mut config = AppConfig::default();
        config.classifier.labels.clear();

        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_label() {
        let mut config = AppConfig::default();
        config.classifier.labels.push("  ".to_string());

        assert!(config.validate().is_err());
    }
}
