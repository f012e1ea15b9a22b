//! CLI configuration

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

/// Settings resolved from the environment; explicit CLI flags take
/// precedence over these.
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Path to the pretrained ONNX model artifact
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Path the prediction CSV is written to
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
}

fn default_model_path() -> PathBuf {
    PathBuf::from("model.onnx")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("output.csv")
}

impl CliConfig {
    /// Load configuration from OCP_-prefixed environment variables.
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("OCP"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_else(|_| CliConfig {
            model_path: default_model_path(),
            output_path: default_output_path(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::load().unwrap();
        assert_eq!(config.model_path, PathBuf::from("model.onnx"));
        assert_eq!(config.output_path, PathBuf::from("output.csv"));
    }
}
