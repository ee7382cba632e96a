use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};
use crate::domain::{LlmConfig, PipelineConfig};

const DEFAULT_CONFIG_FILE: &str = "seogen.toml";
const ENV_PREFIX: &str = "SEOGEN_";

/// Full process configuration: pipeline contracts plus generation
/// service settings. Loaded once at startup and immutable afterwards.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[serde(default)]
    pub llm: LlmConfig,
}

/// Layer defaults, an optional TOML file and `SEOGEN_`-prefixed
/// environment variables (nested keys split on `__`)
pub fn load(config_file: Option<&Path>) -> Result<AppConfig> {
    let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

    figment = match config_file {
        Some(path) => figment.merge(Toml::file(path)),
        None => figment.merge(Toml::file(DEFAULT_CONFIG_FILE)),
    };

    let config: AppConfig = figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| AppError::ValidationError(format!("Invalid configuration: {}", e)))?;

    config
        .pipeline
        .validate()
        .map_err(AppError::ValidationError)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_load_without_file() {
        let config = load(Some(Path::new("/nonexistent/seogen.toml"))).unwrap();
        assert_eq!(config.pipeline.min_desc_len, 120);
        assert_eq!(config.llm.model, "qwen2.5:3b-instruct");
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            "[llm]\nmodel = \"llama3:8b\"\n\n[pipeline]\nprogress_interval = 25\n"
        )
        .unwrap();

        let config = load(Some(file.path())).unwrap();
        assert_eq!(config.llm.model, "llama3:8b");
        assert_eq!(config.pipeline.progress_interval, 25);
        // Untouched keys keep their defaults
        assert_eq!(config.pipeline.max_desc_len, 150);
    }

    #[test]
    fn test_invalid_window_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "[pipeline]\nmin_desc_len = 300\n").unwrap();
        assert!(load(Some(file.path())).is_err());
    }
}
