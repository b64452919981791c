use content_pipeline::config::PipelineConfig;
use content_pipeline::openai::OpenAiClientConfig;

use crate::error::AppError;

/// Server configuration loaded explicitly from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai: OpenAiClientConfig,
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `OPENAI_API_KEY`: credential for the generation backend
    ///
    /// Optional: see `OpenAiClientConfig::from_env` and `PipelineConfig::from_env`.
    pub fn from_env() -> Result<Self, AppError> {
        let openai = OpenAiClientConfig::from_env();
        if openai.api_key.is_none() {
            return Err(AppError::Config(
                "OPENAI_API_KEY environment variable not found".to_string(),
            ));
        }

        Ok(Self {
            openai,
            pipeline: PipelineConfig::from_env(),
        })
    }
}
