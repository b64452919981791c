use crate::retry::RetryPolicy;

/// Model settings and retry policy for a pipeline instance.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Model identifier passed to the backend, e.g. "deepseek-chat".
    pub model: String,
    pub generation_temperature: f32,
    pub expansion_temperature: f32,
    /// Temperature for the "add new sections" fallback expansion prompt.
    pub expansion_alt_temperature: f32,
    pub retry: RetryPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model: "deepseek-chat".to_string(),
            generation_temperature: 0.7,
            expansion_temperature: 0.6,
            expansion_alt_temperature: 0.7,
            retry: RetryPolicy::default(),
        }
    }
}

impl PipelineConfig {
    /// Load model settings from environment variables, falling back to defaults.
    ///
    /// Optional:
    /// - `GENERATION_MODEL`
    /// - `GENERATION_TEMPERATURE`
    /// - `EXPANSION_TEMPERATURE`
    /// - `EXPANSION_ALT_TEMPERATURE`
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let model = std::env::var("GENERATION_MODEL")
            .ok()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or(defaults.model);

        Self {
            model,
            generation_temperature: env_f32("GENERATION_TEMPERATURE")
                .unwrap_or(defaults.generation_temperature),
            expansion_temperature: env_f32("EXPANSION_TEMPERATURE")
                .unwrap_or(defaults.expansion_temperature),
            expansion_alt_temperature: env_f32("EXPANSION_ALT_TEMPERATURE")
                .unwrap_or(defaults.expansion_alt_temperature),
            retry: defaults.retry,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

fn env_f32(key: &str) -> Option<f32> {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse::<f32>().ok())
        .filter(|t| t.is_finite() && *t >= 0.0)
}
