//! Seam between the pipeline and the text-generation backend.

use async_trait::async_trait;

use crate::error::GenerationError;

/// Model selection and sampling parameters for one completion.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParams {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// A single prompt sent to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System instruction, when the call uses one.
    pub system: Option<String>,
    pub prompt: String,
    pub params: ModelParams,
}

/// A text-generation backend: prompt in, raw completion text out.
///
/// Implementations must be safe to call repeatedly with the same request; the
/// pipeline retries freely and never assumes a call has side effects.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, GenerationError>;

    /// Tag recorded on generated results to identify the backend.
    fn source(&self) -> &str {
        "openai"
    }
}
