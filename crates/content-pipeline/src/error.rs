/// Error types for the content pipeline.
///
/// `GenerationError` is what a generation backend adapter reports for a single call.
/// `PipelineError` is the only error that crosses the orchestrator boundary; every
/// retry and expansion failure is contained below it.

#[derive(Debug, Clone, thiserror::Error)]
pub enum GenerationError {
    /// Quota exhausted, missing or rejected credentials.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("backend request failed: {0}")]
    Request(String),

    #[error("backend returned no completion text")]
    EmptyCompletion,
}

impl GenerationError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, GenerationError::Unavailable(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("content generation failed: {0}")]
    InvalidInput(String),

    #[error("content generation failed: {0}")]
    BackendUnavailable(#[source] GenerationError),

    #[error("content generation failed: {0}")]
    Generation(#[source] GenerationError),

    #[error(
        "content generation failed: failed to generate properly structured content after {attempts} attempts"
    )]
    MalformedOutput { attempts: u32 },

    #[error("content generation failed: all generation attempts failed")]
    Exhausted,
}

impl PipelineError {
    pub fn is_input_error(&self) -> bool {
        matches!(self, PipelineError::InvalidInput(_))
    }

    pub fn is_backend_unavailable(&self) -> bool {
        matches!(self, PipelineError::BackendUnavailable(_))
    }
}

impl From<GenerationError> for PipelineError {
    fn from(err: GenerationError) -> Self {
        if err.is_unavailable() {
            PipelineError::BackendUnavailable(err)
        } else {
            PipelineError::Generation(err)
        }
    }
}
