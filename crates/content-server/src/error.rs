use content_pipeline::error::PipelineError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("config error: {0}")]
    Config(String),

    #[error("generated content is missing required fields")]
    IncompleteContent,
}

impl AppError {
    /// Stable code callers can branch on.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Pipeline(e) if e.is_input_error() => "VALIDATION_ERROR",
            AppError::Pipeline(e) if e.is_backend_unavailable() => "AI_SERVICE_UNAVAILABLE",
            AppError::IncompleteContent => "INCOMPLETE_CONTENT",
            AppError::Pipeline(_) | AppError::Config(_) => "INTERNAL_ERROR",
        }
    }

    /// Tool error text: `CODE: message`.
    pub fn to_tool_error(&self) -> String {
        format!("{}: {}", self.code(), self)
    }
}
