use chrono::Datelike;
use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};
use tracing::info;

use content_pipeline::draft::BlogDraft;
use content_pipeline::error::PipelineError;
use content_pipeline::orchestrator::{ContentGenerator, GenerationRequest, GenerationResult};
use content_pipeline::seo::{self, SeoReport};
use content_pipeline::topics::TopicSuggester;

use crate::api::{
    AnalyzeSeoParams, GenerateParams, ResearchContentResponse, SuggestTopicsParams,
    TopicsResponse,
};
use crate::error::AppError;

#[derive(Clone)]
pub struct ContentServer {
    generator: ContentGenerator,
    topics: TopicSuggester,
    tool_router: ToolRouter<ContentServer>,
}

impl ContentServer {
    pub fn new(generator: ContentGenerator, topics: TopicSuggester) -> Self {
        Self {
            generator,
            topics,
            tool_router: Self::tool_router(),
        }
    }

    async fn run_generation(&self, params: &GenerateParams) -> Result<GenerationResult, AppError> {
        let request = GenerationRequest::bounded(params.topic.clone(), params.word_count);
        let result = self
            .generator
            .generate(&request, &params.business_context())
            .await?;

        if result.title.trim().is_empty() || result.content.trim().is_empty() {
            return Err(AppError::IncompleteContent);
        }
        Ok(result)
    }
}

#[tool_router]
impl ContentServer {
    #[tool(description = "Generate an SEO-optimized blog article for a business. Retries malformed model output, expands short articles toward word_count (300-3000, default 800) and returns the article with its SEO analysis.")]
    async fn research_content(
        &self,
        Parameters(params): Parameters<GenerateParams>,
    ) -> Result<Json<ResearchContentResponse>, String> {
        let result = self
            .run_generation(&params)
            .await
            .map_err(|e| e.to_tool_error())?;
        Ok(Json(ResearchContentResponse::from_result(&params.topic, result)))
    }

    #[tool(description = "Generate an article and shape it into a blog post draft (slug, status, meta title, description, tags) ready to be stored.")]
    async fn create_draft(
        &self,
        Parameters(params): Parameters<GenerateParams>,
    ) -> Result<Json<BlogDraft>, String> {
        let result = self
            .run_generation(&params)
            .await
            .map_err(|e| e.to_tool_error())?;
        let draft = BlogDraft::from_result(result);
        info!(slug = %draft.slug, word_count = draft.word_count, "draft created");
        Ok(Json(draft))
    }

    #[tool(description = "Score existing article markup: word count, keyword density, readability, heading structure, links, images and meta description.")]
    async fn analyze_seo(
        &self,
        Parameters(params): Parameters<AnalyzeSeoParams>,
    ) -> Result<Json<SeoReport>, String> {
        if params.content.trim().is_empty() {
            let err = AppError::from(PipelineError::InvalidInput(
                "content must not be empty".to_string(),
            ));
            return Err(err.to_tool_error());
        }
        let keywords = params.keywords.unwrap_or_default();
        let meta = params.meta_description.unwrap_or_default();
        Ok(Json(seo::analyze(&params.content, &keywords, &meta)))
    }

    #[tool(description = "Suggest five blog topics for an industry and audience. Falls back to a generic list when the backend is unavailable.")]
    async fn suggest_topics(
        &self,
        Parameters(params): Parameters<SuggestTopicsParams>,
    ) -> Result<Json<TopicsResponse>, String> {
        let year = chrono::Utc::now().year();
        let topics = self
            .topics
            .suggest(&params.industry, &params.target_audience, year)
            .await;
        Ok(Json(TopicsResponse { topics }))
    }
}

#[tool_handler]
impl ServerHandler for ContentServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "content-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "SEO blog content MCP server. Use suggest_topics to find ideas, research_content \
to generate a scored article, create_draft to get a storable blog post, and analyze_seo to score \
markup you already have. Errors are prefixed with a code: VALIDATION_ERROR, \
AI_SERVICE_UNAVAILABLE, INCOMPLETE_CONTENT or INTERNAL_ERROR."
                    .to_string(),
            ),
        }
    }
}
