//! End-to-end article generation: prompt, generate with retry, validate, expand, score.

use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::expander::{percent_of, reached, ContentExpander};
use crate::generation::{CompletionRequest, GenerationClient, ModelParams};
use crate::prompts;
use crate::response::{self, ParsedContent};
use crate::retry::{Sleeper, TokioSleeper};
use crate::seo::{self, SeoReport};

pub const MIN_TARGET_WORDS: u32 = 300;
pub const MAX_TARGET_WORDS: u32 = 3_000;
pub const DEFAULT_TARGET_WORDS: u32 = 800;
const MAX_GENERATION_TOKENS: u32 = 4_000;

/// Keyword profile as stored on a business: a list or one comma-separated string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum PrimaryKeywords {
    List(Vec<String>),
    Csv(String),
}

impl Default for PrimaryKeywords {
    fn default() -> Self {
        PrimaryKeywords::List(Vec::new())
    }
}

impl PrimaryKeywords {
    /// Trimmed, non-empty, de-duplicated keywords in first-seen order.
    pub fn normalize(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            PrimaryKeywords::List(items) => items.iter().map(String::as_str).collect(),
            PrimaryKeywords::Csv(s) => s.split(',').collect(),
        };
        let mut out: Vec<String> = Vec::new();
        for k in raw.into_iter().map(str::trim).filter(|k| !k.is_empty()) {
            if !out.iter().any(|seen| seen == k) {
                out.push(k.to_string());
            }
        }
        out
    }
}

/// Who the article is written for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BusinessContext {
    pub industry: String,
    pub target_audience: String,
    #[serde(default)]
    pub primary_keywords: PrimaryKeywords,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub topic: String,
    pub target_word_count: u32,
}

impl GenerationRequest {
    pub fn new(topic: impl Into<String>, target_word_count: u32) -> Self {
        Self {
            topic: topic.into(),
            target_word_count,
        }
    }

    /// Clamp a caller-supplied length to [300, 3000], defaulting to 800.
    pub fn bounded(topic: impl Into<String>, requested: Option<u32>) -> Self {
        let target = requested
            .unwrap_or(DEFAULT_TARGET_WORDS)
            .clamp(MIN_TARGET_WORDS, MAX_TARGET_WORDS);
        Self::new(topic, target)
    }
}

/// A finished, scored article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub title: String,
    pub meta: String,
    pub keywords: Vec<String>,
    pub content: String,
    pub word_count: usize,
    pub industry: String,
    pub target_audience: String,
    /// Backend that produced the article.
    pub source: String,
    pub seo_analysis: SeoReport,
}

/// Drives one generation request through the whole pipeline.
///
/// Holds no per-request state, so one instance can serve concurrent requests.
#[derive(Clone)]
pub struct ContentGenerator {
    client: Arc<dyn GenerationClient>,
    sleeper: Arc<dyn Sleeper>,
    expander: ContentExpander,
    config: PipelineConfig,
}

impl ContentGenerator {
    pub fn new(client: Arc<dyn GenerationClient>, config: PipelineConfig) -> Self {
        Self::with_sleeper(client, Arc::new(TokioSleeper), config)
    }

    pub fn with_sleeper(
        client: Arc<dyn GenerationClient>,
        sleeper: Arc<dyn Sleeper>,
        config: PipelineConfig,
    ) -> Self {
        let expander = ContentExpander::new(client.clone(), sleeper.clone(), config.clone());
        Self {
            client,
            sleeper,
            expander,
            config,
        }
    }

    /// Generate, validate, expand and score an article.
    ///
    /// Fails fast on bad input before any backend call. On any error no partial
    /// result is produced.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        context: &BusinessContext,
    ) -> Result<GenerationResult, PipelineError> {
        self.run(request, context).await.inspect_err(|e| {
            error!(error = %e, "content generation failed");
        })
    }

    async fn run(
        &self,
        request: &GenerationRequest,
        context: &BusinessContext,
    ) -> Result<GenerationResult, PipelineError> {
        let topic = request.topic.trim();
        if topic.is_empty() {
            return Err(PipelineError::InvalidInput(
                "Invalid topic: Must be a non-empty string".to_string(),
            ));
        }
        let industry = context.industry.trim();
        if industry.is_empty() {
            return Err(PipelineError::InvalidInput(
                "businessContext.industry is required".to_string(),
            ));
        }
        let audience = context.target_audience.trim();
        if audience.is_empty() {
            return Err(PipelineError::InvalidInput(
                "businessContext.targetAudience is required".to_string(),
            ));
        }
        let keywords = context.primary_keywords.normalize();
        let target = request.target_word_count;

        let completion = CompletionRequest {
            system: Some(prompts::ARTICLE_SYSTEM_PROMPT.to_string()),
            prompt: prompts::article_prompt(topic, industry, audience, target, &keywords),
            params: ModelParams {
                model: self.config.model.clone(),
                temperature: self.config.generation_temperature,
                max_tokens: target
                    .saturating_mul(6)
                    .clamp(1, MAX_GENERATION_TOKENS),
            },
        };

        let mut parsed = self.generate_with_retry(&completion, target).await?;
        info!(
            word_count = parsed.word_count,
            target,
            percent = percent_of(parsed.word_count, target),
            "initial content generated"
        );

        if !reached(parsed.word_count, target, 0.9) {
            parsed = self.expander.expand(&parsed, target).await;

            if !reached(parsed.word_count, target, 0.75) {
                let adjusted = (target as u64 * 6).div_ceil(5).min(u32::MAX as u64) as u32;
                info!(
                    word_count = parsed.word_count,
                    adjusted_target = adjusted,
                    "first expansion insufficient, trying second expansion"
                );
                parsed = self.expander.expand(&parsed, adjusted).await;
            }
        }

        let seo_analysis = seo::analyze(&parsed.content, &parsed.keywords, &parsed.meta);

        info!(
            word_count = parsed.word_count,
            target,
            percent = percent_of(parsed.word_count, target),
            title_chars = parsed.title.chars().count(),
            meta_chars = parsed.meta.chars().count(),
            keywords = parsed.keywords.len(),
            readability = seo_analysis.readability.score,
            "final content metrics"
        );

        let ParsedContent {
            title,
            meta,
            keywords,
            content,
            word_count,
        } = parsed;

        Ok(GenerationResult {
            title,
            meta,
            keywords,
            content,
            word_count,
            industry: industry.to_string(),
            target_audience: audience.to_string(),
            source: self.client.source().to_string(),
            seo_analysis,
        })
    }

    async fn generate_with_retry(
        &self,
        completion: &CompletionRequest,
        target: u32,
    ) -> Result<ParsedContent, PipelineError> {
        let policy = &self.config.retry;
        let max_attempts = policy.max_attempts;

        for attempt in 1..=max_attempts {
            info!(attempt, max_attempts, "content generation attempt");

            let raw = match self.client.complete(completion.clone()).await {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(attempt, error = %e, "content generation call failed");
                    if attempt == max_attempts {
                        return Err(e.into());
                    }
                    self.sleeper.sleep(policy.error_backoff(attempt)).await;
                    continue;
                }
            };

            if !response::validate(&raw) {
                warn!(attempt, "invalid response structure, missing required sections");
                if attempt == max_attempts {
                    return Err(PipelineError::MalformedOutput {
                        attempts: max_attempts,
                    });
                }
                self.sleeper.sleep(policy.invalid_response_delay).await;
                continue;
            }

            let parsed = response::parse(&raw);
            if !reached(parsed.word_count, target, 0.25) {
                warn!(
                    attempt,
                    word_count = parsed.word_count,
                    target,
                    "word count too low"
                );
                if attempt == max_attempts {
                    return Ok(parsed);
                }
                self.sleeper.sleep(policy.invalid_response_delay).await;
                continue;
            }

            return Ok(parsed);
        }

        Err(PipelineError::Exhausted)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::error::GenerationError;
    use crate::retry::RetryPolicy;
    use crate::seo::WordCountStatus;
    use crate::testing::{article_body, tagged_article, RecordingSleeper, ScriptedClient};

    fn generator(client: Arc<ScriptedClient>, sleeper: Arc<RecordingSleeper>) -> ContentGenerator {
        ContentGenerator::with_sleeper(client, sleeper, PipelineConfig::default())
    }

    fn it_context() -> BusinessContext {
        BusinessContext {
            industry: "Information Technology (IT) & Software".to_string(),
            target_audience: "IT managers".to_string(),
            primary_keywords: PrimaryKeywords::Csv("cloud, migration, ,devops".to_string()),
        }
    }

    fn cloud_request() -> GenerationRequest {
        GenerationRequest::new("Cloud Migration", 800)
    }

    #[test]
    fn test_keyword_normalization() {
        let csv = PrimaryKeywords::Csv(" cloud , ,devops,cloud ".to_string());
        assert_eq!(csv.normalize(), vec!["cloud".to_string(), "devops".to_string()]);

        let list = PrimaryKeywords::List(vec![" a ".to_string(), String::new(), "b".to_string()]);
        assert_eq!(list.normalize(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_business_context_accepts_both_keyword_shapes() {
        let csv: BusinessContext = serde_json::from_str(
            r#"{"industry":"Retail","targetAudience":"shoppers","primaryKeywords":"a, b"}"#,
        )
        .unwrap();
        assert_eq!(csv.primary_keywords.normalize(), vec!["a", "b"]);

        let list: BusinessContext = serde_json::from_str(
            r#"{"industry":"Retail","targetAudience":"shoppers","primaryKeywords":["a","b"]}"#,
        )
        .unwrap();
        assert_eq!(list.primary_keywords.normalize(), vec!["a", "b"]);

        let missing: BusinessContext =
            serde_json::from_str(r#"{"industry":"Retail","targetAudience":"shoppers"}"#).unwrap();
        assert!(missing.primary_keywords.normalize().is_empty());
    }

    #[test]
    fn test_bounded_request() {
        assert_eq!(GenerationRequest::bounded("t", None).target_word_count, 800);
        assert_eq!(GenerationRequest::bounded("t", Some(10)).target_word_count, 300);
        assert_eq!(GenerationRequest::bounded("t", Some(9_000)).target_word_count, 3_000);
        assert_eq!(GenerationRequest::bounded("t", Some(1_200)).target_word_count, 1_200);
    }

    #[tokio::test]
    async fn rejects_bad_input_without_calling_backend() {
        let client = Arc::new(ScriptedClient::new().repeating(Ok(tagged_article(800))));
        let gen = generator(client.clone(), Arc::new(RecordingSleeper::new()));

        let err = gen
            .generate(&GenerationRequest::new("   ", 800), &it_context())
            .await
            .unwrap_err();
        assert!(err.is_input_error());
        assert!(err.to_string().contains("Invalid topic"));

        let mut ctx = it_context();
        ctx.industry = " ".to_string();
        let err = gen.generate(&cloud_request(), &ctx).await.unwrap_err();
        assert!(err.to_string().contains("businessContext.industry is required"));

        let mut ctx = it_context();
        ctx.target_audience = String::new();
        let err = gen.generate(&cloud_request(), &ctx).await.unwrap_err();
        assert!(err.to_string().contains("businessContext.targetAudience is required"));

        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn end_to_end_cloud_migration() {
        let client = Arc::new(ScriptedClient::new().then_text(tagged_article(760)));
        let sleeper = Arc::new(RecordingSleeper::new());
        let gen = generator(client.clone(), sleeper.clone());

        let result = gen.generate(&cloud_request(), &it_context()).await.unwrap();

        assert!((400..=1200).contains(&result.word_count));
        assert!(!result.keywords.is_empty());
        assert_eq!(result.seo_analysis.word_count.status, WordCountStatus::Good);
        assert_eq!(result.industry, "Information Technology (IT) & Software");
        assert_eq!(result.target_audience, "IT managers");
        assert_eq!(result.source, "scripted");
        assert_eq!(result.word_count, crate::metrics::count_words(&result.content));
        assert!(sleeper.delays().is_empty());

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        let call = &calls[0];
        assert_eq!(call.system.as_deref(), Some(prompts::ARTICLE_SYSTEM_PROMPT));
        assert!(call.prompt.contains("\"Cloud Migration\""));
        assert!(call.prompt.contains("AT LEAST 400 words"));
        assert!(call.prompt.contains("cloud, migration, devops"));
        assert_eq!(call.params.max_tokens, 4_000);
        assert_eq!(call.params.model, "deepseek-chat");
    }

    #[tokio::test]
    async fn short_initial_content_is_expanded() {
        let client = Arc::new(
            ScriptedClient::new()
                .then_text(tagged_article(500))
                .then_text(article_body(780)),
        );
        let gen = generator(client.clone(), Arc::new(RecordingSleeper::new()));

        let result = gen.generate(&cloud_request(), &it_context()).await.unwrap();

        assert_eq!(result.word_count, 780);
        assert_eq!(result.title, "Cloud Migration for IT Managers");
        assert_eq!(client.call_count(), 2);
    }

    #[tokio::test]
    async fn second_expansion_uses_escalated_target() {
        // Initial 300, first expansion creeps up to 560 (< 75% of 800), second reaches 900.
        let client = Arc::new(
            ScriptedClient::new()
                .then_text(tagged_article(300))
                .then_text(article_body(400))
                .then_text(article_body(480))
                .then_text(article_body(560))
                .then_text(article_body(900)),
        );
        let gen = generator(client.clone(), Arc::new(RecordingSleeper::new()));

        let result = gen.generate(&cloud_request(), &it_context()).await.unwrap();

        assert_eq!(result.word_count, 900);
        let calls = client.calls();
        assert_eq!(calls.len(), 5);
        assert!(calls[4].prompt.contains("TARGET WORD COUNT: 960"));
    }

    #[tokio::test]
    async fn malformed_output_fails_after_exactly_three_attempts() {
        let client = Arc::new(
            ScriptedClient::new()
                .repeating(Ok("TITLE: A\nMETA: B\nKEYWORDS: a, b\nBODY: text".to_string())),
        );
        let sleeper = Arc::new(RecordingSleeper::new());
        let gen = generator(client.clone(), sleeper.clone());

        let err = gen.generate(&cloud_request(), &it_context()).await.unwrap_err();

        assert!(matches!(err, PipelineError::MalformedOutput { attempts: 3 }));
        assert_eq!(client.call_count(), 3);
        assert_eq!(
            sleeper.delays(),
            vec![Duration::from_millis(2_000), Duration::from_millis(2_000)]
        );
    }

    #[tokio::test]
    async fn recovers_from_malformed_output() {
        let client = Arc::new(
            ScriptedClient::new()
                .then_text("TITLE: only a title")
                .then_text(tagged_article(800)),
        );
        let gen = generator(client.clone(), Arc::new(RecordingSleeper::new()));

        let result = gen.generate(&cloud_request(), &it_context()).await.unwrap();

        assert_eq!(result.word_count, 800);
        assert_eq!(client.call_count(), 2);
    }

    #[tokio::test]
    async fn backend_errors_back_off_linearly_then_propagate() {
        let client = Arc::new(
            ScriptedClient::new().repeating(Err(GenerationError::Request("reset".to_string()))),
        );
        let sleeper = Arc::new(RecordingSleeper::new());
        let gen = generator(client.clone(), sleeper.clone());

        let err = gen.generate(&cloud_request(), &it_context()).await.unwrap_err();

        assert!(matches!(err, PipelineError::Generation(_)));
        assert!(!err.is_backend_unavailable());
        assert_eq!(client.call_count(), 3);
        assert_eq!(
            sleeper.delays(),
            vec![Duration::from_millis(2_000), Duration::from_millis(4_000)]
        );
    }

    #[tokio::test]
    async fn unavailable_backend_is_distinguishable() {
        let client = Arc::new(ScriptedClient::new().repeating(Err(GenerationError::Unavailable(
            "insufficient_quota".to_string(),
        ))));
        let gen = generator(client, Arc::new(RecordingSleeper::new()));

        let err = gen.generate(&cloud_request(), &it_context()).await.unwrap_err();

        assert!(err.is_backend_unavailable());
    }

    #[tokio::test]
    async fn too_short_output_is_retried_then_accepted_on_last_attempt() {
        // 150 words is below 25% of 800; expansion then fails to add anything.
        let client = Arc::new(
            ScriptedClient::new()
                .then_text(tagged_article(150))
                .then_text(tagged_article(150))
                .then_text(tagged_article(150))
                .repeating(Err(GenerationError::Request("down".to_string()))),
        );
        let sleeper = Arc::new(RecordingSleeper::new());
        let config = PipelineConfig::default().with_retry(RetryPolicy::immediate());
        let gen = ContentGenerator::with_sleeper(client.clone(), sleeper, config);

        let result = gen.generate(&cloud_request(), &it_context()).await.unwrap();

        assert_eq!(result.word_count, 150);
        assert_eq!(result.seo_analysis.word_count.status, WordCountStatus::Poor);
        // 3 generation calls, then two expansion passes of 3 failed attempts each.
        assert_eq!(client.call_count(), 9);
    }

    #[tokio::test]
    async fn concurrent_runs_share_nothing() {
        let client = Arc::new(ScriptedClient::new().repeating(Ok(tagged_article(800))));
        let gen = generator(client.clone(), Arc::new(RecordingSleeper::new()));
        let ctx = it_context();

        let a = GenerationRequest::new("Cloud Migration", 800);
        let b = GenerationRequest::new("Zero Trust Networking", 800);
        let (ra, rb) = tokio::join!(gen.generate(&a, &ctx), gen.generate(&b, &ctx));

        assert_eq!(ra.unwrap().word_count, 800);
        assert_eq!(rb.unwrap().word_count, 800);
        assert_eq!(client.call_count(), 2);
    }
}
