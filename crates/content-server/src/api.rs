use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use content_pipeline::orchestrator::{BusinessContext, GenerationResult, PrimaryKeywords};
use content_pipeline::seo::SeoReport;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GenerateParams {
    /// Article topic, e.g. "Cloud Migration".
    pub topic: String,
    /// Target length in words (clamped to 300-3000, default 800).
    pub word_count: Option<u32>,
    /// Business industry, e.g. "Information Technology (IT) & Software".
    pub industry: String,
    /// Who the article is written for, e.g. "IT managers".
    pub target_audience: String,
    /// Keywords to work in: a list, or one comma-separated string.
    pub primary_keywords: Option<PrimaryKeywords>,
}

impl GenerateParams {
    pub fn business_context(&self) -> BusinessContext {
        BusinessContext {
            industry: self.industry.clone(),
            target_audience: self.target_audience.clone(),
            primary_keywords: self.primary_keywords.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AnalyzeSeoParams {
    /// Article markup to score.
    pub content: String,
    pub keywords: Option<Vec<String>>,
    pub meta_description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SuggestTopicsParams {
    pub industry: String,
    pub target_audience: String,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub title: String,
    pub meta: String,
    pub keywords: Vec<String>,
    /// Article body markup.
    pub outline: String,
    pub word_count: usize,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResearchContentResponse {
    pub suggestion: Suggestion,
    pub source: String,
    pub word_count: usize,
    pub seo_analysis: SeoReport,
}

impl ResearchContentResponse {
    /// Fills an empty meta or keyword list from the topic and industry.
    pub fn from_result(topic: &str, result: GenerationResult) -> Self {
        let meta = if result.meta.trim().is_empty() {
            format!("Guide about {} for {} businesses", topic.trim(), result.industry)
        } else {
            result.meta
        };
        let keywords = if result.keywords.is_empty() {
            vec![topic.trim().to_lowercase(), result.industry.to_lowercase()]
        } else {
            result.keywords
        };

        Self {
            suggestion: Suggestion {
                title: result.title,
                meta,
                keywords,
                outline: result.content,
                word_count: result.word_count,
            },
            source: result.source,
            word_count: result.word_count,
            seo_analysis: result.seo_analysis,
        }
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct TopicsResponse {
    pub topics: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use content_pipeline::seo;

    fn result(meta: &str, keywords: Vec<String>) -> GenerationResult {
        GenerationResult {
            title: "Title".to_string(),
            meta: meta.to_string(),
            keywords,
            content: "<p>Body.</p>".to_string(),
            word_count: 1,
            industry: "Banking & Finance".to_string(),
            target_audience: "CFOs".to_string(),
            source: "openai".to_string(),
            seo_analysis: seo::analyze("<p>Body.</p>", &[], meta),
        }
    }

    #[test]
    fn research_response_fills_missing_meta_and_keywords() {
        let resp = ResearchContentResponse::from_result(" Open Banking ", result("", vec![]));
        assert_eq!(
            resp.suggestion.meta,
            "Guide about Open Banking for Banking & Finance businesses"
        );
        assert_eq!(
            resp.suggestion.keywords,
            vec!["open banking".to_string(), "banking & finance".to_string()]
        );
        assert_eq!(resp.suggestion.outline, "<p>Body.</p>");
    }

    #[test]
    fn research_response_keeps_generated_fields() {
        let resp = ResearchContentResponse::from_result(
            "Open Banking",
            result("A meta.", vec!["apis".to_string()]),
        );
        assert_eq!(resp.suggestion.meta, "A meta.");
        assert_eq!(resp.suggestion.keywords, vec!["apis".to_string()]);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["suggestion"]["wordCount"], 1);
        assert!(json["seoAnalysis"]["readability"].get("score").is_some());
    }

    #[test]
    fn generate_params_accept_keyword_string_or_list() {
        let params: GenerateParams = serde_json::from_str(
            r#"{"topic":"t","industry":"i","target_audience":"a","primary_keywords":"x, y"}"#,
        )
        .unwrap();
        assert_eq!(params.business_context().primary_keywords.normalize(), vec!["x", "y"]);

        let params: GenerateParams =
            serde_json::from_str(r#"{"topic":"t","industry":"i","target_audience":"a"}"#).unwrap();
        assert!(params.business_context().primary_keywords.normalize().is_empty());
        assert!(params.word_count.is_none());
    }
}
