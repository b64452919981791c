//! Blog post drafts built from generated articles.

use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::orchestrator::GenerationResult;
use crate::seo::SeoReport;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static NON_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\-]+").expect("valid regex"));
static DASH_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
}

/// Persistence shape for a new blog post; storage assigns the identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogDraft {
    pub slug: String,
    pub status: PostStatus,
    pub title: String,
    pub meta_title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub tags: Vec<String>,
    pub content: String,
    pub word_count: usize,
    pub industry: String,
    pub target_audience: String,
    pub source: String,
    pub seo_analysis: SeoReport,
}

impl BlogDraft {
    pub fn from_result(result: GenerationResult) -> Self {
        Self {
            slug: slugify(&result.title),
            status: PostStatus::Draft,
            meta_title: result.title.clone(),
            title: result.title,
            description: result.meta,
            tags: result.keywords.clone(),
            keywords: result.keywords,
            content: result.content,
            word_count: result.word_count,
            industry: result.industry,
            target_audience: result.target_audience,
            source: result.source,
            seo_analysis: result.seo_analysis,
        }
    }
}

/// URL slug: lowercase, dash-separated, ASCII word characters only.
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let dashed = WHITESPACE.replace_all(&lowered, "-");
    let cleaned = NON_SLUG.replace_all(&dashed, "");
    let collapsed = DASH_RUN.replace_all(&cleaned, "-");
    collapsed.trim_matches('-').to_string()
}
