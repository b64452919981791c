//! Blog topic suggestions for a business.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::generation::{CompletionRequest, GenerationClient, ModelParams};
use crate::prompts;

const TOPIC_COUNT: usize = 5;
const MAX_TOPIC_CHARS: usize = 100;
const TOPICS_MAX_TOKENS: u32 = 500;

static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-*\d.]+\s*").expect("valid regex"));

#[derive(Clone)]
pub struct TopicSuggester {
    client: Arc<dyn GenerationClient>,
    config: PipelineConfig,
}

impl TopicSuggester {
    pub fn new(client: Arc<dyn GenerationClient>, config: PipelineConfig) -> Self {
        Self { client, config }
    }

    /// Up to five topics for `industry` and `audience`.
    ///
    /// Backend failures and unusable responses fall back to a fixed list, so this
    /// always returns something to show.
    pub async fn suggest(&self, industry: &str, audience: &str, year: i32) -> Vec<String> {
        let industry = industry.trim();
        let audience = audience.trim();

        let request = CompletionRequest {
            system: Some(prompts::TOPICS_SYSTEM_PROMPT.to_string()),
            prompt: prompts::topics_prompt(industry, audience, year),
            params: ModelParams {
                model: self.config.model.clone(),
                temperature: self.config.generation_temperature,
                max_tokens: TOPICS_MAX_TOKENS,
            },
        };

        match self.client.complete(request).await {
            Ok(raw) => {
                let topics = parse_topics(&raw);
                if topics.is_empty() {
                    warn!("topic response had no usable lines, using fallback topics");
                    return fallback_topics(industry, audience, year);
                }
                info!(count = topics.len(), "generated topic suggestions");
                topics
            }
            Err(e) => {
                warn!(error = %e, "topic generation failed, using fallback topics");
                fallback_topics(industry, audience, year)
            }
        }
    }
}

/// Read a JSON array of strings, or failing that one topic per line.
pub fn parse_topics(raw: &str) -> Vec<String> {
    let topics: Vec<String> = match serde_json::from_str::<Vec<String>>(raw.trim()) {
        Ok(list) => list
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        Err(_) => raw
            .lines()
            .map(|line| LIST_MARKER.replace(line.trim(), "").trim().to_string())
            .map(|line| strip_json_punctuation(&line))
            .filter(|line| !line.is_empty() && line.chars().count() < MAX_TOPIC_CHARS)
            .collect(),
    };
    topics.into_iter().take(TOPIC_COUNT).collect()
}

// Half-formed JSON arrays leave brackets, quotes and trailing commas on each line.
fn strip_json_punctuation(line: &str) -> String {
    line.trim_matches(|c: char| matches!(c, '[' | ']' | ','))
        .trim()
        .trim_matches('"')
        .trim()
        .to_string()
}

pub fn fallback_topics(industry: &str, audience: &str, year: i32) -> Vec<String> {
    vec![
        format!("Latest {industry} Trends for {year}"),
        format!("How to Optimize Your {industry} Strategy"),
        format!("Top 5 {industry} Innovations to Watch"),
        format!("Building a Successful {industry} Business"),
        format!("Essential {industry} Tips for {audience}"),
    ]
}
