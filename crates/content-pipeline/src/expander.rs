//! Grows under-length articles toward a target word count.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::generation::{CompletionRequest, GenerationClient, ModelParams};
use crate::metrics::count_words;
use crate::prompts;
use crate::response::ParsedContent;
use crate::retry::Sleeper;

/// An attempt that grows the article by less than this triggers the section prompt.
const MIN_GROWTH: usize = 30;
const MAX_EXPANSION_TOKENS: u64 = 4_000;

/// Share of the target that counts as "long enough".
pub(crate) fn reached(word_count: usize, target: u32, ratio: f64) -> bool {
    word_count as f64 >= target as f64 * ratio
}

#[derive(Clone)]
pub struct ContentExpander {
    client: Arc<dyn GenerationClient>,
    sleeper: Arc<dyn Sleeper>,
    config: PipelineConfig,
}

impl ContentExpander {
    pub fn new(
        client: Arc<dyn GenerationClient>,
        sleeper: Arc<dyn Sleeper>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            client,
            sleeper,
            config,
        }
    }

    /// Expand `parsed` toward `target` words.
    ///
    /// Returns the longest article seen. Never fails: backend errors cost an attempt,
    /// and falling short of the target is only logged.
    pub async fn expand(&self, parsed: &ParsedContent, target: u32) -> ParsedContent {
        if reached(parsed.word_count, target, 0.9) {
            return parsed.clone();
        }

        info!(from = parsed.word_count, target, "expanding content");

        let max_attempts = self.config.retry.expansion_attempts;
        let mut best = parsed.content.clone();
        let mut best_count = parsed.word_count;

        for attempt in 1..=max_attempts {
            if reached(best_count, target, 0.9) {
                break;
            }

            info!(
                attempt,
                max_attempts,
                words_to_add = prompts::words_to_add(best_count, target),
                "expansion attempt"
            );

            let primary = match self
                .client
                .complete(self.primary_request(&best, best_count, target))
                .await
            {
                Ok(text) => text.trim().to_string(),
                Err(e) => {
                    warn!(attempt, error = %e, "content expansion attempt failed");
                    self.sleeper
                        .sleep(self.config.retry.expansion_failure_delay)
                        .await;
                    continue;
                }
            };

            let mut candidate_count = count_words(&primary);
            let mut candidate = primary;
            info!(attempt, word_count = candidate_count, target, "after expansion attempt");

            if candidate_count < best_count + MIN_GROWTH && attempt < max_attempts {
                warn!(
                    attempt,
                    before = best_count,
                    after = candidate_count,
                    "expansion added too few words, trying section-based prompt"
                );

                let request = if candidate_count > best_count {
                    self.section_request(&candidate, candidate_count, target)
                } else {
                    self.section_request(&best, best_count, target)
                };

                match self.client.complete(request).await {
                    Ok(text) => {
                        let alt = text.trim().to_string();
                        let alt_count = count_words(&alt);
                        if alt_count > candidate_count {
                            info!(attempt, word_count = alt_count, "section-based expansion improved word count");
                            candidate = alt;
                            candidate_count = alt_count;
                        }
                    }
                    Err(e) => {
                        warn!(attempt, error = %e, "section-based expansion failed");
                        self.sleeper
                            .sleep(self.config.retry.expansion_failure_delay)
                            .await;
                    }
                }
            }

            if candidate_count > best_count {
                best = candidate;
                best_count = candidate_count;
            } else {
                debug!(attempt, "expansion did not grow the article, keeping previous version");
            }
        }

        if best_count < parsed.word_count + MIN_GROWTH {
            warn!(
                from = parsed.word_count,
                to = best_count,
                "expansion barely increased content length"
            );
        }
        if !reached(best_count, target, 0.8) {
            warn!(
                word_count = best_count,
                target, "expanded content is still well below target"
            );
        } else {
            info!(
                word_count = best_count,
                target,
                percent = percent_of(best_count, target),
                "content expanded"
            );
        }

        parsed.with_content(best)
    }

    fn primary_request(&self, article: &str, current: usize, target: u32) -> CompletionRequest {
        CompletionRequest {
            system: Some(prompts::EXPANSION_SYSTEM_PROMPT.to_string()),
            prompt: prompts::expansion_prompt(article, current, target),
            params: self.params(self.config.expansion_temperature, current, target),
        }
    }

    fn section_request(&self, article: &str, current: usize, target: u32) -> CompletionRequest {
        CompletionRequest {
            system: None,
            prompt: prompts::section_expansion_prompt(article, current, target),
            params: self.params(self.config.expansion_alt_temperature, current, target),
        }
    }

    fn params(&self, temperature: f32, current: usize, target: u32) -> ModelParams {
        let budget = prompts::words_to_add(current, target)
            .saturating_mul(10)
            .clamp(1, MAX_EXPANSION_TOKENS);
        ModelParams {
            model: self.config.model.clone(),
            temperature,
            max_tokens: budget as u32,
        }
    }
}

pub(crate) fn percent_of(count: usize, target: u32) -> u64 {
    if target == 0 {
        return 100;
    }
    (count as f64 / target as f64 * 100.0).round() as u64
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::error::GenerationError;
    use crate::retry::RetryPolicy;
    use crate::testing::{article_body, tagged_article, RecordingSleeper, ScriptedClient};

    fn expander(client: Arc<ScriptedClient>, sleeper: Arc<RecordingSleeper>) -> ContentExpander {
        let config = PipelineConfig::default().with_retry(RetryPolicy {
            expansion_failure_delay: Duration::from_millis(1_000),
            ..RetryPolicy::immediate()
        });
        ContentExpander::new(client, sleeper, config)
    }

    fn parsed_with(words: usize) -> ParsedContent {
        crate::response::parse(&tagged_article(words))
    }

    #[tokio::test]
    async fn no_op_when_close_enough() {
        let client = Arc::new(ScriptedClient::new());
        let sleeper = Arc::new(RecordingSleeper::new());
        let input = parsed_with(720);

        let out = expander(client.clone(), sleeper).expand(&input, 800).await;

        assert_eq!(out, input);
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn stops_once_target_reached() {
        let client = Arc::new(ScriptedClient::new().then_text(article_body(750)));
        let sleeper = Arc::new(RecordingSleeper::new());
        let input = parsed_with(400);

        let out = expander(client.clone(), sleeper).expand(&input, 800).await;

        assert_eq!(out.word_count, 750);
        assert_eq!(out.title, input.title);
        assert_eq!(out.keywords, input.keywords);
        assert_eq!(client.call_count(), 1);

        let call = &client.calls()[0];
        assert_eq!(call.system.as_deref(), Some(prompts::EXPANSION_SYSTEM_PROMPT));
        assert!(call.prompt.contains("CURRENT WORD COUNT: 400"));
        assert_eq!(call.params.max_tokens, 4_000);
        assert_eq!(call.params.temperature, 0.6);
    }

    #[tokio::test]
    async fn small_growth_escalates_to_section_prompt_and_keeps_longer() {
        let client = Arc::new(
            ScriptedClient::new()
                .then_text(article_body(410))
                .then_text(article_body(600))
                .then_text(article_body(760)),
        );
        let sleeper = Arc::new(RecordingSleeper::new());
        let input = parsed_with(400);

        let out = expander(client.clone(), sleeper).expand(&input, 800).await;

        assert_eq!(out.word_count, 760);
        let calls = client.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls[1].system.is_none());
        assert!(calls[1].prompt.contains("2-3 new sections with headers"));
        // The alternative prompt starts from the better of the two versions.
        assert!(calls[1].prompt.contains("(410 words)"));
        assert!(calls[2].prompt.contains("CURRENT WORD COUNT: 600"));
    }

    #[tokio::test]
    async fn no_section_prompt_on_last_attempt() {
        let client = Arc::new(ScriptedClient::new().repeating(Ok(article_body(405))));
        let sleeper = Arc::new(RecordingSleeper::new());
        let input = parsed_with(400);

        let out = expander(client.clone(), sleeper).expand(&input, 800).await;

        // Attempts 1 and 2 each try both prompts, attempt 3 only the primary one.
        assert_eq!(client.call_count(), 5);
        assert_eq!(out.word_count, 405);
    }

    #[tokio::test]
    async fn failures_wait_and_move_on() {
        let client = Arc::new(
            ScriptedClient::new()
                .then_error(GenerationError::Request("timeout".to_string()))
                .then_text(article_body(790)),
        );
        let sleeper = Arc::new(RecordingSleeper::new());
        let input = parsed_with(300);

        let out = expander(client.clone(), sleeper.clone()).expand(&input, 800).await;

        assert_eq!(out.word_count, 790);
        assert_eq!(sleeper.delays(), vec![Duration::from_millis(1_000)]);
    }

    #[tokio::test]
    async fn shorter_rewrite_never_replaces_longer_content() {
        let client = Arc::new(
            ScriptedClient::new()
                .then_text(article_body(100))
                .then_text(article_body(200))
                .repeating(Err(GenerationError::Request("down".to_string()))),
        );
        let sleeper = Arc::new(RecordingSleeper::new());
        let input = parsed_with(400);

        let out = expander(client, sleeper.clone()).expand(&input, 800).await;

        assert_eq!(out, input);
        assert_eq!(sleeper.delays().len(), 2);
    }

    #[tokio::test]
    async fn does_not_mutate_input() {
        let client = Arc::new(ScriptedClient::new().then_text(article_body(780)));
        let sleeper = Arc::new(RecordingSleeper::new());
        let input = parsed_with(300);
        let snapshot = input.clone();

        let _ = expander(client, sleeper).expand(&input, 800).await;

        assert_eq!(input, snapshot);
    }
}
