//! Test doubles for driving the pipeline without a live backend or real delays.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::GenerationError;
use crate::generation::{CompletionRequest, GenerationClient};
use crate::retry::Sleeper;

/// Generation client that replays queued responses and records every request.
///
/// Once the queue is drained it keeps returning the `repeat` response if one was
/// set, otherwise a request error.
#[derive(Default)]
pub struct ScriptedClient {
    queue: Mutex<VecDeque<Result<String, GenerationError>>>,
    repeat: Option<Result<String, GenerationError>>,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_text(self, text: impl Into<String>) -> Self {
        self.push(Ok(text.into()))
    }

    pub fn then_error(self, err: GenerationError) -> Self {
        self.push(Err(err))
    }

    /// Response used for every call after the queue is empty.
    pub fn repeating(mut self, response: Result<String, GenerationError>) -> Self {
        self.repeat = Some(response);
        self
    }

    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    fn push(self, response: Result<String, GenerationError>) -> Self {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push_back(response);
        }
        self
    }
}

#[async_trait]
impl GenerationClient for ScriptedClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, GenerationError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request);
        }
        let next = self.queue.lock().ok().and_then(|mut q| q.pop_front());
        match next.or_else(|| self.repeat.clone()) {
            Some(response) => response,
            None => Err(GenerationError::Request("script exhausted".to_string())),
        }
    }

    fn source(&self) -> &str {
        "scripted"
    }
}

/// Sleeper that records requested delays and returns immediately.
#[derive(Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().map(|d| d.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        if let Ok(mut delays) = self.delays.lock() {
            delays.push(duration);
        }
    }
}

/// Article body of exactly `words` words, split into a few headed paragraphs.
pub fn article_body(words: usize) -> String {
    if words == 0 {
        return String::new();
    }
    // "<h2>Overview</h2>" counts as one word: "h2Overviewh2".
    let mut out = String::from("<h2>Overview</h2>");
    let body_words = words - 1;
    if body_words == 0 {
        return out;
    }
    out.push_str("\n<p>");
    for i in 0..body_words {
        if i > 0 && i % 50 == 0 {
            out.push_str(".</p>\n<p>");
        } else if i > 0 {
            out.push(' ');
        }
        out.push_str("lorem");
    }
    out.push_str(".</p>");
    out
}

/// Well-formed tagged response whose content has exactly `words` words.
pub fn tagged_article(words: usize) -> String {
    format!(
        "TITLE: Cloud Migration for IT Managers\n\
META: A practical guide to planning, executing and validating a cloud migration.\n\
KEYWORDS: cloud migration, cloud strategy, it modernization\n\
CONTENT: {}",
        article_body(words)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::count_words;

    #[test]
    fn article_body_has_requested_word_count() {
        for words in [0, 1, 2, 50, 51, 120, 401, 900] {
            assert_eq!(count_words(&article_body(words)), words, "words={words}");
        }
    }

    #[tokio::test]
    async fn scripted_client_replays_then_repeats() {
        let client = ScriptedClient::new()
            .then_text("first")
            .then_error(GenerationError::EmptyCompletion)
            .repeating(Ok("again".to_string()));
        let req = CompletionRequest {
            system: None,
            prompt: "p".to_string(),
            params: crate::generation::ModelParams {
                model: "m".to_string(),
                temperature: 0.5,
                max_tokens: 10,
            },
        };
        assert_eq!(client.complete(req.clone()).await.unwrap(), "first");
        assert!(client.complete(req.clone()).await.is_err());
        assert_eq!(client.complete(req.clone()).await.unwrap(), "again");
        assert_eq!(client.complete(req).await.unwrap(), "again");
        assert_eq!(client.call_count(), 4);
    }
}
