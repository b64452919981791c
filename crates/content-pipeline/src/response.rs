//! Parser for tagged article responses.
//!
//! The backend is prompted to answer in four labeled sections:
//! - `TITLE: ...` (single line)
//! - `META: ...` (single line)
//! - `KEYWORDS: a, b, c` (single line, comma separated)
//! - `CONTENT: ...` (everything after the marker, may span lines)
//!
//! Each marker must start its own line (leading spaces allowed). Markers are
//! matched case-insensitively and may appear in any order. Raw tagged
//! text never leaves this module; callers get a [`ParsedContent`].

use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::metrics;

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| marker_line("TITLE"));
static META_RE: LazyLock<Regex> = LazyLock::new(|| marker_line("META"));
static KEYWORDS_RE: LazyLock<Regex> = LazyLock::new(|| marker_line("KEYWORDS"));
static CONTENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^[ \t]*CONTENT:[ \t]*").expect("valid regex"));

// Value stays on the marker's line; an empty value never borrows the next line.
fn marker_line(marker: &str) -> Regex {
    Regex::new(&format!(r"(?im)^[ \t]*{marker}:[ \t]*(.*?)[ \t]*$")).expect("valid regex")
}

/// A generated article after parsing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParsedContent {
    pub title: String,
    pub meta: String,
    pub keywords: Vec<String>,
    /// Article body as HTML-ish markup.
    pub content: String,
    /// Always `metrics::count_words(&content)`.
    pub word_count: usize,
}

impl ParsedContent {
    pub fn new(title: String, meta: String, keywords: Vec<String>, content: String) -> Self {
        let word_count = metrics::count_words(&content);
        Self {
            title,
            meta,
            keywords,
            content,
            word_count,
        }
    }

    /// Same fields with a new body; the word count is recomputed.
    pub fn with_content(&self, content: String) -> Self {
        Self::new(
            self.title.clone(),
            self.meta.clone(),
            self.keywords.clone(),
            content,
        )
    }

    /// Render back into the four-section wire format.
    pub fn to_tagged(&self) -> String {
        format!(
            "TITLE: {}\nMETA: {}\nKEYWORDS: {}\nCONTENT: {}",
            self.title,
            self.meta,
            self.keywords.join(", "),
            self.content
        )
    }
}

/// True when all four sections are present with non-blank values.
pub fn validate(raw: &str) -> bool {
    [&*TITLE_RE, &*META_RE, &*KEYWORDS_RE]
        .into_iter()
        .all(|re| !single_line(re, raw).is_empty())
        && content_section(raw).is_some_and(|c| !c.is_empty())
}

/// Extract the four sections. Missing sections come back empty; only call this on
/// input that passed [`validate`] if the result is meant to be kept.
pub fn parse(raw: &str) -> ParsedContent {
    let title = single_line(&TITLE_RE, raw);
    let meta = single_line(&META_RE, raw);
    let keywords = single_line(&KEYWORDS_RE, raw)
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect();
    let content = content_section(raw).unwrap_or_default().to_string();

    ParsedContent::new(title, meta, keywords, content)
}

fn single_line(re: &Regex, raw: &str) -> String {
    re.captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

fn content_section(raw: &str) -> Option<&str> {
    CONTENT_RE.find(raw).map(|m| raw[m.end()..].trim())
}
