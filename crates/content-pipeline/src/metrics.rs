//! Text metrics over generated article markup.
//!
//! Every function here is pure and total: malformed or empty input degrades to
//! zero counts instead of failing.

use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\s-]").expect("valid regex"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("valid regex"));

/// Count whitespace-separated words after dropping punctuation.
pub fn count_words(text: &str) -> usize {
    NON_WORD.replace_all(text, "").split_whitespace().count()
}

/// Remove anything that looks like a markup tag.
pub fn strip_tags(markup: &str) -> String {
    TAG.replace_all(markup, "").into_owned()
}

/// Percentage of tokens in `text` that are exactly `keyword` (case-insensitive).
pub fn keyword_density(text: &str, keyword: &str) -> f64 {
    if text.is_empty() || keyword.is_empty() {
        return 0.0;
    }
    let lowered = text.to_lowercase();
    let cleaned = NON_WORD.replace_all(&lowered, "");
    let keyword = keyword.to_lowercase();

    let mut total = 0usize;
    let mut hits = 0usize;
    for token in cleaned.split_whitespace() {
        total += 1;
        if token == keyword {
            hits += 1;
        }
    }

    if total == 0 {
        return 0.0;
    }
    hits as f64 / total as f64 * 100.0
}

/// Flesch reading-ease estimate, clamped to [0, 100].
///
/// Text without any `.`, `!` or `?` scores 0.
pub fn readability(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }
    let plain = strip_tags(text);
    if !SENTENCE_END.is_match(&plain) {
        return 0.0;
    }

    let sentences = SENTENCE_END
        .split(&plain)
        .filter(|s| !s.is_empty())
        .count();
    let words: Vec<&str> = plain.split_whitespace().collect();
    if sentences == 0 || words.is_empty() {
        return 0.0;
    }

    let syllables: usize = words.iter().map(|w| estimate_syllables(w)).sum();
    let words_per_sentence = words.len() as f64 / sentences as f64;
    let syllables_per_word = syllables as f64 / words.len() as f64;

    let score = 206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word;
    score.clamp(0.0, 100.0)
}

/// Runs of vowel-like letters, at least one per word.
fn estimate_syllables(word: &str) -> usize {
    let mut runs = 0;
    let mut in_vowel = false;
    for c in word.chars().flat_map(char::to_lowercase) {
        let vowel = matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
        if vowel && !in_vowel {
            runs += 1;
        }
        in_vowel = vowel;
    }
    runs.max(1)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HeadingAnalysis {
    pub h1: usize,
    pub h2: usize,
    pub h3: usize,
    pub h4: usize,
    pub h5: usize,
    pub h6: usize,
    pub total: usize,
    /// Human-readable summary, e.g. "Found: 1 H1, 3 H2".
    pub structure: String,
    pub issues: Vec<String>,
}

pub fn heading_structure(markup: &str) -> HeadingAnalysis {
    let doc = Html::parse_fragment(markup);
    let mut counts = [0usize; 6];
    for (level, count) in counts.iter_mut().enumerate() {
        *count = doc.select(&selector(&format!("h{}", level + 1))).count();
    }
    let [h1, h2, h3, h4, h5, h6] = counts;
    let total = counts.iter().sum();

    let mut issues = Vec::new();
    if h1 == 0 {
        issues.push("Missing H1 heading".to_string());
    } else if h1 > 1 {
        issues.push("Multiple H1 headings (recommended: only one H1)".to_string());
    }

    if total == 0 {
        issues.push("No headings found".to_string());
    } else if h2 == 0 && (h3 > 0 || h4 > 0) {
        issues.push("Skipped H2 heading level".to_string());
    }

    let structure = if total == 0 {
        "No headings found".to_string()
    } else {
        let found: Vec<String> = counts
            .iter()
            .enumerate()
            .filter(|(_, n)| **n > 0)
            .map(|(level, n)| format!("{n} H{}", level + 1))
            .collect();
        format!("Found: {}", found.join(", "))
    };

    HeadingAnalysis {
        h1,
        h2,
        h3,
        h4,
        h5,
        h6,
        total,
        structure,
        issues,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkAnalysis {
    pub total: usize,
    pub internal: usize,
    pub external: usize,
    pub issues: Vec<String>,
}

/// Classify anchors as internal or external by whether `href` is absolute http(s).
pub fn link_analysis(markup: &str) -> LinkAnalysis {
    let doc = Html::parse_fragment(markup);
    let mut analysis = LinkAnalysis::default();

    for link in doc.select(&selector("a")) {
        analysis.total += 1;
        let href = match link.value().attr("href") {
            Some(h) if !h.is_empty() => h,
            _ => {
                analysis
                    .issues
                    .push("Link without href attribute found".to_string());
                continue;
            }
        };

        if href.starts_with("http") {
            analysis.external += 1;
        } else {
            analysis.internal += 1;
        }

        if link.text().collect::<String>().trim().is_empty() {
            analysis.issues.push("Empty link text found".to_string());
        }
    }

    analysis
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnalysis {
    pub total: usize,
    pub missing_alt: usize,
    pub empty_alt: usize,
}

pub fn image_analysis(markup: &str) -> ImageAnalysis {
    let doc = Html::parse_fragment(markup);
    let mut analysis = ImageAnalysis::default();

    for img in doc.select(&selector("img")) {
        analysis.total += 1;
        match img.value().attr("alt") {
            None => analysis.missing_alt += 1,
            Some(alt) if alt.trim().is_empty() => analysis.empty_alt += 1,
            Some(_) => {}
        }
    }

    analysis
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}
