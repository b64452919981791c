//! SEO scoring for article markup.
//!
//! `analyze` is a pure aggregation over [`crate::metrics`]; it can be called on
//! generated drafts or on content that came from anywhere else.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::metrics::{self, HeadingAnalysis, ImageAnalysis, LinkAnalysis};

const MIN_WORDS: usize = 300;
const META_MIN_CHARS: usize = 50;
const META_MAX_CHARS: usize = 160;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum WordCountStatus {
    Good,
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DensityStatus {
    #[serde(rename = "not analyzed")]
    NotAnalyzed,
    #[serde(rename = "poor")]
    Poor,
    #[serde(rename = "warning")]
    Warning,
    #[serde(rename = "good")]
    Good,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReadabilityStatus {
    Difficult,
    Moderate,
    Good,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum MetaStatus {
    #[serde(rename = "missing")]
    Missing,
    #[serde(rename = "too short")]
    TooShort,
    #[serde(rename = "too long")]
    TooLong,
    #[serde(rename = "good")]
    Good,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WordCountReport {
    pub count: usize,
    pub status: WordCountStatus,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KeywordDensityReport {
    /// Mean density across keywords, in percent, rounded to two decimals.
    pub average: f64,
    pub by_keyword: BTreeMap<String, f64>,
    pub status: DensityStatus,
    pub recommendation: String,
}

impl Default for KeywordDensityReport {
    fn default() -> Self {
        Self {
            average: 0.0,
            by_keyword: BTreeMap::new(),
            status: DensityStatus::NotAnalyzed,
            recommendation: "Target 1-3% keyword density for primary keywords".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReadabilityReport {
    /// 0 (hardest) to 100 (easiest).
    pub score: f64,
    pub status: ReadabilityStatus,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetaDescriptionReport {
    /// Length in characters.
    pub length: usize,
    pub status: MetaStatus,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeoReport {
    pub word_count: WordCountReport,
    pub keyword_density: KeywordDensityReport,
    pub readability: ReadabilityReport,
    pub headings: HeadingAnalysis,
    pub links: LinkAnalysis,
    pub images: ImageAnalysis,
    pub meta_description: MetaDescriptionReport,
}

/// Score `markup` against `keywords` and `meta_description`.
pub fn analyze(markup: &str, keywords: &[String], meta_description: &str) -> SeoReport {
    let plain = metrics::strip_tags(markup);

    SeoReport {
        word_count: word_count_report(metrics::count_words(&plain)),
        keyword_density: keyword_density_report(&plain, keywords),
        readability: readability_report(metrics::readability(&plain)),
        headings: metrics::heading_structure(markup),
        links: metrics::link_analysis(markup),
        images: metrics::image_analysis(markup),
        meta_description: meta_description_report(meta_description.chars().count()),
    }
}

fn word_count_report(count: usize) -> WordCountReport {
    if count >= MIN_WORDS {
        WordCountReport {
            count,
            status: WordCountStatus::Good,
            recommendation: "Good content length".to_string(),
        }
    } else {
        WordCountReport {
            count,
            status: WordCountStatus::Poor,
            recommendation: "Add more content (recommended: 1000+ words for in-depth articles)"
                .to_string(),
        }
    }
}

fn keyword_density_report(plain: &str, keywords: &[String]) -> KeywordDensityReport {
    if keywords.is_empty() {
        return KeywordDensityReport::default();
    }

    let densities: Vec<f64> = keywords
        .iter()
        .map(|k| metrics::keyword_density(plain, k))
        .collect();
    let by_keyword = keywords
        .iter()
        .cloned()
        .zip(densities.iter().map(|d| round2(*d)))
        .collect();
    let average = round2(densities.iter().sum::<f64>() / densities.len() as f64);

    let (status, recommendation) = if average < 0.5 {
        (DensityStatus::Poor, "Increase keyword usage (target: 1-3%)")
    } else if average > 5.0 {
        (
            DensityStatus::Warning,
            "Keyword stuffing detected. Reduce keyword density.",
        )
    } else {
        (DensityStatus::Good, "Good keyword density")
    };

    KeywordDensityReport {
        average,
        by_keyword,
        status,
        recommendation: recommendation.to_string(),
    }
}

fn readability_report(score: f64) -> ReadabilityReport {
    let (status, recommendation) = if score < 30.0 {
        (
            ReadabilityStatus::Difficult,
            "Text is very difficult to read. Use shorter sentences and simpler words.",
        )
    } else if score < 60.0 {
        (
            ReadabilityStatus::Moderate,
            "Text is somewhat difficult to read. Try simplifying your language.",
        )
    } else {
        (ReadabilityStatus::Good, "Text is easy to read. Good job!")
    };

    ReadabilityReport {
        score,
        status,
        recommendation: recommendation.to_string(),
    }
}

fn meta_description_report(length: usize) -> MetaDescriptionReport {
    let (status, recommendation) = if length == 0 {
        (
            MetaStatus::Missing,
            "Add a meta description (50-160 characters)",
        )
    } else if length < META_MIN_CHARS {
        (
            MetaStatus::TooShort,
            "Meta description is too short. Add more content (50-160 characters)",
        )
    } else if length > META_MAX_CHARS {
        (
            MetaStatus::TooLong,
            "Meta description is too long. Shorten it to under 160 characters.",
        )
    } else {
        (MetaStatus::Good, "Meta description length is good")
    };

    MetaDescriptionReport {
        length,
        status,
        recommendation: recommendation.to_string(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
