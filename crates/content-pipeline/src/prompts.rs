//! Prompt text sent to the generation backend.

/// System instruction for article generation.
pub const ARTICLE_SYSTEM_PROMPT: &str = "You are a professional SEO content writer. Generate highly optimized content with structured formatting and engaging readability. Always include TITLE, META, KEYWORDS, and CONTENT sections.";

/// System instruction for the primary expansion prompt.
pub const EXPANSION_SYSTEM_PROMPT: &str = "You are a content expansion specialist. Your task is to expand articles to meet specific word count targets while maintaining quality and relevance. You MUST add enough content to reach the target word count.";

/// System instruction for topic suggestions.
pub const TOPICS_SYSTEM_PROMPT: &str = "You are a content strategy expert who understands current industry trends and SEO best practices. Generate trending topics that are specific, actionable, and relevant to the target audience.";

/// User prompt for a new article in the four-section format.
pub fn article_prompt(
    topic: &str,
    industry: &str,
    audience: &str,
    target_words: u32,
    keywords: &[String],
) -> String {
    let minimum = target_words / 2;
    let keyword_line = if keywords.is_empty() {
        String::new()
    } else {
        format!(
            "5. Include these keywords naturally in the content: {}",
            keywords.join(", ")
        )
    };

    format!(
        r#"Write a well-structured, SEO-optimized article on "{topic}" for a {industry} business targeting {audience}.

The article must follow this EXACT format:
TITLE: [An engaging title under 60 characters]
META: [A compelling meta description under 155 characters]
KEYWORDS: [5-7 relevant keywords separated by commas]
CONTENT: [The main article content with proper HTML formatting using <h2>, <h3>, <p> tags]

IMPORTANT REQUIREMENTS:
1. The CONTENT section should be AT LEAST {minimum} words. Target {target_words} words if possible.
2. Include ALL four sections: TITLE, META, KEYWORDS, and CONTENT.
3. Make the content comprehensive, informative, and valuable to the target audience.
4. Use proper formatting with headers, paragraphs, and lists.
{keyword_line}

Write the article now, focusing on quality and proper structure."#
    )
}

/// Ask for the full article grown from `current` to `target` words.
pub fn expansion_prompt(article: &str, current: usize, target: u32) -> String {
    let to_add = words_to_add(current, target);
    let floor = (target as u64 * 9).div_ceil(10);

    format!(
        r#"I need you to expand the following article from {current} words to EXACTLY {target} words.

CURRENT WORD COUNT: {current}
TARGET WORD COUNT: {target}
WORDS TO ADD: {to_add}

EXPANSION GUIDELINES:
1. Add approximately {to_add} more words by providing more details, examples, case studies, or statistics
2. Maintain the article's existing structure and flow
3. Use the same tone and style as the original
4. Focus on adding valuable, relevant content rather than filler
5. IMPORTANT: The final expanded content MUST be at least {floor} words

ORIGINAL ARTICLE:
{article}

Return ONLY the complete expanded article with all sections fully developed. The output MUST be a single, cohesive article containing ALL the original content plus your additions."#
    )
}

/// Fallback expansion phrasing: grow the article with new headed sections.
pub fn section_expansion_prompt(article: &str, current: usize, target: u32) -> String {
    let to_add = words_to_add(current, target);

    format!(
        r#"Add {to_add} words to this article by adding 2-3 new sections with headers.
Original article ({current} words):

{article}

Return the COMPLETE article with new sections added. The final article should be about {target} words."#
    )
}

/// Ask for five blog topics as a JSON array of strings.
pub fn topics_prompt(industry: &str, audience: &str, year: i32) -> String {
    format!(
        r#"Generate 5 trending and engaging blog post topics for a {industry} business targeting {audience}.

Requirements:
1. Topics should be current and relevant for {year}
2. Each topic should be SEO-friendly and engaging
3. Topics should be specific to the {industry} industry
4. Consider the target audience: {audience}
5. Each topic should be 5-10 words long
6. Format as a simple array of strings

Example format:
[
  "How AI is Transforming Healthcare in {year}",
  "Top 5 Digital Marketing Trends for SMBs"
]"#
    )
}

pub fn words_to_add(current: usize, target: u32) -> u64 {
    (target as u64).saturating_sub(current as u64)
}
