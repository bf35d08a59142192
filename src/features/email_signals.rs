use super::keywords::{
    matches_in, EMAIL_PHISHING_KEYWORDS, REPORTED_GREETINGS, REPORTED_URGENCY_WORDS,
    SCORED_GREETINGS, SCORED_URGENCY_WORDS,
};
use super::{HTML_TAG_PATTERN, RAW_URL_PATTERN};

/// Rule-level observations over the raw (un-normalized) email text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EmailSignals {
    pub keywords: Vec<&'static str>,
    pub url_count: usize,
    pub scored_urgency: Vec<&'static str>,
    pub reported_urgency: Vec<&'static str>,
    pub scored_greeting: bool,
    pub reported_greeting: bool,
    /// Only the body is checked for markup.
    pub has_html: bool,
}

impl EmailSignals {
    pub fn collect(subject: &str, body: &str) -> Self {
        let combined = format!("{} {}", subject, body).to_lowercase();

        Self {
            keywords: matches_in(&combined, EMAIL_PHISHING_KEYWORDS),
            url_count: RAW_URL_PATTERN.find_iter(&combined).count(),
            scored_urgency: matches_in(&combined, SCORED_URGENCY_WORDS),
            reported_urgency: matches_in(&combined, REPORTED_URGENCY_WORDS),
            scored_greeting: !matches_in(&combined, SCORED_GREETINGS).is_empty(),
            reported_greeting: !matches_in(&combined, REPORTED_GREETINGS).is_empty(),
            has_html: HTML_TAG_PATTERN.is_match(body),
        }
    }
}
