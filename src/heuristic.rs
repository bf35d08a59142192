//! Rule-weighted scoring used when no trained artifact is available.
//!
//! Weights and thresholds are fixed constants and are not configuration.

use crate::classifier::{Classification, Label};
use crate::features::{EmailSignals, UrlFeatures};

const URL_NO_HTTPS: i32 = 20;
const URL_RAW_IP: i32 = 35;
const URL_PER_KEYWORD: i32 = 8;
const URL_AT_SIGN: i32 = 25;
const URL_SUSPICIOUS_TLD: i32 = 20;
const URL_LONG: i32 = 10;
const URL_LONG_THRESHOLD: usize = 75;
const URL_PHISHING_SCORE: i32 = 40;

const EMAIL_PER_KEYWORD: i32 = 6;
const EMAIL_MANY_URLS: i32 = 20;
const EMAIL_MANY_URLS_THRESHOLD: usize = 3;
const EMAIL_PER_URGENCY_WORD: i32 = 8;
const EMAIL_GENERIC_GREETING: i32 = 15;
const EMAIL_PHISHING_SCORE: i32 = 35;

pub fn score_url(features: &UrlFeatures) -> i32 {
    let mut score = 0;

    if !features.is_https() {
        score += URL_NO_HTTPS;
    }
    if features.has_ipv4() {
        score += URL_RAW_IP;
    }
    score += features.keyword_hits() as i32 * URL_PER_KEYWORD;
    if features.has_at_sign() {
        score += URL_AT_SIGN;
    }
    if features.has_suspicious_tld() {
        score += URL_SUSPICIOUS_TLD;
    }
    if features.length() > URL_LONG_THRESHOLD {
        score += URL_LONG;
    }

    score
}

pub fn classify_url(features: &UrlFeatures) -> Classification {
    let score = score_url(features);
    log::debug!("Heuristic URL score: {}", score);

    if score >= URL_PHISHING_SCORE {
        Classification::new(Label::Phishing, f64::from(50 + score).min(98.0))
    } else {
        Classification::new(Label::Safe, f64::from(95 - score).max(55.0))
    }
}

pub fn score_email(signals: &EmailSignals) -> i32 {
    let mut score = signals.keywords.len() as i32 * EMAIL_PER_KEYWORD;

    if signals.url_count > EMAIL_MANY_URLS_THRESHOLD {
        score += EMAIL_MANY_URLS;
    }
    score += signals.scored_urgency.len() as i32 * EMAIL_PER_URGENCY_WORD;
    if signals.scored_greeting {
        score += EMAIL_GENERIC_GREETING;
    }

    score
}

pub fn classify_email(signals: &EmailSignals) -> Classification {
    let score = score_email(signals);
    log::debug!("Heuristic email score: {}", score);

    if score >= EMAIL_PHISHING_SCORE {
        Classification::new(
            Label::Phishing,
            (50.0 + f64::from(score) * 0.7).min(97.0),
        )
    } else {
        Classification::new(Label::Safe, f64::from(90 - score).max(55.0))
    }
}
