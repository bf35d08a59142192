use crate::classifier::Label;
use crate::features::keywords::{matches_in, URL_SUSPICIOUS_KEYWORDS};
use crate::features::{EmailSignals, UrlFeatures};

const KEYWORDS_SHOWN: usize = 5;
const TOP_TERMS_SHOWN: usize = 6;
const LONG_URL: usize = 75;
const MANY_HYPHENS: usize = 3;
const MANY_DOTS: usize = 4;
const MANY_QUERY_PARAMS: usize = 2;
const MANY_EMAIL_URLS: usize = 3;

pub const URL_SAFE_REASONS: [&str; 3] = [
    "✅ URL structure appears legitimate",
    "✅ Uses HTTPS encryption",
    "✅ No suspicious keywords or patterns detected",
];

pub const EMAIL_SAFE_REASONS: [&str; 3] = [
    "✅ No suspicious keywords or phishing patterns detected",
    "✅ Email structure appears legitimate",
    "✅ No excessive urgency or credential-requesting language found",
];

pub const UNEXPLAINED_PHISHING_REASON: &str =
    "🤖 Flagged by the classifier without a specific triggered rule";

/// Reasons for a URL verdict, in fixed rule order.
pub fn explain_url(url: &str, features: &UrlFeatures, label: Label) -> Vec<String> {
    let mut reasons = Vec::new();
    let values = features.values();
    let hyphens = values[2] as usize;
    let dots = values[1] as usize;
    let question_marks = values[6] as usize;
    let equals = values[7] as usize;

    if !features.is_https() {
        reasons.push("⚠️ URL does not use HTTPS — connection may be insecure".to_string());
    }

    if features.has_ipv4() {
        reasons.push("🚨 URL contains a raw IP address instead of a domain name".to_string());
    }

    if features.length() > LONG_URL {
        reasons.push(format!(
            "📏 Unusually long URL ({} characters) — common in phishing",
            features.length()
        ));
    }

    let found = matches_in(&url.to_lowercase(), URL_SUSPICIOUS_KEYWORDS);
    if !found.is_empty() {
        reasons.push(format!(
            "🔑 Suspicious keywords detected: {}",
            joined(&found, KEYWORDS_SHOWN)
        ));
    }

    if hyphens > MANY_HYPHENS {
        reasons.push(format!(
            "➖ Excessive hyphens ({}) — often used to mimic legitimate domains",
            hyphens
        ));
    }

    if dots > MANY_DOTS {
        reasons.push(format!(
            "🔵 Multiple subdomains detected ({} dots) — common in spoofing",
            dots
        ));
    }

    if features.has_at_sign() {
        reasons.push("⚡ '@' symbol in URL — can redirect to a completely different host".to_string());
    }

    if features.has_suspicious_tld() {
        reasons.push(
            "🌐 Suspicious top-level domain (e.g. .tk, .ml, .xyz) — often used for spam".to_string(),
        );
    }

    if question_marks > 0 && equals > MANY_QUERY_PARAMS {
        reasons.push(
            "🔗 Complex query string with multiple parameters — common in redirect attacks"
                .to_string(),
        );
    }

    finish(reasons, label, &URL_SAFE_REASONS)
}

/// Reasons for an email verdict. `top_terms` comes from the vectorizer and
/// is only non-empty on the trained path.
pub fn explain_email(signals: &EmailSignals, top_terms: &[String], label: Label) -> Vec<String> {
    let mut reasons = Vec::new();

    if !signals.keywords.is_empty() {
        reasons.push(format!(
            "🚨 High-risk phishing keywords found: {}",
            joined(&signals.keywords, KEYWORDS_SHOWN)
        ));
    }

    if signals.url_count > MANY_EMAIL_URLS {
        reasons.push(format!(
            "🔗 Contains {} URLs — excessive links is a phishing signal",
            signals.url_count
        ));
    } else if signals.url_count > 0 {
        reasons.push(format!(
            "🔗 Email contains {} URL(s) — review before clicking",
            signals.url_count
        ));
    }

    if signals.has_html {
        reasons.push(
            "📧 Email contains HTML content — may be used to disguise malicious links".to_string(),
        );
    }

    if !signals.reported_urgency.is_empty() {
        reasons.push(format!(
            "⏰ Urgency language detected: {} — pressure tactic",
            signals.reported_urgency.join(", ")
        ));
    }

    if signals.reported_greeting {
        reasons.push(
            "📩 Generic greeting used — legitimate companies use your real name".to_string(),
        );
    }

    if !top_terms.is_empty() {
        let shown: Vec<&str> = top_terms
            .iter()
            .take(TOP_TERMS_SHOWN)
            .map(|t| t.as_str())
            .collect();
        reasons.push(format!(
            "🔍 Key suspicious terms identified by AI: {}",
            shown.join(", ")
        ));
    }

    finish(reasons, label, &EMAIL_SAFE_REASONS)
}

fn joined(items: &[&str], limit: usize) -> String {
    items
        .iter()
        .take(limit)
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

/// Never returns an empty list.
fn finish(mut reasons: Vec<String>, label: Label, safe_reasons: &[&str]) -> Vec<String> {
    if reasons.is_empty() {
        match label {
            Label::Safe => reasons.extend(safe_reasons.iter().map(|r| r.to_string())),
            Label::Phishing => reasons.push(UNEXPLAINED_PHISHING_REASON.to_string()),
        }
    }
    reasons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::extract_url_features;

    fn url_reasons(url: &str, label: Label) -> Vec<String> {
        explain_url(url, &extract_url_features(url), label)
    }

    #[test]
    fn test_url_rules_fire_in_order() {
        let reasons = url_reasons("http://192.0.2.1/login/verify", Label::Phishing);

        assert_eq!(reasons.len(), 3);
        assert!(reasons[0].contains("does not use HTTPS"));
        assert!(reasons[1].contains("raw IP address"));
        assert!(reasons[2].ends_with("login, verify"));
    }

    #[test]
    fn test_long_url_reports_length() {
        let url = format!("https://example.com/{}", "a".repeat(80));
        let reasons = url_reasons(&url, Label::Safe);
        assert_eq!(reasons.len(), 1);
        assert!(reasons[0].contains("(100 characters)"));
    }

    #[test]
    fn test_keywords_limited_to_five() {
        let url = "https://login-verify-secure-account-update-banking.example.com";
        let reasons = url_reasons(url, Label::Phishing);

        assert!(reasons[0].ends_with("login, verify, secure, account, update"));
        assert!(reasons[1].contains("Excessive hyphens (5)"));
    }

    #[test]
    fn test_structural_url_rules() {
        let url = "https://a.b.c.d.e.example.tk/@home?x=1&y=2&z=3";
        let reasons = url_reasons(url, Label::Phishing);

        assert!(reasons.iter().any(|r| r.contains("6 dots")));
        assert!(reasons.iter().any(|r| r.contains("'@' symbol")));
        assert!(reasons.iter().any(|r| r.contains("top-level domain")));
        assert!(reasons.iter().any(|r| r.contains("Complex query string")));
    }

    #[test]
    fn test_safe_url_gets_reassurance() {
        let reasons = url_reasons("https://example.com/", Label::Safe);
        assert_eq!(reasons, URL_SAFE_REASONS.to_vec());
    }

    #[test]
    fn test_unexplained_phishing_gets_generic_reason() {
        let reasons = url_reasons("https://example.com/", Label::Phishing);
        assert_eq!(reasons, vec![UNEXPLAINED_PHISHING_REASON]);
    }

    #[test]
    fn test_email_rules() {
        let signals = EmailSignals::collect(
            "Urgent: Account Suspended",
            "<p>Dear customer, verify your credentials immediately at http://x.tk</p>",
        );
        let reasons = explain_email(&signals, &[], Label::Phishing);

        assert_eq!(reasons.len(), 5);
        assert!(reasons[0].ends_with("verify, account, suspended, urgent, immediately"));
        assert!(reasons[1].contains("1 URL(s)"));
        assert!(reasons[2].contains("HTML content"));
        assert!(reasons[3].contains("urgent, immediately"));
        assert!(reasons[4].contains("Generic greeting"));
    }

    #[test]
    fn test_email_excessive_links() {
        let signals = EmailSignals::collect("", "http://a http://b http://c http://d");
        let reasons = explain_email(&signals, &[], Label::Safe);
        assert!(reasons[0].contains("Contains 4 URLs"));
    }

    #[test]
    fn test_email_top_terms_capped_at_six() {
        let terms: Vec<String> = (0..8).map(|i| format!("term{}", i)).collect();
        let reasons = explain_email(&EmailSignals::default(), &terms, Label::Safe);

        assert_eq!(reasons.len(), 1);
        assert!(reasons[0].ends_with("term0, term1, term2, term3, term4, term5"));
    }

    #[test]
    fn test_unexplained_phishing_email_gets_generic_reason() {
        let reasons = explain_email(&EmailSignals::default(), &[], Label::Phishing);
        assert_eq!(reasons, vec![UNEXPLAINED_PHISHING_REASON]);
    }

    #[test]
    fn test_safe_email_gets_reassurance() {
        let reasons = explain_email(&EmailSignals::default(), &[], Label::Safe);
        assert_eq!(reasons, EMAIL_SAFE_REASONS.to_vec());
    }
}
