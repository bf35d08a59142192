//! Fixed keyword tables shared by feature extraction, the heuristic scorers
//! and the explanation rules. Trained artifacts were fitted against these
//! exact lists, so entries and their order must not change.

pub const URL_SUSPICIOUS_KEYWORDS: &[&str] = &[
    "login",
    "verify",
    "secure",
    "account",
    "update",
    "banking",
    "confirm",
    "password",
    "credential",
    "paypal",
    "ebay",
    "amazon",
    "apple",
    "microsoft",
    "support",
    "helpdesk",
    "alert",
    "suspended",
    "unlock",
    "validate",
    "click",
    "free",
    "bonus",
    "winner",
    "prize",
    "offer",
    "limited",
    "urgent",
    "immediate",
];

pub const SUSPICIOUS_TLDS: &[&str] = &[
    ".tk", ".ml", ".ga", ".cf", ".gq", ".xyz", ".top", ".club", ".work",
];

/// Characters counted by the last URL feature; excludes `.-/_@?=&`.
pub const URL_SPECIAL_CHARS: &str = "!#$%^*(){}[]|\\<>,;:'\"~`";

pub const EMAIL_PHISHING_KEYWORDS: &[&str] = &[
    "verify",
    "account",
    "suspended",
    "update",
    "confirm",
    "click here",
    "urgent",
    "immediately",
    "login",
    "password",
    "credential",
    "bank",
    "social security",
    "credit card",
    "debit card",
    "winner",
    "prize",
    "claim",
    "limited time",
    "expire",
    "act now",
    "free",
    "congratulations",
    "selected",
    "lucky",
    "reward",
    "gift",
    "transfer",
    "millions",
    "inheritance",
    "lottery",
    "investment",
    "offer",
    "discount",
    "unsubscribe",
    "dear customer",
    "dear user",
    "valued member",
    "attention required",
    "unusual activity",
    "security alert",
    "phishing",
    "malware",
];

/// Urgency words that add to the heuristic email score.
pub const SCORED_URGENCY_WORDS: &[&str] = &["urgent", "immediately", "expire", "act now", "asap"];

/// Urgency words reported in explanations; a superset of the scored list.
pub const REPORTED_URGENCY_WORDS: &[&str] = &[
    "urgent",
    "immediately",
    "expire",
    "act now",
    "limited",
    "asap",
];

pub const SCORED_GREETINGS: &[&str] = &["dear customer", "dear user"];

pub const REPORTED_GREETINGS: &[&str] = &["dear customer", "dear user", "valued member"];

/// Entries of `list` that occur in `text_lower`, in list order.
pub fn matches_in<'a>(text_lower: &str, list: &[&'a str]) -> Vec<&'a str> {
    list.iter()
        .copied()
        .filter(|kw| text_lower.contains(kw))
        .collect()
}

pub fn has_suspicious_tld(url_lower: &str) -> bool {
    SUSPICIOUS_TLDS
        .iter()
        .any(|tld| url_lower.ends_with(tld) || url_lower.contains(&format!("{}/", tld)))
}
