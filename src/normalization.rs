use regex::Regex;

pub const URL_TOKEN: &str = "urltoken";
pub const EMAIL_TOKEN: &str = "emailtoken";
pub const NUMBER_TOKEN: &str = "numtoken";

/// Canonicalizes subject and body into the lowercase token stream the email
/// vectorizer was fitted on.
#[derive(Debug)]
pub struct EmailNormalizer {
    html_tag_regex: Regex,
    url_regex: Regex,
    email_regex: Regex,
    digit_regex: Regex,
    punctuation_regex: Regex,
    whitespace_regex: Regex,
}

impl Default for EmailNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl EmailNormalizer {
    pub fn new() -> Self {
        Self {
            html_tag_regex: Regex::new(r"<[^>]+>").unwrap(),
            url_regex: Regex::new(r"http\S+").unwrap(),
            email_regex: Regex::new(r"\S+@\S+").unwrap(),
            digit_regex: Regex::new(r"\d+").unwrap(),
            punctuation_regex: Regex::new(r"[^\w\s]").unwrap(),
            whitespace_regex: Regex::new(r"\s+").unwrap(),
        }
    }

    /// Replacement order matters: URLs are tokenized before addresses so
    /// `http://user@host` becomes a single URL token.
    pub fn normalize(&self, subject: &str, body: &str) -> String {
        let text = format!("{} {}", subject, body).to_lowercase();
        let text = self.html_tag_regex.replace_all(&text, " ");
        let text = self
            .url_regex
            .replace_all(&text, format!(" {} ", URL_TOKEN).as_str());
        let text = self
            .email_regex
            .replace_all(&text, format!(" {} ", EMAIL_TOKEN).as_str());
        let text = self
            .digit_regex
            .replace_all(&text, format!(" {} ", NUMBER_TOKEN).as_str());
        let text = self.punctuation_regex.replace_all(&text, " ");
        let text = self.whitespace_regex.replace_all(&text, " ");

        text.trim().to_string()
    }
}
