use super::keywords::{has_suspicious_tld, URL_SPECIAL_CHARS, URL_SUSPICIOUS_KEYWORDS};
use super::{FeatureVector, IPV4_PATTERN};
use lazy_static::lazy_static;
use regex::Regex;
use std::net::Ipv6Addr;

pub const URL_FEATURE_COUNT: usize = 18;

/// Column names in the order the URL model was trained on.
pub const URL_FEATURE_NAMES: [&str; URL_FEATURE_COUNT] = [
    "length",
    "dot_count",
    "hyphen_count",
    "underscore_count",
    "slash_count",
    "at_count",
    "question_count",
    "equals_count",
    "ampersand_count",
    "digit_count",
    "is_https",
    "has_ipv4",
    "keyword_hits",
    "authority_length",
    "subdomain_count",
    "suspicious_tld",
    "path_length",
    "special_char_count",
];

const IDX_LENGTH: usize = 0;
const IDX_AT: usize = 5;
const IDX_HTTPS: usize = 10;
const IDX_IPV4: usize = 11;
const IDX_KEYWORDS: usize = 12;
const IDX_TLD: usize = 15;

/// Fixed-order numeric description of a URL.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlFeatures {
    values: [f64; URL_FEATURE_COUNT],
}

impl UrlFeatures {
    pub fn values(&self) -> &[f64; URL_FEATURE_COUNT] {
        &self.values
    }

    pub fn to_vector(&self) -> FeatureVector {
        FeatureVector::Dense(self.values.to_vec())
    }

    pub fn length(&self) -> usize {
        self.values[IDX_LENGTH] as usize
    }

    pub fn is_https(&self) -> bool {
        self.values[IDX_HTTPS] > 0.0
    }

    pub fn has_ipv4(&self) -> bool {
        self.values[IDX_IPV4] > 0.0
    }

    pub fn keyword_hits(&self) -> usize {
        self.values[IDX_KEYWORDS] as usize
    }

    pub fn has_at_sign(&self) -> bool {
        self.values[IDX_AT] > 0.0
    }

    pub fn has_suspicious_tld(&self) -> bool {
        self.values[IDX_TLD] > 0.0
    }

    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        URL_FEATURE_NAMES.iter().copied().zip(self.values.iter().copied())
    }
}

/// Extract the 18 URL features. Never fails: components that cannot be
/// split contribute zeros.
pub fn extract_url_features(url: &str) -> UrlFeatures {
    let url_lower = url.to_lowercase();
    let count = |ch: char| url.matches(ch).count() as f64;

    let (authority_len, subdomains, path_len) = match split_components(url) {
        Some(parts) => (
            parts.authority.chars().count() as f64,
            parts.authority.split('.').count() as f64 - 2.0,
            parts.path.chars().count() as f64,
        ),
        None => (0.0, 0.0, 0.0),
    };

    let keyword_hits = URL_SUSPICIOUS_KEYWORDS
        .iter()
        .filter(|kw| url_lower.contains(*kw))
        .count();

    let values = [
        url.chars().count() as f64,
        count('.'),
        count('-'),
        count('_'),
        count('/'),
        count('@'),
        count('?'),
        count('='),
        count('&'),
        url.chars().filter(|c| is_digit_char(*c)).count() as f64,
        flag(url.starts_with("https://")),
        flag(IPV4_PATTERN.is_match(url)),
        keyword_hits as f64,
        authority_len,
        subdomains,
        flag(has_suspicious_tld(&url_lower)),
        path_len,
        url.chars().filter(|c| URL_SPECIAL_CHARS.contains(*c)).count() as f64,
    ];

    log::debug!("URL features for {}: {:?}", url, values);

    UrlFeatures { values }
}

fn flag(condition: bool) -> f64 {
    if condition {
        1.0
    } else {
        0.0
    }
}

/// Decimal digits of any script plus single-digit forms such as
/// superscripts and circled digits. Fractions, letter numerals and
/// multi-digit enclosed numbers are not digits.
fn is_digit_char(c: char) -> bool {
    if c.is_ascii_digit() {
        return true;
    }
    if !c.is_numeric() {
        return false;
    }

    !matches!(c,
        '\u{00BC}'..='\u{00BE}'
        | '\u{16EE}'..='\u{16F0}'
        | '\u{2150}'..='\u{2189}'
        | '\u{2469}'..='\u{2473}'
        | '\u{247D}'..='\u{2487}'
        | '\u{2491}'..='\u{249B}'
        | '\u{24EB}'..='\u{24F4}'
        | '\u{24FE}'
        | '\u{277F}'
        | '\u{2789}'
        | '\u{2793}'
        | '\u{3007}'
        | '\u{3021}'..='\u{3029}'
        | '\u{3038}'..='\u{303A}'
        | '\u{3251}'..='\u{325F}'
        | '\u{32B1}'..='\u{32BF}')
}

lazy_static! {
    /// Generic URI split into scheme, authority and path; query and
    /// fragment are left unmatched.
    static ref URI_PARTS: Regex =
        Regex::new(r"^(?:([A-Za-z][A-Za-z0-9+.\-]*):)?(?://([^/?#]*))?([^?#]*)").unwrap();
    static ref IP_FUTURE: Regex = Regex::new(r"^v[a-fA-F0-9]+\..+$").unwrap();
}

/// Schemes whose last path segment may carry `;params`.
const PARAM_SCHEMES: &[&str] = &[
    "", "ftp", "hdl", "prospero", "http", "imap", "https", "shttp", "rtsp", "rtspu", "sip",
    "sips", "mms", "sftp", "tel",
];

/// Raw authority and path exactly as written in the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
struct UrlParts {
    authority: String,
    path: String,
}

/// Split `url` into its raw components, assuming `http://` when it does not
/// start with `http`. Nothing is normalized: default ports, dot segments,
/// spaces and hex hosts are kept as written. Tabs and line breaks are
/// dropped first. `None` when the authority has unbalanced brackets or a
/// bracketed host that is not an IPv6 or IPvFuture literal.
fn split_components(url: &str) -> Option<UrlParts> {
    let candidate: String = if url.starts_with("http") {
        url.to_string()
    } else {
        format!("http://{}", url)
    };
    let candidate: String = candidate
        .chars()
        .filter(|c| !matches!(*c, '\t' | '\r' | '\n'))
        .collect();

    let caps = URI_PARTS.captures(&candidate)?;
    let scheme = caps
        .get(1)
        .map(|m| m.as_str().to_ascii_lowercase())
        .unwrap_or_default();
    let authority = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
    let mut path = caps.get(3).map(|m| m.as_str()).unwrap_or_default();

    if let Err(reason) = check_authority(authority) {
        log::debug!("URL split failed for {}: {}", url, reason);
        return None;
    }

    if PARAM_SCHEMES.contains(&scheme.as_str()) {
        path = strip_params(path);
    }

    Some(UrlParts {
        authority: authority.to_string(),
        path: path.to_string(),
    })
}

fn check_authority(authority: &str) -> Result<(), &'static str> {
    match (authority.find('['), authority.contains(']')) {
        (None, false) => Ok(()),
        (Some(open), true) => {
            let host = authority[open + 1..].split(']').next().unwrap_or_default();
            if is_bracketed_host(host) {
                Ok(())
            } else {
                Err("invalid bracketed host")
            }
        }
        _ => Err("unbalanced brackets in authority"),
    }
}

fn is_bracketed_host(host: &str) -> bool {
    if host.starts_with('v') {
        return IP_FUTURE.is_match(host);
    }

    let address = match host.split_once('%') {
        Some((address, scope)) if !scope.is_empty() && !scope.contains('%') => address,
        Some(_) => return false,
        None => host,
    };
    address.parse::<Ipv6Addr>().is_ok()
}

/// Drop `;params` from the last path segment.
fn strip_params(path: &str) -> &str {
    if !path.contains(';') {
        return path;
    }
    let segment_start = path.rfind('/').unwrap_or(0);
    match path[segment_start..].find(';') {
        Some(offset) => &path[..segment_start + offset],
        None => path,
    }
}
