pub mod email_signals;
pub mod keywords;
pub mod url_features;

pub use email_signals::EmailSignals;
pub use url_features::{extract_url_features, UrlFeatures, URL_FEATURE_COUNT};

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Dotted-quad lookalike, not validated as a real IPv4 address.
    pub static ref IPV4_PATTERN: Regex =
        Regex::new(r"\b\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}\b").unwrap();
    pub static ref RAW_URL_PATTERN: Regex = Regex::new(r"http\S+").unwrap();
    pub static ref HTML_TAG_PATTERN: Regex = Regex::new(r"<[^>]+>").unwrap();
}

/// Numeric input handed to a classifier.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureVector {
    Dense(Vec<f64>),
    Sparse(SparseVector),
}

impl FeatureVector {
    pub fn dimension(&self) -> usize {
        match self {
            FeatureVector::Dense(values) => values.len(),
            FeatureVector::Sparse(sparse) => sparse.dimension(),
        }
    }

    /// Value at `index`; absent sparse entries and out-of-range indices read as 0.
    pub fn get(&self, index: usize) -> f64 {
        match self {
            FeatureVector::Dense(values) => values.get(index).copied().unwrap_or(0.0),
            FeatureVector::Sparse(sparse) => sparse.get(index),
        }
    }

    pub fn dot(&self, weights: &[f64]) -> f64 {
        match self {
            FeatureVector::Dense(values) => values
                .iter()
                .zip(weights.iter())
                .map(|(v, w)| v * w)
                .sum(),
            FeatureVector::Sparse(sparse) => sparse
                .entries()
                .iter()
                .filter_map(|(idx, v)| weights.get(*idx).map(|w| v * w))
                .sum(),
        }
    }
}

/// Sparse vector with entries kept sorted by index and free of zeros.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SparseVector {
    dimension: usize,
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn new(dimension: usize, mut entries: Vec<(usize, f64)>) -> Self {
        entries.retain(|(idx, v)| *idx < dimension && *v != 0.0);
        entries.sort_by_key(|(idx, _)| *idx);
        entries.dedup_by_key(|(idx, _)| *idx);
        Self { dimension, entries }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |(idx, _)| *idx)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_vector_lookup() {
        let sparse = SparseVector::new(10, vec![(7, 0.5), (2, 0.25), (4, 0.0), (12, 1.0)]);

        assert_eq!(sparse.entries(), &[(2, 0.25), (7, 0.5)]);
        assert_eq!(sparse.get(7), 0.5);
        assert_eq!(sparse.get(4), 0.0);
        assert_eq!(sparse.get(12), 0.0);
    }

    #[test]
    fn test_dot_product() {
        let weights = vec![1.0, 2.0, 3.0];

        let dense = FeatureVector::Dense(vec![1.0, 1.0, 1.0]);
        assert_eq!(dense.dot(&weights), 6.0);

        let sparse = FeatureVector::Sparse(SparseVector::new(3, vec![(2, 2.0)]));
        assert_eq!(sparse.dot(&weights), 6.0);
        assert_eq!(sparse.dimension(), 3);
    }

    #[test]
    fn test_ipv4_pattern() {
        assert!(IPV4_PATTERN.is_match("http://192.0.2.1/login"));
        assert!(IPV4_PATTERN.is_match("10.0.0.1"));
        assert!(!IPV4_PATTERN.is_match("https://example.com/v1.2.3"));
    }
}
