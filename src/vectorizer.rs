use crate::features::SparseVector;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Number of top-weighted terms kept for explanations.
pub const TOP_TERM_LIMIT: usize = 8;

lazy_static! {
    static ref TOKEN_PATTERN: Regex = Regex::new(r"\b\w\w+\b").unwrap();
}

/// Text → sparse vector over a vocabulary fixed at training time.
pub trait TextVectorizer: Send + Sync {
    fn transform(&self, normalized: &str) -> SparseVector;
    fn term_name(&self, index: usize) -> Option<&str>;
    fn vocabulary_size(&self) -> usize;
}

/// Vocabulary terms with non-zero weight, heaviest first, at most `limit`.
/// Equal weights are ordered by term name so the result is stable.
pub fn top_terms(
    vectorizer: &dyn TextVectorizer,
    vector: &SparseVector,
    limit: usize,
) -> Vec<String> {
    let mut weighted: Vec<(&str, f64)> = vector
        .entries()
        .iter()
        .filter(|(_, weight)| *weight > 0.0)
        .filter_map(|(idx, weight)| vectorizer.term_name(*idx).map(|term| (term, *weight)))
        .collect();

    weighted.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    weighted
        .into_iter()
        .take(limit)
        .map(|(term, _)| term.to_string())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// On-disk form of a fitted TF-IDF vectorizer.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TfidfArtifact {
    pub vocabulary: HashMap<String, usize>,
    pub idf: Vec<f64>,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,
    #[serde(default)]
    pub stop_words: Vec<String>,
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    terms: Vec<String>,
    idf: Vec<f64>,
    ngram_range: (usize, usize),
    sublinear_tf: bool,
    norm: Option<Norm>,
    stop_words: HashSet<String>,
}

impl TfidfVectorizer {
    /// Validate a deserialized artifact and build the reverse term index.
    pub fn from_artifact(artifact: TfidfArtifact) -> Result<Self, String> {
        let size = artifact.vocabulary.len();
        if artifact.idf.len() != size {
            return Err(format!(
                "idf has {} entries but vocabulary has {} terms",
                artifact.idf.len(),
                size
            ));
        }

        let (min_n, max_n) = artifact.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(format!("invalid ngram_range ({}, {})", min_n, max_n));
        }

        let mut terms = vec![String::new(); size];
        for (term, &idx) in &artifact.vocabulary {
            match terms.get_mut(idx) {
                Some(slot) if slot.is_empty() => *slot = term.clone(),
                Some(_) => return Err(format!("vocabulary index {} is assigned twice", idx)),
                None => return Err(format!("vocabulary index {} out of range", idx)),
            }
        }

        Ok(Self {
            vocabulary: artifact.vocabulary,
            terms,
            idf: artifact.idf,
            ngram_range: artifact.ngram_range,
            sublinear_tf: artifact.sublinear_tf,
            norm: artifact.norm,
            stop_words: artifact.stop_words.into_iter().collect(),
        })
    }

    fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str> {
        TOKEN_PATTERN
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|token| !self.stop_words.contains(*token))
            .collect()
    }

    fn ngrams(&self, tokens: &[&str]) -> Vec<String> {
        let (min_n, max_n) = self.ngram_range;
        let mut grams = Vec::new();

        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            for window in tokens.windows(n) {
                grams.push(window.join(" "));
            }
        }

        grams
    }
}

impl TextVectorizer for TfidfVectorizer {
    fn transform(&self, normalized: &str) -> SparseVector {
        let tokens = self.tokenize(normalized);

        // ordered by index so the norm sums in the same order every call
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for gram in self.ngrams(&tokens) {
            if let Some(&idx) = self.vocabulary.get(&gram) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(idx, tf)| {
                let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
                (idx, tf * self.idf[idx])
            })
            .collect();

        let scale = match self.norm {
            Some(Norm::L2) => entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
            Some(Norm::L1) => entries.iter().map(|(_, v)| v.abs()).sum::<f64>(),
            None => 1.0,
        };
        if scale > 0.0 {
            for (_, v) in entries.iter_mut() {
                *v /= scale;
            }
        }

        SparseVector::new(self.terms.len(), entries)
    }

    fn term_name(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(|t| t.as_str())
    }

    fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vectorizer(ngram_range: (usize, usize), sublinear_tf: bool) -> TfidfVectorizer {
        let vocabulary: HashMap<String, usize> = [
            ("verify", 0),
            ("account", 1),
            ("verify account", 2),
            ("meeting", 3),
            ("urltoken", 4),
        ]
        .into_iter()
        .map(|(t, i)| (t.to_string(), i))
        .collect();

        TfidfVectorizer::from_artifact(TfidfArtifact {
            vocabulary,
            idf: vec![2.0, 1.5, 3.0, 1.0, 1.2],
            ngram_range,
            sublinear_tf,
            norm: Some(Norm::L2),
            stop_words: vec!["your".to_string()],
        })
        .unwrap()
    }

    #[test]
    fn test_transform_is_l2_normalized() {
        let v = vectorizer((1, 2), false);
        let vector = v.transform("verify your account now");

        let norm: f64 = vector.entries().iter().map(|(_, w)| w * w).sum();
        assert!((norm - 1.0).abs() < 1e-9);
        // stop word removal joins "verify" and "account" into a bigram
        assert!(vector.get(2) > 0.0);
        assert_eq!(vector.get(3), 0.0);
    }

    #[test]
    fn test_unknown_terms_contribute_nothing() {
        let v = vectorizer((1, 1), false);
        let vector = v.transform("completely unrelated words");
        assert!(vector.is_empty());
        assert_eq!(vector.dimension(), 5);
    }

    #[test]
    fn test_sublinear_tf_dampens_repeats() {
        let plain = vectorizer((1, 1), false).transform("verify verify verify account");
        let sublinear = vectorizer((1, 1), true).transform("verify verify verify account");
        assert!(sublinear.get(0) < plain.get(0));
    }

    #[test]
    fn test_top_terms_ranked_by_weight() {
        let v = vectorizer((1, 2), false);
        let vector = v.transform("verify account urltoken");
        let top = top_terms(&v, &vector, TOP_TERM_LIMIT);

        assert_eq!(top, vec!["verify account", "verify", "account", "urltoken"]);
        assert_eq!(top_terms(&v, &vector, 2).len(), 2);
    }

    #[test]
    fn test_transform_is_bit_identical_across_calls() {
        let vocabulary: HashMap<String, usize> =
            (0..200).map(|i| (format!("term{}", i), i)).collect();
        let idf: Vec<f64> = (0..200).map(|i| 1.0 + f64::from(i) / 7.0).collect();
        let text: Vec<String> = (0..200).map(|i| format!("term{}", (i * 37) % 200)).collect();
        let text = text.join(" ");

        let bits = |v: &SparseVector| -> Vec<(usize, u64)> {
            v.entries().iter().map(|(i, w)| (*i, w.to_bits())).collect()
        };

        let mut expected = None;
        for _ in 0..50 {
            // a fresh instance each round gets fresh hasher seeds
            let v = TfidfVectorizer::from_artifact(TfidfArtifact {
                vocabulary: vocabulary.clone(),
                idf: idf.clone(),
                ngram_range: (1, 1),
                sublinear_tf: true,
                norm: Some(Norm::L2),
                stop_words: vec![],
            })
            .unwrap();
            let current = bits(&v.transform(&text));
            match &expected {
                None => expected = Some(current),
                Some(first) => assert_eq!(first, &current),
            }
        }
    }

    #[test]
    fn test_rejects_mismatched_idf() {
        let artifact = TfidfArtifact {
            vocabulary: [("a".to_string(), 0)].into_iter().collect(),
            idf: vec![],
            ngram_range: (1, 1),
            sublinear_tf: false,
            norm: None,
            stop_words: vec![],
        };
        assert!(TfidfVectorizer::from_artifact(artifact).is_err());
    }
}
