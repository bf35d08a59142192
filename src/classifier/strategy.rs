use super::{classify_with, Classification, Classifier};
use crate::features::{EmailSignals, FeatureVector, UrlFeatures};
use crate::heuristic;
use crate::vectorizer::{top_terms, TextVectorizer, TOP_TERM_LIMIT};
use std::fmt;

/// How URLs are classified; fixed when the engine is built.
pub enum UrlStrategy {
    Trained(Box<dyn Classifier>),
    Heuristic,
}

impl UrlStrategy {
    pub fn classify(&self, features: &UrlFeatures) -> Classification {
        match self {
            UrlStrategy::Trained(classifier) => {
                classify_with(classifier.as_ref(), &features.to_vector())
            }
            UrlStrategy::Heuristic => heuristic::classify_url(features),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            UrlStrategy::Trained(_) => "trained",
            UrlStrategy::Heuristic => "heuristic",
        }
    }
}

impl fmt::Debug for UrlStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Email classification together with the vectorizer terms that carried
/// the most weight. `top_terms` is empty on the heuristic path.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailClassification {
    pub classification: Classification,
    pub top_terms: Vec<String>,
}

/// How emails are classified; the trained path needs both artifacts.
pub enum EmailStrategy {
    Trained {
        vectorizer: Box<dyn TextVectorizer>,
        classifier: Box<dyn Classifier>,
    },
    Heuristic,
}

impl EmailStrategy {
    pub fn classify(&self, normalized: &str, signals: &EmailSignals) -> EmailClassification {
        match self {
            EmailStrategy::Trained {
                vectorizer,
                classifier,
            } => {
                let vector = vectorizer.transform(normalized);
                let top_terms = top_terms(vectorizer.as_ref(), &vector, TOP_TERM_LIMIT);
                let classification =
                    classify_with(classifier.as_ref(), &FeatureVector::Sparse(vector));

                EmailClassification {
                    classification,
                    top_terms,
                }
            }
            EmailStrategy::Heuristic => EmailClassification {
                classification: heuristic::classify_email(signals),
                top_terms: Vec::new(),
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EmailStrategy::Trained { .. } => "trained",
            EmailStrategy::Heuristic => "heuristic",
        }
    }
}

impl fmt::Debug for EmailStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{Label, LogisticModel};
    use crate::features::{extract_url_features, SparseVector, URL_FEATURE_COUNT};

    struct KeywordVectorizer;

    impl TextVectorizer for KeywordVectorizer {
        fn transform(&self, normalized: &str) -> SparseVector {
            let entries = ["verify", "invoice"]
                .iter()
                .enumerate()
                .filter(|(_, term)| normalized.contains(*term))
                .map(|(idx, _)| (idx, 1.0))
                .collect();
            SparseVector::new(2, entries)
        }

        fn term_name(&self, index: usize) -> Option<&str> {
            ["verify", "invoice"].get(index).copied()
        }

        fn vocabulary_size(&self) -> usize {
            2
        }
    }

    #[test]
    fn test_trained_url_strategy_ignores_heuristic_rules() {
        // every URL scores as safe with certainty
        let model = LogisticModel {
            n_features: URL_FEATURE_COUNT,
            coefficients: vec![0.0; URL_FEATURE_COUNT],
            intercept: -50.0,
        };
        let strategy = UrlStrategy::Trained(Box::new(model));
        let features = extract_url_features("http://192.0.2.1/login/verify");

        let result = strategy.classify(&features);
        assert_eq!(result.label, Label::Safe);
        assert_eq!(result.confidence, 100.0);
        assert_eq!(strategy.name(), "trained");
    }

    #[test]
    fn test_trained_email_strategy_reports_terms() {
        let model = LogisticModel {
            n_features: 2,
            coefficients: vec![3.0, -1.0],
            intercept: 0.0,
        };
        let strategy = EmailStrategy::Trained {
            vectorizer: Box::new(KeywordVectorizer),
            classifier: Box::new(model),
        };

        let signals = EmailSignals::default();
        let result = strategy.classify("please verify now", &signals);
        assert_eq!(result.classification.label, Label::Phishing);
        assert_eq!(result.top_terms, vec!["verify"]);
    }

    #[test]
    fn test_heuristic_email_strategy_has_no_terms() {
        let signals = EmailSignals::collect("Urgent", "verify your account immediately");
        let result = EmailStrategy::Heuristic.classify("urgent verify your account", &signals);
        assert!(result.top_terms.is_empty());
        assert_eq!(EmailStrategy::Heuristic.name(), "heuristic");
    }
}
