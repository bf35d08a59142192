pub mod forest;
pub mod logistic;
pub mod strategy;

pub use forest::{DecisionTree, RandomForest, TreeNode};
pub use logistic::LogisticModel;
pub use strategy::{EmailClassification, EmailStrategy, UrlStrategy};

use crate::features::FeatureVector;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Class index the models use for phishing.
pub const PHISHING_CLASS: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Phishing,
    Safe,
}

impl Label {
    pub fn from_class(class: usize) -> Self {
        if class == PHISHING_CLASS {
            Label::Phishing
        } else {
            Label::Safe
        }
    }

    pub fn is_phishing(self) -> bool {
        self == Label::Phishing
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Phishing => write!(f, "Phishing"),
            Label::Safe => write!(f, "Safe"),
        }
    }
}

/// Label plus confidence in percent, rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub label: Label,
    pub confidence: f64,
}

impl Classification {
    pub fn new(label: Label, confidence: f64) -> Self {
        Self {
            label,
            confidence: round2(confidence.clamp(0.0, 100.0)),
        }
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Inference-time contract of a trained binary classifier.
pub trait Classifier: Send + Sync {
    fn n_features(&self) -> usize;
    fn predict(&self, features: &FeatureVector) -> usize;
    fn predict_proba(&self, features: &FeatureVector) -> Vec<f64>;
}

/// Run a trained classifier: the predicted class picks the label, the
/// largest class probability becomes the confidence.
pub fn classify_with(classifier: &dyn Classifier, features: &FeatureVector) -> Classification {
    let class = classifier.predict(features);
    let proba = classifier.predict_proba(features);
    let max_proba = proba.iter().copied().fold(0.0_f64, f64::max);

    Classification::new(Label::from_class(class), max_proba * 100.0)
}

/// Any model kind that can be stored as a JSON artifact.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    RandomForest(RandomForest),
    Logistic(LogisticModel),
}

impl ClassifierArtifact {
    /// Structural checks against the feature width the caller will supply.
    pub fn validate(&self, expected_features: usize) -> Result<(), String> {
        if self.n_features() != expected_features {
            return Err(format!(
                "model expects {} features but {} are supplied",
                self.n_features(),
                expected_features
            ));
        }

        match self {
            ClassifierArtifact::RandomForest(forest) => forest.validate(),
            ClassifierArtifact::Logistic(model) => model.validate(),
        }
    }
}

impl Classifier for ClassifierArtifact {
    fn n_features(&self) -> usize {
        match self {
            ClassifierArtifact::RandomForest(forest) => forest.n_features(),
            ClassifierArtifact::Logistic(model) => model.n_features(),
        }
    }

    fn predict(&self, features: &FeatureVector) -> usize {
        match self {
            ClassifierArtifact::RandomForest(forest) => forest.predict(features),
            ClassifierArtifact::Logistic(model) => model.predict(features),
        }
    }

    fn predict_proba(&self, features: &FeatureVector) -> Vec<f64> {
        match self {
            ClassifierArtifact::RandomForest(forest) => forest.predict_proba(features),
            ClassifierArtifact::Logistic(model) => model.predict_proba(features),
        }
    }
}

/// Index of the largest value; the lowest index wins ties.
pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (idx, value) in values.iter().enumerate() {
        if *value > values[best] {
            best = idx;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedClassifier {
        class: usize,
        proba: Vec<f64>,
    }

    impl Classifier for FixedClassifier {
        fn n_features(&self) -> usize {
            1
        }

        fn predict(&self, _features: &FeatureVector) -> usize {
            self.class
        }

        fn predict_proba(&self, _features: &FeatureVector) -> Vec<f64> {
            self.proba.clone()
        }
    }

    #[test]
    fn test_classify_with_uses_max_probability() {
        let classifier = FixedClassifier {
            class: 1,
            proba: vec![0.1234, 0.8766],
        };
        let result = classify_with(&classifier, &FeatureVector::Dense(vec![0.0]));

        assert_eq!(result.label, Label::Phishing);
        assert_eq!(result.confidence, 87.66);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(98.0), 98.0);
        assert_eq!(round2(86.399999), 86.4);
        assert_eq!(round2(55.556), 55.56);
    }

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(Classification::new(Label::Safe, 120.0).confidence, 100.0);
        assert_eq!(Classification::new(Label::Safe, -3.0).confidence, 0.0);
    }

    #[test]
    fn test_label_serializes_as_name() {
        assert_eq!(serde_json::to_string(&Label::Phishing).unwrap(), "\"Phishing\"");
        assert_eq!(Label::from_class(0), Label::Safe);
        assert_eq!(Label::Safe.to_string(), "Safe");
    }

    #[test]
    fn test_argmax_prefers_first_on_tie() {
        assert_eq!(argmax(&[0.5, 0.5]), 0);
        assert_eq!(argmax(&[0.2, 0.8]), 1);
    }
}
