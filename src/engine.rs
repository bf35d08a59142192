use crate::artifacts::{ArtifactError, ArtifactStore};
use crate::classifier::{EmailStrategy, UrlStrategy};
use crate::config::PhishGuardConfig;
use crate::explain;
use crate::features::{extract_url_features, EmailSignals};
use crate::normalization::EmailNormalizer;
use crate::risk::{self, RiskLevel};
use serde::{Deserialize, Serialize};

pub use crate::classifier::Label;

/// Caller-supplied input for one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawInput {
    Url(String),
    Email {
        subject: Option<String>,
        body: String,
    },
}

impl RawInput {
    /// Split a saved message into subject and body. A leading `Subject:`
    /// line is taken as the subject; everything after it (or the whole text
    /// when there is none) is the body.
    pub fn email_from_text(text: &str) -> Self {
        let mut lines = text.splitn(2, '\n');
        let first = lines.next().unwrap_or_default();

        match first.split_once(':') {
            Some((name, value)) if name.trim().eq_ignore_ascii_case("subject") => {
                let rest = lines.next().unwrap_or_default();
                RawInput::Email {
                    subject: Some(value.trim().to_string()),
                    body: rest.trim_start_matches(&['\r', '\n'][..]).to_string(),
                }
            }
            _ => RawInput::Email {
                subject: None,
                body: text.to_string(),
            },
        }
    }
}

/// Final verdict for one input. Built fresh per call and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub prediction: Label,
    pub confidence: f64,
    pub risk_level: RiskLevel,
    pub reasons: Vec<String>,
}

/// Immutable inference engine; safe to share across threads.
#[derive(Debug)]
pub struct DetectionEngine {
    url_strategy: UrlStrategy,
    email_strategy: EmailStrategy,
    normalizer: EmailNormalizer,
}

impl DetectionEngine {
    pub fn new(url_strategy: UrlStrategy, email_strategy: EmailStrategy) -> Self {
        Self {
            url_strategy,
            email_strategy,
            normalizer: EmailNormalizer::new(),
        }
    }

    /// Engine that never consults a trained model.
    pub fn heuristic() -> Self {
        Self::new(UrlStrategy::Heuristic, EmailStrategy::Heuristic)
    }

    /// Pick each path's strategy from what the store holds. Missing
    /// artifacts select the heuristic; any other load problem is returned.
    pub fn from_store(store: &ArtifactStore) -> Result<Self, ArtifactError> {
        let url_strategy = match store.load_url_classifier()? {
            Some(model) => UrlStrategy::Trained(Box::new(model)),
            None => {
                log::info!(
                    "No URL model at {}, using heuristic scoring",
                    store.url_model_path().display()
                );
                UrlStrategy::Heuristic
            }
        };

        let email_strategy = match store.load_email_artifacts()? {
            Some(artifacts) => EmailStrategy::Trained {
                vectorizer: Box::new(artifacts.vectorizer),
                classifier: Box::new(artifacts.classifier),
            },
            None => {
                log::info!(
                    "No email model pair at {} / {}, using heuristic scoring",
                    store.email_model_path().display(),
                    store.email_vectorizer_path().display()
                );
                EmailStrategy::Heuristic
            }
        };

        Ok(Self::new(url_strategy, email_strategy))
    }

    pub fn from_config(config: &PhishGuardConfig) -> Result<Self, ArtifactError> {
        Self::from_store(&config.artifact_store())
    }

    pub fn url_strategy(&self) -> &UrlStrategy {
        &self.url_strategy
    }

    pub fn email_strategy(&self) -> &EmailStrategy {
        &self.email_strategy
    }

    pub fn predict_url(&self, url: &str) -> PredictionResult {
        let features = extract_url_features(url);
        let classification = self.url_strategy.classify(&features);
        let risk_level = risk::grade_url(classification.label, classification.confidence);
        let reasons = explain::explain_url(url, &features, classification.label);

        log::debug!(
            "URL {} -> {} {:.2}% ({}, {} strategy)",
            url,
            classification.label,
            classification.confidence,
            risk_level,
            self.url_strategy.name()
        );

        PredictionResult {
            prediction: classification.label,
            confidence: classification.confidence,
            risk_level,
            reasons,
        }
    }

    pub fn predict_email(&self, subject: Option<&str>, body: &str) -> PredictionResult {
        let subject = subject.unwrap_or_default();
        let normalized = self.normalizer.normalize(subject, body);
        let signals = EmailSignals::collect(subject, body);

        let result = self.email_strategy.classify(&normalized, &signals);
        let classification = result.classification;
        let risk_level = risk::grade_email(classification.label, classification.confidence);
        let reasons = explain::explain_email(&signals, &result.top_terms, classification.label);

        log::debug!(
            "Email {:?} -> {} {:.2}% ({}, {} strategy)",
            subject,
            classification.label,
            classification.confidence,
            risk_level,
            self.email_strategy.name()
        );

        PredictionResult {
            prediction: classification.label,
            confidence: classification.confidence,
            risk_level,
            reasons,
        }
    }

    pub fn scan(&self, input: &RawInput) -> PredictionResult {
        match input {
            RawInput::Url(url) => self.predict_url(url),
            RawInput::Email { subject, body } => self.predict_email(subject.as_deref(), body),
        }
    }
}
