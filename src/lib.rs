pub mod artifacts;
pub mod batch;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod explain;
pub mod features;
pub mod heuristic;
pub mod normalization;
pub mod risk;
pub mod vectorizer;

pub use artifacts::{ArtifactError, ArtifactStore};
pub use config::PhishGuardConfig;
pub use engine::{DetectionEngine, Label, PredictionResult};
pub use risk::RiskLevel;
