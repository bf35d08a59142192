//! Locating and loading trained artifacts.
//!
//! A missing file is an expected condition and is reported as `Ok(None)`;
//! anything else that prevents a present artifact from being used is an
//! [`ArtifactError`].

use crate::classifier::ClassifierArtifact;
use crate::config::ModelsConfig;
use crate::features::URL_FEATURE_COUNT;
use crate::vectorizer::{TextVectorizer, TfidfArtifact, TfidfVectorizer};
use serde::de::DeserializeOwned;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const URL_MODEL_FILE: &str = "url_model.json";
pub const EMAIL_MODEL_FILE: &str = "email_model.json";
pub const EMAIL_VECTORIZER_FILE: &str = "email_vectorizer.json";

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("cannot read artifact {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("artifact {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("artifact {} is unusable: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },
}

/// Fitted vectorizer and classifier for the email path.
pub struct EmailArtifacts {
    pub vectorizer: TfidfVectorizer,
    pub classifier: ClassifierArtifact,
}

/// Well-known artifact locations under one model directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    url_model: PathBuf,
    email_model: PathBuf,
    email_vectorizer: PathBuf,
}

impl ArtifactStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            url_model: dir.join(URL_MODEL_FILE),
            email_model: dir.join(EMAIL_MODEL_FILE),
            email_vectorizer: dir.join(EMAIL_VECTORIZER_FILE),
        }
    }

    pub fn from_config(config: &ModelsConfig) -> Self {
        let dir = Path::new(&config.dir);
        Self {
            url_model: dir.join(&config.url_model),
            email_model: dir.join(&config.email_model),
            email_vectorizer: dir.join(&config.email_vectorizer),
        }
    }

    pub fn url_model_path(&self) -> &Path {
        &self.url_model
    }

    pub fn email_model_path(&self) -> &Path {
        &self.email_model
    }

    pub fn email_vectorizer_path(&self) -> &Path {
        &self.email_vectorizer
    }

    pub fn load_url_classifier(&self) -> Result<Option<ClassifierArtifact>, ArtifactError> {
        let Some(model) = read_json::<ClassifierArtifact>(&self.url_model)? else {
            return Ok(None);
        };

        model
            .validate(URL_FEATURE_COUNT)
            .map_err(|reason| invalid(&self.url_model, reason))?;

        log::info!("Loaded URL classifier from {}", self.url_model.display());
        Ok(Some(model))
    }

    /// Both email artifacts, or `None` when either file is absent. Each file
    /// that is present is still parsed and validated, so a corrupt half is
    /// reported even when its partner is missing.
    pub fn load_email_artifacts(&self) -> Result<Option<EmailArtifacts>, ArtifactError> {
        let vectorizer = match read_json::<TfidfArtifact>(&self.email_vectorizer)? {
            Some(artifact) => Some(
                TfidfVectorizer::from_artifact(artifact)
                    .map_err(|reason| invalid(&self.email_vectorizer, reason))?,
            ),
            None => None,
        };
        let classifier = read_json::<ClassifierArtifact>(&self.email_model)?;

        match (vectorizer, classifier) {
            (Some(vectorizer), Some(classifier)) => {
                classifier
                    .validate(vectorizer.vocabulary_size())
                    .map_err(|reason| invalid(&self.email_model, reason))?;

                log::info!(
                    "Loaded email classifier from {} ({} terms)",
                    self.email_model.display(),
                    vectorizer.vocabulary_size()
                );
                Ok(Some(EmailArtifacts {
                    vectorizer,
                    classifier,
                }))
            }
            (Some(_), None) => {
                log::warn!(
                    "Email vectorizer present but {} is missing",
                    self.email_model.display()
                );
                Ok(None)
            }
            (None, Some(_)) => {
                log::warn!(
                    "Email classifier present but {} is missing",
                    self.email_vectorizer.display()
                );
                Ok(None)
            }
            (None, None) => Ok(None),
        }
    }
}

fn invalid(path: &Path, reason: String) -> ArtifactError {
    ArtifactError::Invalid {
        path: path.to_path_buf(),
        reason,
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, ArtifactError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("Artifact not found: {}", path.display());
            return Ok(None);
        }
        Err(e) => {
            return Err(ArtifactError::Unreadable {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| ArtifactError::Corrupt {
            path: path.to_path_buf(),
            source: e,
        })
}
