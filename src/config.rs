use crate::artifacts::{
    ArtifactStore, EMAIL_MODEL_FILE, EMAIL_VECTORIZER_FILE, URL_MODEL_FILE,
};
use crate::engine::RawInput;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhishGuardConfig {
    #[serde(default)]
    pub models: ModelsConfig,
    pub logging: Option<LoggingConfig>,
    #[serde(default)]
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    #[serde(default = "default_model_dir")]
    pub dir: String,
    #[serde(default = "default_url_model")]
    pub url_model: String,
    #[serde(default = "default_email_model")]
    pub email_model: String,
    #[serde(default = "default_email_vectorizer")]
    pub email_vectorizer: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            dir: default_model_dir(),
            url_model: default_url_model(),
            email_model: default_email_model(),
            email_vectorizer: default_email_vectorizer(),
        }
    }
}

fn default_model_dir() -> String {
    "models".to_string()
}

fn default_url_model() -> String {
    URL_MODEL_FILE.to_string()
}

fn default_email_model() -> String {
    EMAIL_MODEL_FILE.to_string()
}

fn default_email_vectorizer() -> String {
    EMAIL_VECTORIZER_FILE.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Input size bounds enforced at the boundary, before the engine sees input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_max_url_length")]
    pub max_url_length: usize,
    #[serde(default = "default_max_body_length")]
    pub max_body_length: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_url_length: default_max_url_length(),
            max_body_length: default_max_body_length(),
        }
    }
}

fn default_max_url_length() -> usize {
    2000
}

fn default_max_body_length() -> usize {
    50000
}

impl LimitsConfig {
    pub fn check(&self, input: &RawInput) -> anyhow::Result<()> {
        match input {
            RawInput::Url(url) => {
                let len = url.chars().count();
                if len == 0 || len > self.max_url_length {
                    anyhow::bail!(
                        "URL must be 1-{} characters, got {}",
                        self.max_url_length,
                        len
                    );
                }
            }
            RawInput::Email { body, .. } => {
                let len = body.chars().count();
                if len == 0 || len > self.max_body_length {
                    anyhow::bail!(
                        "Email body must be 1-{} characters, got {}",
                        self.max_body_length,
                        len
                    );
                }
            }
        }
        Ok(())
    }
}

impl PhishGuardConfig {
    /// Parse a TOML or YAML file, chosen by extension (TOML otherwise).
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            _ => toml::from_str(&content)?,
        };
        Ok(config)
    }

    /// Like [`load_from_file`](Self::load_from_file), but a missing file
    /// yields the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!(
                "Config file {} not found, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    pub fn default_path() -> &'static str {
        "phishguard.toml"
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let content = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::to_string(self)?,
            _ => toml::to_string_pretty(self)?,
        };
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn artifact_store(&self) -> ArtifactStore {
        ArtifactStore::from_config(&self.models)
    }

    pub fn log_level(&self) -> Option<log::LevelFilter> {
        self.logging
            .as_ref()
            .and_then(|logging| logging.level.parse().ok())
    }
}
