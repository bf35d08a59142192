use super::{argmax, Classifier};
use crate::features::FeatureVector;
use serde::{Deserialize, Serialize};

/// Binary logistic regression; `coefficients` weight the phishing class.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogisticModel {
    pub n_features: usize,
    pub coefficients: Vec<f64>,
    #[serde(default)]
    pub intercept: f64,
}

impl Classifier for LogisticModel {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, features: &FeatureVector) -> usize {
        argmax(&self.predict_proba(features))
    }

    fn predict_proba(&self, features: &FeatureVector) -> Vec<f64> {
        let z = features.dot(&self.coefficients) + self.intercept;
        let p = 1.0 / (1.0 + (-z).exp());
        vec![1.0 - p, p]
    }
}

impl LogisticModel {
    pub fn validate(&self) -> Result<(), String> {
        if self.coefficients.len() != self.n_features {
            return Err(format!(
                "{} coefficients for {} features",
                self.coefficients.len(),
                self.n_features
            ));
        }
        if self.coefficients.iter().any(|w| !w.is_finite()) || !self.intercept.is_finite() {
            return Err("non-finite weight".to_string());
        }
        Ok(())
    }
}
