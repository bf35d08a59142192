use crate::classifier::Label;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}

/// URL grading: high confidence decides by label, the middle band is
/// always Medium, anything weaker is Low.
pub fn grade_url(label: Label, confidence: f64) -> RiskLevel {
    if confidence >= 80.0 {
        match label {
            Label::Phishing => RiskLevel::High,
            Label::Safe => RiskLevel::Low,
        }
    } else if confidence >= 60.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Email grading keeps its own thresholds per label; it is not the URL table.
pub fn grade_email(label: Label, confidence: f64) -> RiskLevel {
    match label {
        Label::Phishing if confidence >= 75.0 => RiskLevel::High,
        Label::Phishing => RiskLevel::Medium,
        Label::Safe if confidence >= 70.0 => RiskLevel::Low,
        Label::Safe => RiskLevel::Medium,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_grading_table() {
        let cases = [
            (Label::Phishing, 98.0, RiskLevel::High),
            (Label::Phishing, 80.0, RiskLevel::High),
            (Label::Safe, 95.0, RiskLevel::Low),
            (Label::Phishing, 79.99, RiskLevel::Medium),
            (Label::Safe, 60.0, RiskLevel::Medium),
            (Label::Phishing, 59.99, RiskLevel::Low),
            (Label::Safe, 55.0, RiskLevel::Low),
            (Label::Phishing, 0.0, RiskLevel::Low),
        ];

        for (label, confidence, expected) in cases {
            assert_eq!(grade_url(label, confidence), expected, "{} {}", label, confidence);
        }
    }

    #[test]
    fn test_email_grading_table() {
        let cases = [
            (Label::Phishing, 97.0, RiskLevel::High),
            (Label::Phishing, 75.0, RiskLevel::High),
            (Label::Phishing, 74.99, RiskLevel::Medium),
            (Label::Phishing, 10.0, RiskLevel::Medium),
            (Label::Safe, 90.0, RiskLevel::Low),
            (Label::Safe, 70.0, RiskLevel::Low),
            (Label::Safe, 69.99, RiskLevel::Medium),
            (Label::Safe, 55.0, RiskLevel::Medium),
        ];

        for (label, confidence, expected) in cases {
            assert_eq!(grade_email(label, confidence), expected, "{} {}", label, confidence);
        }
    }

    #[test]
    fn test_grading_bands_over_full_range() {
        for step in 0..=10_000 {
            let confidence = f64::from(step) / 100.0;
            for label in [Label::Phishing, Label::Safe] {
                let url = grade_url(label, confidence);
                assert_eq!(
                    url == RiskLevel::Medium,
                    (60.0..80.0).contains(&confidence)
                );
                if label == Label::Safe {
                    assert_ne!(url, RiskLevel::High);
                }

                match (label, grade_email(label, confidence)) {
                    (Label::Safe, RiskLevel::High) => panic!("safe email graded high"),
                    (Label::Phishing, RiskLevel::Low) => panic!("phishing email graded low"),
                    _ => {}
                }
            }
        }
    }
}
