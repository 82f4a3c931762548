//! Combines the classifier's probability with configurable thresholds; produces a risk tier.

use crate::config::RiskConfig;
use crate::data::EmployeeRecord;
use crate::error::{Error, Result};
use crate::features::FeatureVector;
use crate::model::Classifier;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Moderate,
    High,
}

impl RiskTier {
    /// Half-open bands: `[0, moderate)`, `[moderate, high)`, `[high, 1]`.
    pub fn from_probability(probability: f64, config: &RiskConfig) -> Self {
        if probability >= config.high_threshold {
            RiskTier::High
        } else if probability >= config.moderate_threshold {
            RiskTier::Moderate
        } else {
            RiskTier::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Moderate => "moderate",
            RiskTier::High => "high",
        }
    }
}

/// Risk result for a single employee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<u64>,
    /// Probability of leaving (class 1)
    pub probability: f64,
    pub predicted_label: u8,
    pub risk_tier: RiskTier,
}

pub struct RiskScorer {
    config: RiskConfig,
}

impl RiskScorer {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    /// Score one feature vector. Inference errors are returned, never defaulted.
    pub fn score(&self, classifier: &dyn Classifier, features: &FeatureVector) -> Result<RiskAssessment> {
        let predicted_label = classifier.predict(features)?;
        if predicted_label > 1 {
            return Err(Error::PredictionFailed(format!(
                "{} returned label {predicted_label}",
                classifier.name()
            )));
        }
        let [_, probability] = classifier.predict_proba(features)?;
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(Error::PredictionFailed(format!(
                "{} returned probability {probability}",
                classifier.name()
            )));
        }
        let risk_tier = RiskTier::from_probability(probability, &self.config);
        tracing::debug!(probability, label = predicted_label, tier = risk_tier.label(), "scored");
        Ok(RiskAssessment {
            employee_id: None,
            probability,
            predicted_label,
            risk_tier,
        })
    }

    /// Score a dataset row; missing features reject the request.
    pub fn score_record(&self, classifier: &dyn Classifier, record: &EmployeeRecord) -> Result<RiskAssessment> {
        let features = FeatureVector::from_record(record)?;
        let mut assessment = self.score(classifier, &features)?;
        assessment.employee_id = Some(record.id);
        Ok(assessment)
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }
}
