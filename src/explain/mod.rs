//! Per-feature attribution of one employee's prediction against a reference population.
//!
//! Contributions are measured in the classifier's raw output space (log-odds
//! for logistic models) and satisfy `baseline + Σ contribution = output`.
//! Two explainers are available:
//! - [`linear`]: closed form for linear decision functions, `φᵢ = wᵢ (xᵢ − E[xᵢ])`
//! - [`exact`]: interventional Shapley values by enumerating all feature
//!   coalitions over the reference rows; works for any classifier
//!
//! Both are deterministic for identical inputs.

mod exact;
mod linear;

use crate::config::{AttributionConfig, AttributionMethod};
use crate::error::{Error, Result};
use crate::features::{Feature, FeatureVector, ReferencePopulation};
use crate::model::Classifier;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Explainer {
    Linear,
    Exact,
}

/// Scale the contributions are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputSpace {
    /// `decision_function` (log-odds / margin)
    Raw,
    /// Probability of class 1, for classifiers without a decision function
    Probability,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    pub feature: Feature,
    /// The employee's value for this feature
    pub value: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributionResult {
    pub explainer: Explainer,
    pub output_space: OutputSpace,
    /// Expected model output over the reference population
    pub baseline: f64,
    /// Model output for this employee
    pub output: f64,
    pub background_size: usize,
    /// One entry per feature, in model input order
    pub contributions: Vec<FeatureContribution>,
}

impl AttributionResult {
    /// Contributions by decreasing magnitude; ties keep input order.
    pub fn ranked(&self) -> Vec<FeatureContribution> {
        let mut out = self.contributions.clone();
        out.sort_by(|a, b| b.contribution.abs().total_cmp(&a.contribution.abs()));
        out
    }

    pub fn total_contribution(&self) -> f64 {
        self.contributions.iter().map(|c| c.contribution).sum()
    }

    /// `|baseline + Σ φ − output|`
    pub fn additivity_gap(&self) -> f64 {
        (self.baseline + self.total_contribution() - self.output).abs()
    }
}

/// Wall-clock budget checked between units of work.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Deadline(Option<Instant>);

impl Deadline {
    pub(crate) fn after(timeout_ms: u64) -> Self {
        if timeout_ms == 0 {
            Deadline(None)
        } else {
            Deadline(Some(Instant::now() + Duration::from_millis(timeout_ms)))
        }
    }

    pub(crate) fn check(&self) -> Result<()> {
        match self.0 {
            Some(at) if Instant::now() >= at => Err(Error::AttributionFailure(
                "deadline exceeded; lower attribution.max_background".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

pub struct AttributionEngine {
    config: AttributionConfig,
}

impl AttributionEngine {
    pub fn new(config: AttributionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AttributionConfig {
        &self.config
    }

    pub fn explain(
        &self,
        classifier: &dyn Classifier,
        reference: &ReferencePopulation,
        features: &FeatureVector,
    ) -> Result<AttributionResult> {
        if reference.is_empty() {
            return Err(Error::AttributionFailure("reference population is empty".to_string()));
        }
        let started = Instant::now();
        let result = match (self.config.method, classifier.linear_terms()) {
            (AttributionMethod::Auto | AttributionMethod::Linear, Some(terms)) => {
                linear::explain(&terms, reference, features)
            }
            (AttributionMethod::Linear, None) => Err(Error::AttributionFailure(format!(
                "{} has no linear form",
                classifier.name()
            ))),
            (AttributionMethod::Auto | AttributionMethod::Exact, _) => exact::explain(
                classifier,
                reference,
                features,
                Deadline::after(self.config.timeout_ms),
            ),
        }?;
        tracing::debug!(
            explainer = ?result.explainer,
            background = result.background_size,
            gap = result.additivity_gap(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "attribution computed"
        );
        Ok(result)
    }
}

fn contributions(features: &FeatureVector, phi: &[f64]) -> Vec<FeatureContribution> {
    features
        .named()
        .zip(phi)
        .map(|((feature, value), contribution)| FeatureContribution {
            feature,
            value,
            contribution: *contribution,
        })
        .collect()
}
