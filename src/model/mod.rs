//! Pretrained binary classifier: capability-typed interface, linear models and the artifact loader.

mod linear;
mod loader;

pub use linear::{LinearSvcModel, LogisticModel, Scaler};
pub use loader::{load_classifier, validate_classifier, LoadedModel, ModelArtifact, ModelInfo};

use crate::error::{Error, Result};
use crate::features::{FeatureVector, FEATURE_COUNT};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Predict,
    PredictProba,
    DecisionFunction,
}

impl Capability {
    const ALL: [Capability; 3] = [
        Capability::Predict,
        Capability::PredictProba,
        Capability::DecisionFunction,
    ];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Capability::Predict => "predict",
            Capability::PredictProba => "predict_proba",
            Capability::DecisionFunction => "decision_function",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapabilitySet(u8);

impl CapabilitySet {
    /// What scoring needs from any loaded classifier.
    pub const REQUIRED: CapabilitySet = CapabilitySet(0b011);

    pub fn of(caps: &[Capability]) -> Self {
        Self(caps.iter().fold(0, |acc, c| acc | c.bit()))
    }

    pub fn contains(self, cap: Capability) -> bool {
        self.0 & cap.bit() != 0
    }

    /// Capabilities of `required` absent from `self`.
    pub fn missing(self, required: CapabilitySet) -> Vec<Capability> {
        Capability::ALL
            .into_iter()
            .filter(|c| required.contains(*c) && !self.contains(*c))
            .collect()
    }
}

/// Raw-feature-space linear form of a classifier's decision function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTerms {
    pub coef: [f64; FEATURE_COUNT],
    pub intercept: f64,
}

impl LinearTerms {
    pub fn evaluate(&self, x: &[f64; FEATURE_COUNT]) -> f64 {
        self.intercept + self.coef.iter().zip(x).map(|(w, v)| w * v).sum::<f64>()
    }
}

/// Immutable, shareable binary classifier. Methods a model does not support
/// must also be absent from `capabilities()`.
pub trait Classifier: Send + Sync {
    fn name(&self) -> &str;

    fn capabilities(&self) -> CapabilitySet;

    /// Input column names, in the order the model expects them.
    fn feature_names(&self) -> &[String];

    /// Class label in {0, 1}.
    fn predict(&self, x: &FeatureVector) -> Result<u8>;

    /// `[p(class 0), p(class 1)]`.
    fn predict_proba(&self, _x: &FeatureVector) -> Result<[f64; 2]> {
        Err(unsupported(self.name(), Capability::PredictProba))
    }

    /// Raw (pre-link) model output, log-odds for logistic models.
    fn decision_function(&self, _x: &FeatureVector) -> Result<f64> {
        Err(unsupported(self.name(), Capability::DecisionFunction))
    }

    /// Linear form, when the decision function is linear in the raw features.
    fn linear_terms(&self) -> Option<LinearTerms> {
        None
    }
}

pub(crate) fn unsupported(model: &str, cap: Capability) -> Error {
    Error::PredictionFailed(format!("{model} does not support {cap}"))
}

/// Logistic link, stable for large |z|.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
