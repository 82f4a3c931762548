//! Linear classifiers rebuilt from exported coefficients.

use super::{sigmoid, Capability, CapabilitySet, Classifier, LinearTerms};
use crate::error::{Error, Result};
use crate::features::{FeatureVector, FEATURE_COUNT};
use serde::{Deserialize, Serialize};

/// Standardization applied before the linear layer: `z = (x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Shared linear core; `coef` is in (possibly standardized) model space.
#[derive(Debug, Clone)]
struct LinearCore {
    feature_names: Vec<String>,
    coef: [f64; FEATURE_COUNT],
    intercept: f64,
    terms: LinearTerms,
}

impl LinearCore {
    fn new(
        feature_names: Vec<String>,
        coef: &[f64],
        intercept: f64,
        scaler: Option<&Scaler>,
    ) -> Result<Self> {
        let coef = fixed(coef, "coef")?;
        if !intercept.is_finite() || coef.iter().any(|w| !w.is_finite()) {
            return Err(Error::ModelInvalid("non-finite coefficient".to_string()));
        }
        let terms = match scaler {
            None => LinearTerms { coef, intercept },
            Some(s) => {
                let mean = fixed(&s.mean, "scaler.mean")?;
                let scale = fixed(&s.scale, "scaler.scale")?;
                if scale.iter().any(|v| !v.is_finite() || *v == 0.0) {
                    return Err(Error::ModelInvalid("scaler.scale must be finite and non-zero".to_string()));
                }
                let mut raw = [0.0; FEATURE_COUNT];
                let mut b = intercept;
                for i in 0..FEATURE_COUNT {
                    raw[i] = coef[i] / scale[i];
                    b -= coef[i] * mean[i] / scale[i];
                }
                LinearTerms { coef: raw, intercept: b }
            }
        };
        Ok(Self {
            feature_names,
            coef,
            intercept,
            terms,
        })
    }

    fn decision(&self, x: &FeatureVector) -> f64 {
        self.terms.evaluate(x.values())
    }
}

fn fixed(values: &[f64], what: &str) -> Result<[f64; FEATURE_COUNT]> {
    <[f64; FEATURE_COUNT]>::try_from(values).map_err(|_| {
        Error::ModelInvalid(format!(
            "{what} has {} entries, expected {FEATURE_COUNT}",
            values.len()
        ))
    })
}

/// Binary logistic regression, optionally behind a standard scaler.
#[derive(Debug, Clone)]
pub struct LogisticModel {
    core: LinearCore,
    threshold: f64,
}

impl LogisticModel {
    pub fn new(
        feature_names: Vec<String>,
        coef: &[f64],
        intercept: f64,
        scaler: Option<&Scaler>,
        threshold: f64,
    ) -> Result<Self> {
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(Error::ModelInvalid(format!("threshold {threshold} outside (0, 1)")));
        }
        Ok(Self {
            core: LinearCore::new(feature_names, coef, intercept, scaler)?,
            threshold,
        })
    }

    /// Coefficients as exported (standardized space when a scaler is present).
    pub fn coef(&self) -> &[f64; FEATURE_COUNT] {
        &self.core.coef
    }

    pub fn intercept(&self) -> f64 {
        self.core.intercept
    }
}

impl Classifier for LogisticModel {
    fn name(&self) -> &str {
        "logistic_regression"
    }

    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::of(&[
            Capability::Predict,
            Capability::PredictProba,
            Capability::DecisionFunction,
        ])
    }

    fn feature_names(&self) -> &[String] {
        &self.core.feature_names
    }

    fn predict(&self, x: &FeatureVector) -> Result<u8> {
        let [_, p1] = self.predict_proba(x)?;
        Ok(u8::from(p1 >= self.threshold))
    }

    fn predict_proba(&self, x: &FeatureVector) -> Result<[f64; 2]> {
        let p1 = sigmoid(self.core.decision(x));
        Ok([1.0 - p1, p1])
    }

    fn decision_function(&self, x: &FeatureVector) -> Result<f64> {
        Ok(self.core.decision(x))
    }

    fn linear_terms(&self) -> Option<LinearTerms> {
        Some(self.core.terms)
    }
}

/// Margin classifier without probability output.
#[derive(Debug, Clone)]
pub struct LinearSvcModel {
    core: LinearCore,
}

impl LinearSvcModel {
    pub fn new(feature_names: Vec<String>, coef: &[f64], intercept: f64) -> Result<Self> {
        Ok(Self {
            core: LinearCore::new(feature_names, coef, intercept, None)?,
        })
    }
}

impl Classifier for LinearSvcModel {
    fn name(&self) -> &str {
        "linear_svc"
    }

    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::of(&[Capability::Predict, Capability::DecisionFunction])
    }

    fn feature_names(&self) -> &[String] {
        &self.core.feature_names
    }

    fn predict(&self, x: &FeatureVector) -> Result<u8> {
        Ok(u8::from(self.core.decision(x) > 0.0))
    }

    fn decision_function(&self, x: &FeatureVector) -> Result<f64> {
        Ok(self.core.decision(x))
    }

    fn linear_terms(&self) -> Option<LinearTerms> {
        Some(self.core.terms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Feature;

    fn names() -> Vec<String> {
        Feature::ALL.iter().map(|f| f.name().to_string()).collect()
    }

    #[test]
    fn scaler_is_folded_into_raw_terms() {
        let coef = [1.0, 0.0, 0.0, 2.0, 0.0, 0.0, -1.0];
        let scaler = Scaler {
            mean: vec![0.5, 0.0, 0.0, 200.0, 0.0, 0.0, 1.0],
            scale: vec![0.25, 1.0, 1.0, 50.0, 1.0, 1.0, 0.5],
        };
        let m = LogisticModel::new(names(), &coef, -0.3, Some(&scaler), 0.5).unwrap();
        let x = FeatureVector::new([0.1, 0.8, 4.0, 280.0, 5.0, 0.0, 0.0]).unwrap();
        let z = [(0.1 - 0.5) / 0.25, 0.0, 0.0, (280.0 - 200.0) / 50.0, 0.0, 0.0, (0.0 - 1.0) / 0.5];
        let expected = -0.3 + coef.iter().zip(z).map(|(w, v)| w * v).sum::<f64>();
        assert!((m.decision_function(&x).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn wrong_coefficient_length_is_invalid() {
        let err = LogisticModel::new(names(), &[1.0, 2.0], 0.0, None, 0.5).unwrap_err();
        assert!(matches!(err, Error::ModelInvalid(_)));
    }

    #[test]
    fn svc_has_no_probability() {
        let m = LinearSvcModel::new(names(), &[0.0; FEATURE_COUNT], 1.0).unwrap();
        let x = FeatureVector::new([0.0; FEATURE_COUNT]).unwrap();
        assert_eq!(m.predict(&x).unwrap(), 1);
        assert!(m.predict_proba(&x).is_err());
        assert!(!m.capabilities().contains(Capability::PredictProba));
    }
}
