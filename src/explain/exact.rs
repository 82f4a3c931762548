//! Interventional Shapley values by full coalition enumeration.
//!
//! `v(S)` is the mean model output over reference rows `z` with features in
//! `S` taken from the employee and the rest from `z`. With seven features this
//! is 128 coalitions × background rows model calls.

use super::{contributions, AttributionResult, Deadline, Explainer, OutputSpace};
use crate::error::{Error, Result};
use crate::features::{FeatureVector, ReferencePopulation, FEATURE_COUNT};
use crate::model::{Capability, Classifier};

const COALITIONS: usize = 1 << FEATURE_COUNT;

pub(super) fn explain(
    classifier: &dyn Classifier,
    reference: &ReferencePopulation,
    features: &FeatureVector,
    deadline: Deadline,
) -> Result<AttributionResult> {
    let output_space = if classifier.capabilities().contains(Capability::DecisionFunction) {
        OutputSpace::Raw
    } else {
        OutputSpace::Probability
    };
    let model = |v: &FeatureVector| -> Result<f64> {
        let out = match output_space {
            OutputSpace::Raw => classifier.decision_function(v),
            OutputSpace::Probability => classifier.predict_proba(v).map(|p| p[1]),
        };
        out.map_err(|e| Error::AttributionFailure(e.to_string()))
    };

    let x = features.values();
    let n = reference.len();
    let mut value = vec![0.0; COALITIONS];
    for (mask, slot) in value.iter_mut().enumerate() {
        deadline.check()?;
        let mut total = 0.0;
        for r in 0..n {
            let mut hybrid = reference.row(r);
            for (i, cell) in hybrid.iter_mut().enumerate() {
                if mask & (1 << i) != 0 {
                    *cell = x[i];
                }
            }
            let v = FeatureVector::new(hybrid).map_err(|e| Error::AttributionFailure(e.to_string()))?;
            total += model(&v)?;
        }
        *slot = total / n as f64;
    }

    let weights = coalition_weights();
    let mut phi = [0.0; FEATURE_COUNT];
    for (i, p) in phi.iter_mut().enumerate() {
        let bit = 1 << i;
        *p = (0..COALITIONS)
            .filter(|mask| mask & bit == 0)
            .map(|mask| weights[mask.count_ones() as usize] * (value[mask | bit] - value[mask]))
            .sum();
    }

    Ok(AttributionResult {
        explainer: Explainer::Exact,
        output_space,
        baseline: value[0],
        output: value[COALITIONS - 1],
        background_size: n,
        contributions: contributions(features, &phi),
    })
}

/// `|S|! (d − |S| − 1)! / d!` indexed by coalition size.
fn coalition_weights() -> [f64; FEATURE_COUNT] {
    let fact = |k: usize| (1..=k).map(|v| v as f64).product::<f64>();
    let d = FEATURE_COUNT;
    let mut w = [0.0; FEATURE_COUNT];
    for (s, slot) in w.iter_mut().enumerate() {
        *slot = fact(s) * fact(d - s - 1) / fact(d);
    }
    w
}
