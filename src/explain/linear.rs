use super::{contributions, AttributionResult, Explainer, OutputSpace};
use crate::error::{Error, Result};
use crate::features::{FeatureVector, ReferencePopulation, FEATURE_COUNT};
use crate::model::LinearTerms;

pub(super) fn explain(
    terms: &LinearTerms,
    reference: &ReferencePopulation,
    features: &FeatureVector,
) -> Result<AttributionResult> {
    let means = reference
        .column_means()
        .ok_or_else(|| Error::AttributionFailure("reference population is empty".to_string()))?;
    let x = features.values();

    let mut phi = [0.0; FEATURE_COUNT];
    for i in 0..FEATURE_COUNT {
        phi[i] = terms.coef[i] * (x[i] - means[i]);
    }

    Ok(AttributionResult {
        explainer: Explainer::Linear,
        output_space: OutputSpace::Raw,
        baseline: terms.evaluate(&means),
        output: terms.evaluate(x),
        background_size: reference.len(),
        contributions: contributions(features, &phi),
    })
}
