//! JSON model artifact → typed classifier. Capabilities and input order are
//! checked once here so scoring never probes the model at request time.

use super::{CapabilitySet, Classifier, LinearSvcModel, LogisticModel, Scaler};
use crate::error::{Error, Result};
use crate::features::Feature;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn default_threshold() -> f64 {
    0.5
}

/// Serialized classifier, tagged by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    LogisticRegression {
        feature_names: Vec<String>,
        coef: Vec<f64>,
        intercept: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        scaler: Option<Scaler>,
        #[serde(default = "default_threshold")]
        threshold: f64,
    },
    LinearSvc {
        feature_names: Vec<String>,
        coef: Vec<f64>,
        intercept: f64,
    },
}

impl ModelArtifact {
    pub fn kind(&self) -> &'static str {
        match self {
            ModelArtifact::LogisticRegression { .. } => "logistic_regression",
            ModelArtifact::LinearSvc { .. } => "linear_svc",
        }
    }

    pub fn build(self) -> Result<Arc<dyn Classifier>> {
        let classifier: Arc<dyn Classifier> = match self {
            ModelArtifact::LogisticRegression {
                feature_names,
                coef,
                intercept,
                scaler,
                threshold,
            } => Arc::new(LogisticModel::new(
                feature_names,
                &coef,
                intercept,
                scaler.as_ref(),
                threshold,
            )?),
            ModelArtifact::LinearSvc {
                feature_names,
                coef,
                intercept,
            } => Arc::new(LinearSvcModel::new(feature_names, &coef, intercept)?),
        };
        Ok(classifier)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub kind: String,
    pub path: PathBuf,
    /// Hex SHA-256 of the artifact bytes
    pub sha256: String,
    pub loaded_at: DateTime<Utc>,
}

/// A validated classifier plus where it came from.
#[derive(Clone)]
pub struct LoadedModel {
    pub classifier: Arc<dyn Classifier>,
    pub info: ModelInfo,
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel")
            .field("classifier", &self.classifier.name())
            .field("info", &self.info)
            .finish()
    }
}

/// Load and validate the model artifact.
///
/// Missing or unreadable file → `ModelUnavailable`. Anything that reads but
/// cannot serve `predict` + `predict_proba` over the seven features in model
/// order → `ModelInvalid`.
pub fn load_classifier(path: &Path) -> Result<LoadedModel> {
    let bytes = std::fs::read(path).map_err(|e| Error::model(path, e))?;
    let sha256 = Sha256::digest(&bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<String>();

    let artifact: ModelArtifact = serde_json::from_slice(&bytes)
        .map_err(|e| Error::ModelInvalid(format!("{}: {e}", path.display())))?;
    let kind = artifact.kind();
    let classifier = artifact.build()?;

    validate_classifier(classifier.as_ref())?;

    tracing::info!(path = %path.display(), kind, sha256 = %sha256, "model loaded");
    Ok(LoadedModel {
        classifier,
        info: ModelInfo {
            kind: kind.to_string(),
            path: path.to_path_buf(),
            sha256,
            loaded_at: Utc::now(),
        },
    })
}

/// Checks applied to every classifier before it may score: the required
/// capability set and the exact input feature order.
pub fn validate_classifier(classifier: &dyn Classifier) -> Result<()> {
    ensure_capabilities(classifier)?;
    ensure_feature_order(classifier.feature_names())
}

fn ensure_capabilities(classifier: &dyn Classifier) -> Result<()> {
    let missing = classifier.capabilities().missing(CapabilitySet::REQUIRED);
    if missing.is_empty() {
        return Ok(());
    }
    let names: Vec<String> = missing.iter().map(|c| c.to_string()).collect();
    Err(Error::ModelInvalid(format!(
        "{} lacks required capability: {}",
        classifier.name(),
        names.join(", ")
    )))
}

fn ensure_feature_order(names: &[String]) -> Result<()> {
    let parsed: Vec<Option<Feature>> = names.iter().map(|n| n.parse::<Feature>().ok()).collect();
    let in_order = parsed.len() == Feature::ALL.len()
        && parsed.iter().zip(Feature::ALL).all(|(p, f)| *p == Some(f));
    if !in_order {
        let expected: Vec<&str> = Feature::ALL.iter().map(|f| f.name()).collect();
        return Err(Error::ModelInvalid(format!(
            "model expects features {names:?}, input order is {expected:?}"
        )));
    }
    Ok(())
}
