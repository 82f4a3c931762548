//! Error taxonomy shared by loaders, scoring and attribution.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Dataset file missing or malformed.
    #[error("dataset unavailable at {path}: {reason}")]
    DataUnavailable { path: PathBuf, reason: String },

    /// Model artifact missing or unreadable.
    #[error("model artifact unavailable at {path}: {reason}")]
    ModelUnavailable { path: PathBuf, reason: String },

    /// Artifact was read but does not yield a usable classifier.
    #[error("model artifact invalid: {0}")]
    ModelInvalid(String),

    #[error("invalid feature vector: {0}")]
    FeatureVectorInvalid(String),

    #[error("prediction failed: {0}")]
    PredictionFailed(String),

    #[error("attribution failed: {0}")]
    AttributionFailure(String),

    #[error("employee {0} not found")]
    EmployeeNotFound(u64),
}

/// Where an error is allowed to propagate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Raised once at session start; gates every dependent feature.
    Session,
    /// Confined to the single request that raised it.
    Request,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::DataUnavailable { .. }
            | Error::ModelUnavailable { .. }
            | Error::ModelInvalid(_) => ErrorKind::Session,
            Error::FeatureVectorInvalid(_)
            | Error::PredictionFailed(_)
            | Error::AttributionFailure(_)
            | Error::EmployeeNotFound(_) => ErrorKind::Request,
        }
    }

    pub(crate) fn data(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::DataUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn model(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::ModelUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Short machine-readable tag, used in audit lines.
    pub fn tag(&self) -> &'static str {
        match self {
            Error::DataUnavailable { .. } => "data_unavailable",
            Error::ModelUnavailable { .. } => "model_unavailable",
            Error::ModelInvalid(_) => "model_invalid",
            Error::FeatureVectorInvalid(_) => "feature_vector_invalid",
            Error::PredictionFailed(_) => "prediction_failed",
            Error::AttributionFailure(_) => "attribution_failure",
            Error::EmployeeNotFound(_) => "employee_not_found",
        }
    }
}
