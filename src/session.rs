//! Session state: dataset and classifier loaded once at start, shared read-only
//! by every request, reloaded only through [`Session::invalidate`].

use crate::config::AppConfig;
use crate::data::{EmployeeRecord, Table};
use crate::error::{Error, Result};
use crate::explain::{AttributionEngine, AttributionResult};
use crate::features::{Feature, FeatureVector, ReferencePopulation};
use crate::insights::{retention_signals, RetentionSignal};
use crate::kpi::{FeatureDispersion, JobFilter, KpiReport, DEFAULT_BINS};
use crate::model::{load_classifier, validate_classifier, Classifier, ModelInfo};
use crate::risk::{RiskAssessment, RiskScorer};
use serde::{Serialize, Serializer};
use std::sync::Arc;
use uuid::Uuid;

pub struct Session {
    id: Uuid,
    config: AppConfig,
    table: Arc<Table>,
    dataset_error: Option<Error>,
    reference: Arc<ReferencePopulation>,
    classifier: Result<Arc<dyn Classifier>>,
    model_info: Option<ModelInfo>,
    scorer: RiskScorer,
    attribution: AttributionEngine,
}

impl Session {
    /// Load dataset and model from the configured paths. Neither failure is
    /// fatal here: a missing dataset leaves an empty table, a bad model gates
    /// prediction. Both errors stay queryable.
    pub fn start(config: AppConfig) -> Self {
        let id = Uuid::new_v4();
        let (table, dataset_error) = Table::load_or_empty(&config.data_path);
        let (classifier, model_info) = match load_classifier(&config.model_path) {
            Ok(m) => (Ok(m.classifier), Some(m.info)),
            Err(e) => {
                tracing::warn!(session = %id, error = %e, "prediction disabled for this session");
                (Err(e), None)
            }
        };
        let session = Self::assemble(id, config, table, dataset_error, classifier, model_info);
        tracing::info!(
            session = %session.id,
            rows = session.table.len(),
            background = session.reference.len(),
            model = session.model_info.as_ref().map(|m| m.kind.as_str()).unwrap_or("none"),
            "session started"
        );
        session
    }

    /// Session over in-memory parts. The classifier is held to the same
    /// capability and input-order checks as a loaded artifact.
    pub fn from_parts(config: AppConfig, table: Table, classifier: Arc<dyn Classifier>) -> Result<Self> {
        validate_classifier(classifier.as_ref())?;
        Ok(Self::assemble(Uuid::new_v4(), config, table, None, Ok(classifier), None))
    }

    fn assemble(
        id: Uuid,
        config: AppConfig,
        table: Table,
        dataset_error: Option<Error>,
        classifier: Result<Arc<dyn Classifier>>,
        model_info: Option<ModelInfo>,
    ) -> Self {
        let reference = ReferencePopulation::sampled(
            &table,
            config.attribution.max_background,
            config.attribution.seed,
        );
        Self {
            id,
            scorer: RiskScorer::new(config.risk.clone()),
            attribution: AttributionEngine::new(config.attribution.clone()),
            config,
            table: Arc::new(table),
            dataset_error,
            reference: Arc::new(reference),
            classifier,
            model_info,
        }
    }

    /// Drop cached dataset and model and read both from storage again.
    pub fn invalidate(&mut self) {
        tracing::info!(session = %self.id, "session caches invalidated");
        *self = Self::start(self.config.clone());
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn dataset(&self) -> &Arc<Table> {
        &self.table
    }

    pub fn dataset_error(&self) -> Option<&Error> {
        self.dataset_error.as_ref()
    }

    pub fn reference(&self) -> &Arc<ReferencePopulation> {
        &self.reference
    }

    /// The classifier, or the load error that gates every prediction feature.
    pub fn classifier(&self) -> Result<&Arc<dyn Classifier>> {
        self.classifier.as_ref().map_err(Clone::clone)
    }

    pub fn model_info(&self) -> Option<&ModelInfo> {
        self.model_info.as_ref()
    }

    pub fn prediction_enabled(&self) -> bool {
        self.classifier.is_ok()
    }

    pub fn kpis(&self, filter: &JobFilter) -> KpiReport {
        KpiReport::build(&self.table, filter)
    }

    pub fn employee(&self, id: u64) -> Result<&EmployeeRecord> {
        self.table.get(id).ok_or(Error::EmployeeNotFound(id))
    }

    pub fn assess(&self, id: u64) -> Result<RiskAssessment> {
        let classifier = self.classifier()?;
        let record = self.employee(id)?;
        self.scorer.score_record(classifier.as_ref(), record)
    }

    pub fn assess_features(&self, features: &FeatureVector) -> Result<RiskAssessment> {
        let classifier = self.classifier()?;
        self.scorer.score(classifier.as_ref(), features)
    }

    pub fn explain(&self, id: u64) -> Result<AttributionResult> {
        let classifier = self.classifier()?;
        let features = FeatureVector::from_record(self.employee(id)?)?;
        self.attribution.explain(classifier.as_ref(), &self.reference, &features)
    }

    pub fn dispersion(&self, id: u64, feature: Feature) -> Result<FeatureDispersion> {
        let record = self.employee(id)?;
        Ok(FeatureDispersion::compute(&self.table, record, feature, DEFAULT_BINS))
    }

    /// Everything shown for one selected employee. Scoring and explanation
    /// fail independently; only an unknown id fails the whole report.
    pub fn report(&self, id: u64, with_explanation: bool) -> Result<EmployeeReport> {
        let record = self.employee(id)?.clone();
        let risk = self.assess(id);
        let attribution = with_explanation.then(|| self.explain(id));
        if let Some(Err(e)) = &attribution {
            tracing::warn!(session = %self.id, employee = id, error = %e, "attribution failed");
        }
        Ok(EmployeeReport {
            signals: retention_signals(&record),
            record,
            risk,
            attribution,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EmployeeReport {
    pub record: EmployeeRecord,
    #[serde(serialize_with = "outcome")]
    pub risk: Result<RiskAssessment>,
    #[serde(serialize_with = "optional_outcome", skip_serializing_if = "Option::is_none")]
    pub attribution: Option<Result<AttributionResult>>,
    pub signals: Vec<RetentionSignal>,
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
enum Outcome<'a, T> {
    Ok(&'a T),
    Error { kind: &'static str, message: String },
}

impl<'a, T> From<&'a Result<T>> for Outcome<'a, T> {
    fn from(r: &'a Result<T>) -> Self {
        match r {
            Ok(v) => Outcome::Ok(v),
            Err(e) => Outcome::Error {
                kind: e.tag(),
                message: e.to_string(),
            },
        }
    }
}

fn outcome<T: Serialize, S: Serializer>(r: &Result<T>, s: S) -> std::result::Result<S::Ok, S::Error> {
    Outcome::from(r).serialize(s)
}

fn optional_outcome<T: Serialize, S: Serializer>(
    r: &Option<Result<T>>,
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    r.as_ref().map(Outcome::from).serialize(s)
}
