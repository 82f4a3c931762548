//! Employee table: one row per employee, read once per session.

mod loader;

pub use loader::load_dataset;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use thiserror::Error;

use crate::error::Error;

/// One row of the dataset. Feature cells may be missing in the file: blank, an
/// NA marker such as `NaN`/`NA`/`null`, or a non-finite number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    #[serde(rename = "id_colab")]
    pub id: u64,
    pub job: String,
    #[serde(default, deserialize_with = "loader::cell")]
    pub satisfaction_level: Option<f64>,
    #[serde(default, deserialize_with = "loader::cell")]
    pub last_evaluation: Option<f64>,
    #[serde(rename = "number_project", default, deserialize_with = "loader::cell")]
    pub project_count: Option<f64>,
    #[serde(rename = "average_montly_hours", default, deserialize_with = "loader::cell")]
    pub average_monthly_hours: Option<f64>,
    #[serde(rename = "time_spend_company", default, deserialize_with = "loader::cell")]
    pub tenure_years: Option<f64>,
    #[serde(alias = "Work_accident", default, deserialize_with = "loader::cell")]
    pub work_accident: Option<f64>,
    #[serde(default, deserialize_with = "loader::cell")]
    pub salary_encoded: Option<f64>,
    /// Turnover outcome: 1 if the employee left
    pub left: u8,
}

impl EmployeeRecord {
    pub fn has_left(&self) -> bool {
        self.left == 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("duplicate id_colab {0}")]
    DuplicateId(u64),
    #[error("employee {id}: left must be 0 or 1, got {value}")]
    InvalidOutcome { id: u64, value: u8 },
}

/// In-memory employee table with an id index.
#[derive(Debug, Clone, Default)]
pub struct Table {
    records: Vec<EmployeeRecord>,
    index: HashMap<u64, usize>,
}

impl Table {
    /// Build a table, enforcing unique ids and a binary outcome.
    pub fn from_records(records: Vec<EmployeeRecord>) -> Result<Self, TableError> {
        let mut index = HashMap::with_capacity(records.len());
        for (pos, r) in records.iter().enumerate() {
            if r.left > 1 {
                return Err(TableError::InvalidOutcome {
                    id: r.id,
                    value: r.left,
                });
            }
            if index.insert(r.id, pos).is_some() {
                return Err(TableError::DuplicateId(r.id));
            }
        }
        Ok(Self { records, index })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the table, degrading to an empty one on failure. The error is handed
    /// back so the caller can surface it once.
    pub fn load_or_empty(path: &Path) -> (Self, Option<Error>) {
        match load_dataset(path) {
            Ok(t) => (t, None),
            Err(e) => {
                tracing::warn!(error = %e, "dataset unavailable; continuing with empty table");
                (Self::empty(), Some(e))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[EmployeeRecord] {
        &self.records
    }

    pub fn get(&self, id: u64) -> Option<&EmployeeRecord> {
        self.index.get(&id).map(|&pos| &self.records[pos])
    }

    /// Ids in file order.
    pub fn ids(&self) -> Vec<u64> {
        self.records.iter().map(|r| r.id).collect()
    }

    /// Sorted distinct job labels.
    pub fn jobs(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.job.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Rows whose job equals `job`.
    pub fn filter_job(&self, job: &str) -> Table {
        let records: Vec<EmployeeRecord> = self
            .records
            .iter()
            .filter(|r| r.job == job)
            .cloned()
            .collect();
        let index = records.iter().enumerate().map(|(i, r)| (r.id, i)).collect();
        Table { records, index }
    }
}
