//! Classifier input: the fixed, ordered 7-feature projection of an employee row.

mod reference;

pub use reference::ReferencePopulation;

use crate::data::EmployeeRecord;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const FEATURE_COUNT: usize = 7;

/// Model input columns, in the order the classifier was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Feature {
    #[serde(rename = "satisfaction_level")]
    SatisfactionLevel,
    #[serde(rename = "last_evaluation")]
    LastEvaluation,
    #[serde(rename = "number_project")]
    ProjectCount,
    #[serde(rename = "average_montly_hours")]
    AverageMonthlyHours,
    #[serde(rename = "time_spend_company")]
    TenureYears,
    #[serde(rename = "work_accident")]
    WorkAccident,
    #[serde(rename = "salary_encoded")]
    SalaryEncoded,
}

impl Feature {
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::SatisfactionLevel,
        Feature::LastEvaluation,
        Feature::ProjectCount,
        Feature::AverageMonthlyHours,
        Feature::TenureYears,
        Feature::WorkAccident,
        Feature::SalaryEncoded,
    ];

    /// Column name in the dataset and the model artifact.
    pub fn name(self) -> &'static str {
        match self {
            Feature::SatisfactionLevel => "satisfaction_level",
            Feature::LastEvaluation => "last_evaluation",
            Feature::ProjectCount => "number_project",
            Feature::AverageMonthlyHours => "average_montly_hours",
            Feature::TenureYears => "time_spend_company",
            Feature::WorkAccident => "work_accident",
            Feature::SalaryEncoded => "salary_encoded",
        }
    }

    /// Position in the feature vector.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn value_of(self, record: &EmployeeRecord) -> Option<f64> {
        match self {
            Feature::SatisfactionLevel => record.satisfaction_level,
            Feature::LastEvaluation => record.last_evaluation,
            Feature::ProjectCount => record.project_count,
            Feature::AverageMonthlyHours => record.average_monthly_hours,
            Feature::TenureYears => record.tenure_years,
            Feature::WorkAccident => record.work_accident,
            Feature::SalaryEncoded => record.salary_encoded,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Feature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Feature::ALL
            .into_iter()
            .find(|f| f.name() == s || (*f == Feature::WorkAccident && s == "Work_accident"))
            .ok_or_else(|| Error::FeatureVectorInvalid(format!("unknown feature '{s}'")))
    }
}

/// Ordered, complete and finite model input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Result<Self> {
        if let Some(f) = Feature::ALL.into_iter().find(|f| !values[f.index()].is_finite()) {
            return Err(Error::FeatureVectorInvalid(format!("{f} is not finite")));
        }
        Ok(Self { values })
    }

    /// Project a dataset row. Every feature must be present.
    pub fn from_record(record: &EmployeeRecord) -> Result<Self> {
        let mut values = [0.0; FEATURE_COUNT];
        for f in Feature::ALL {
            values[f.index()] = f.value_of(record).ok_or_else(|| {
                Error::FeatureVectorInvalid(format!("employee {}: {f} is missing", record.id))
            })?;
        }
        Self::new(values)
    }

    /// Build from `(name, value)` pairs, which must follow the model order exactly.
    pub fn from_named(pairs: &[(&str, f64)]) -> Result<Self> {
        if pairs.len() != FEATURE_COUNT {
            return Err(Error::FeatureVectorInvalid(format!(
                "expected {FEATURE_COUNT} features, got {}",
                pairs.len()
            )));
        }
        let mut values = [0.0; FEATURE_COUNT];
        for (pos, (name, value)) in pairs.iter().enumerate() {
            let feature: Feature = name.parse()?;
            if feature.index() != pos {
                return Err(Error::FeatureVectorInvalid(format!(
                    "{feature} at position {pos}, expected {}",
                    Feature::ALL[pos]
                )));
            }
            values[pos] = *value;
        }
        Self::new(values)
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.values[feature.index()]
    }

    /// Copy with one feature replaced.
    pub fn with(mut self, feature: Feature, value: f64) -> Self {
        self.values[feature.index()] = value;
        self
    }

    pub fn named(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::ALL.into_iter().map(move |f| (f, self.values[f.index()]))
    }
}
