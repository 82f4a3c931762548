//! Retention signals: profile traits shared by employees who leave, each paired
//! with the HR action that addresses it.

use crate::data::EmployeeRecord;
use serde::{Deserialize, Serialize};

/// Monthly hours above this count as overload.
pub const OVERLOAD_HOURS: f64 = 220.0;
/// Monthly hours below this count as under-utilisation.
pub const UNDERUSE_HOURS: f64 = 150.0;
pub const LOW_SATISFACTION: f64 = 0.5;
/// `salary_encoded` value of the lowest pay band.
pub const LOW_SALARY_BAND: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionSignal {
    LowSatisfaction,
    Overload,
    Underutilisation,
    LowSalary,
}

impl RetentionSignal {
    pub fn recommendation(self) -> &'static str {
        match self {
            RetentionSignal::LowSatisfaction => {
                "improve recognition and working conditions; review workload balance"
            }
            RetentionSignal::Overload => "rebalance workload to prevent burnout",
            RetentionSignal::Underutilisation => {
                "offer more engaging assignments and development opportunities"
            }
            RetentionSignal::LowSalary => "align pay with the market or add performance bonuses",
        }
    }
}

/// Signals present for one employee. Missing cells raise nothing.
pub fn retention_signals(record: &EmployeeRecord) -> Vec<RetentionSignal> {
    let mut out = Vec::new();
    if record.satisfaction_level.is_some_and(|s| s < LOW_SATISFACTION) {
        out.push(RetentionSignal::LowSatisfaction);
    }
    match record.average_monthly_hours {
        Some(h) if h > OVERLOAD_HOURS => out.push(RetentionSignal::Overload),
        Some(h) if h < UNDERUSE_HOURS => out.push(RetentionSignal::Underutilisation),
        _ => {}
    }
    if record.salary_encoded == Some(LOW_SALARY_BAND) {
        out.push(RetentionSignal::LowSalary);
    }
    out
}
