//! Histograms, scatter points and per-employee dispersion views.

use crate::data::{EmployeeRecord, Table};
use crate::features::Feature;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width bins over `[min, max]`; the last bin is closed on the right.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Histogram {
    pub bins: Vec<Bin>,
}

impl Histogram {
    pub fn from_values(values: &[f64], bins: usize) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let (Some(min), Some(max)) = (
            finite.iter().copied().reduce(f64::min),
            finite.iter().copied().reduce(f64::max),
        ) else {
            return Self::default();
        };
        if bins == 0 {
            return Self::default();
        }
        if min == max {
            return Self {
                bins: vec![Bin {
                    lower: min,
                    upper: max,
                    count: finite.len(),
                }],
            };
        }

        let width = (max - min) / bins as f64;
        let mut out: Vec<Bin> = (0..bins)
            .map(|i| Bin {
                lower: min + width * i as f64,
                upper: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
                count: 0,
            })
            .collect();
        for v in finite {
            let idx = (((v - min) / width) as usize).min(bins - 1);
            out[idx].count += 1;
        }
        Self { bins: out }
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

pub fn histogram(table: &Table, feature: Feature, bins: usize) -> Histogram {
    let values: Vec<f64> = table.records().iter().filter_map(|r| feature.value_of(r)).collect();
    Histogram::from_values(&values, bins)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub id: u64,
    pub job: String,
    pub x: f64,
    pub y: f64,
    pub left: u8,
}

/// Rows with both coordinates present.
pub fn scatter(table: &Table, x: Feature, y: Feature) -> Vec<ScatterPoint> {
    table
        .records()
        .iter()
        .filter_map(|r| {
            Some(ScatterPoint {
                id: r.id,
                job: r.job.clone(),
                x: x.value_of(r)?,
                y: y.value_of(r)?,
                left: r.left,
            })
        })
        .collect()
}

/// Population distribution of one feature with a selected employee placed on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDispersion {
    pub feature: Feature,
    pub employee_id: u64,
    pub employee_value: Option<f64>,
    /// Share of the population at or below the employee's value
    pub percentile: Option<f64>,
    pub histogram: Histogram,
}

impl FeatureDispersion {
    pub fn compute(table: &Table, employee: &EmployeeRecord, feature: Feature, bins: usize) -> Self {
        let values: Vec<f64> = table.records().iter().filter_map(|r| feature.value_of(r)).collect();
        let employee_value = feature.value_of(employee);
        let percentile = employee_value.filter(|_| !values.is_empty()).map(|v| {
            values.iter().filter(|x| **x <= v).count() as f64 / values.len() as f64
        });
        Self {
            feature,
            employee_id: employee.id,
            employee_value,
            percentile,
            histogram: Histogram::from_values(&values, bins),
        }
    }
}
