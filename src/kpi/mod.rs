//! Descriptive turnover KPIs over the employee table. Every aggregate is
//! defined on an empty table (zeros / empty groups) so callers never need to
//! special-case a missing dataset.

mod distribution;

pub use distribution::{histogram, scatter, Bin, FeatureDispersion, Histogram, ScatterPoint};

use crate::data::{EmployeeRecord, Table};
use crate::features::Feature;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Bins used by the dashboard histograms.
pub const DEFAULT_BINS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobFilter {
    #[default]
    All,
    Job(String),
}

impl JobFilter {
    pub fn from_option(job: Option<String>) -> Self {
        job.map_or(JobFilter::All, JobFilter::Job)
    }

    pub fn apply<'a>(&self, table: &'a Table) -> Cow<'a, Table> {
        match self {
            JobFilter::All => Cow::Borrowed(table),
            JobFilter::Job(job) => Cow::Owned(table.filter_job(job)),
        }
    }
}

/// Headline metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub headcount: usize,
    /// Share of employees who left, in percent
    pub turnover_rate_pct: f64,
    pub avg_satisfaction: f64,
    pub avg_monthly_hours: f64,
    pub satisfaction_left: Option<f64>,
    pub satisfaction_stay: Option<f64>,
    /// `stay − left`; 0 when either group is empty
    pub satisfaction_gap: f64,
}

impl KpiSummary {
    pub fn compute(table: &Table) -> Self {
        let rows = table.records();
        let satisfaction = |keep: fn(&EmployeeRecord) -> bool| {
            mean(rows.iter().filter(|r| keep(r)).filter_map(|r| r.satisfaction_level))
        };
        let satisfaction_left = satisfaction(|r| r.has_left());
        let satisfaction_stay = satisfaction(|r| !r.has_left());
        let satisfaction_gap = match (satisfaction_left, satisfaction_stay) {
            (Some(l), Some(s)) => s - l,
            _ => 0.0,
        };
        Self {
            headcount: rows.len(),
            turnover_rate_pct: mean(rows.iter().map(|r| f64::from(r.left))).unwrap_or(0.0) * 100.0,
            avg_satisfaction: satisfaction(|_| true).unwrap_or(0.0),
            avg_monthly_hours: mean(rows.iter().filter_map(|r| r.average_monthly_hours)).unwrap_or(0.0),
            satisfaction_left,
            satisfaction_stay,
            satisfaction_gap,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryTurnover {
    pub salary_encoded: f64,
    pub employees: usize,
    pub turnover_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobTurnover {
    pub job: String,
    pub total: usize,
    pub departures: usize,
    pub departure_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: f64,
    pub employees: usize,
    pub turnover_rate: f64,
}

/// Turnover rate per distinct value of one feature, with the overall rate as reference line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnoverCurve {
    pub feature: Feature,
    pub points: Vec<CurvePoint>,
    pub overall_rate: f64,
}

pub fn turnover_by_salary(table: &Table) -> Vec<SalaryTurnover> {
    group_rate(table, Feature::SalaryEncoded)
        .into_iter()
        .map(|p| SalaryTurnover {
            salary_encoded: p.x,
            employees: p.employees,
            turnover_rate: p.turnover_rate,
        })
        .collect()
}

/// Departures per job, absolute and as a rate; jobs sorted by name.
pub fn job_breakdown(table: &Table) -> Vec<JobTurnover> {
    table
        .jobs()
        .into_iter()
        .map(|job| {
            let (total, departures) = table
                .records()
                .iter()
                .filter(|r| r.job == job)
                .fold((0usize, 0usize), |(t, d), r| (t + 1, d + usize::from(r.left)));
            JobTurnover {
                departure_rate: departures as f64 / total as f64,
                job,
                total,
                departures,
            }
        })
        .collect()
}

pub fn turnover_curve(table: &Table, feature: Feature) -> TurnoverCurve {
    TurnoverCurve {
        feature,
        points: group_rate(table, feature),
        overall_rate: mean(table.records().iter().map(|r| f64::from(r.left))).unwrap_or(0.0),
    }
}

/// Everything the KPI page shows for one filter.
#[derive(Debug, Clone, Serialize)]
pub struct KpiReport {
    pub filter: JobFilter,
    pub jobs: Vec<String>,
    pub summary: KpiSummary,
    pub outcome_histogram: Histogram,
    pub satisfaction_histogram: Histogram,
    pub hours_histogram: Histogram,
    pub by_salary: Vec<SalaryTurnover>,
    pub by_job: Vec<JobTurnover>,
    pub hours_curve: TurnoverCurve,
    pub satisfaction_curve: TurnoverCurve,
}

impl KpiReport {
    pub fn build(table: &Table, filter: &JobFilter) -> Self {
        let view = filter.apply(table);
        let outcomes: Vec<f64> = view.records().iter().map(|r| f64::from(r.left)).collect();
        Self {
            filter: filter.clone(),
            jobs: table.jobs(),
            summary: KpiSummary::compute(&view),
            outcome_histogram: Histogram::from_values(&outcomes, 2),
            satisfaction_histogram: histogram(&view, Feature::SatisfactionLevel, DEFAULT_BINS),
            hours_histogram: histogram(&view, Feature::AverageMonthlyHours, DEFAULT_BINS),
            by_salary: turnover_by_salary(&view),
            by_job: job_breakdown(&view),
            hours_curve: turnover_curve(&view, Feature::AverageMonthlyHours),
            satisfaction_curve: turnover_curve(&view, Feature::SatisfactionLevel),
        }
    }
}

/// Mean of `left` grouped by exact feature value, ascending; missing cells skipped.
fn group_rate(table: &Table, feature: Feature) -> Vec<CurvePoint> {
    let mut pairs: Vec<(f64, u8)> = table
        .records()
        .iter()
        .filter_map(|r| feature.value_of(r).map(|v| (v, r.left)))
        .collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut points: Vec<CurvePoint> = Vec::new();
    let mut departures = 0usize;
    for (x, left) in pairs {
        if points.last().map_or(false, |p| p.x == x) {
            if let Some(p) = points.last_mut() {
                p.employees += 1;
            }
        } else {
            close(&mut points, departures);
            departures = 0;
            points.push(CurvePoint {
                x,
                employees: 1,
                turnover_rate: 0.0,
            });
        }
        departures += usize::from(left);
    }
    close(&mut points, departures);
    points
}

fn close(points: &mut [CurvePoint], departures: usize) {
    if let Some(p) = points.last_mut() {
        p.turnover_rate = departures as f64 / p.employees as f64;
    }
}

pub(crate) fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}
