//! Turnover Insight: employee turnover analytics.
//!
//! Modular structure:
//! - [`data`]: Employee table loading (CSV)
//! - [`features`]: Ordered classifier input and the reference population
//! - [`model`]: Capability-typed classifier and artifact loader
//! - [`risk`]: Probability → risk tier scoring
//! - [`explain`]: Additive per-feature attribution
//! - [`kpi`]: Descriptive turnover aggregates
//! - [`insights`]: Retention signals and recommendations
//! - [`session`]: Load-once session state tying it together
//! - [`logging`]: Structured logging

pub mod config;
pub mod error;
pub mod data;
pub mod features;
pub mod model;
pub mod risk;
pub mod explain;
pub mod kpi;
pub mod insights;
pub mod session;
pub mod logging;

pub use config::AppConfig;
pub use error::{Error, ErrorKind, Result};
pub use data::{EmployeeRecord, Table};
pub use features::{Feature, FeatureVector, ReferencePopulation};
pub use model::{Classifier, LoadedModel};
pub use risk::{RiskAssessment, RiskScorer, RiskTier};
pub use explain::{AttributionEngine, AttributionResult};
pub use kpi::{JobFilter, KpiReport, KpiSummary};
pub use session::{EmployeeReport, Session};
pub use logging::StructuredLogger;
