//! Attrition risk scoring.

mod engine;

pub use engine::{RiskAssessment, RiskScorer, RiskTier};
