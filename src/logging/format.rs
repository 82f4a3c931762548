//! Tracing setup plus one-line JSON audit records for predictions.

use serde::Serialize;
use std::io::Write;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;
use crate::error::Error;
use crate::risk::RiskAssessment;

/// One audit line per prediction request.
#[derive(Debug, Serialize)]
pub struct AuditEvent<'a> {
    pub ts: String,
    pub session: &'a str,
    pub kind: &'a str,
    pub employee_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_tier: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
}

impl<'a> AuditEvent<'a> {
    pub fn prediction(session: &'a str, employee_id: u64, outcome: &'a Result<RiskAssessment, Error>) -> Self {
        let (probability, risk_tier, error) = match outcome {
            Ok(a) => (Some(a.probability), Some(a.risk_tier.label()), None),
            Err(e) => (None, None, Some(e.tag())),
        };
        Self {
            ts: chrono::Utc::now().to_rfc3339(),
            session,
            kind: "prediction",
            employee_id,
            probability,
            risk_tier,
            error,
        }
    }
}

/// Process-wide tracing setup. Stdout carries command output only, so every
/// log line goes to stderr.
pub struct StructuredLogger;

impl StructuredLogger {
    /// `RUST_LOG` wins over `config.level`; `config.json` selects ndjson lines.
    pub fn init(config: &LogConfig) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
        let registry = tracing_subscriber::registry().with(filter);
        let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        if config.json {
            registry.with(layer.json().with_span_events(FmtSpan::NONE)).init();
        } else {
            registry.with(layer).init();
        }
    }

    /// Append one audit record as a single JSON line.
    pub fn audit(event: &AuditEvent<'_>, w: &mut impl Write) -> std::io::Result<()> {
        let line = serde_json::to_string(event)?;
        writeln!(w, "{line}")
    }
}
