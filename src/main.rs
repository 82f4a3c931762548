//! Turnover Insight CLI: loads the session once, answers one request, prints JSON on stdout.
//! Logs and audit lines go to stderr.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use turnover_insight::{
    config::AppConfig,
    features::Feature,
    kpi::JobFilter,
    logging::{AuditEvent, StructuredLogger},
    session::Session,
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Parser)]
#[command(name = "turnover-insight", version, about = "Employee turnover KPIs and attrition risk")]
struct Cli {
    /// Config file (defaults to $TURNOVER_CONFIG_PATH or config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Employee table, overrides the config
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    /// Model artifact, overrides the config
    #[arg(long, global = true)]
    model: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// KPI summary, distributions and turnover breakdowns
    Kpi {
        /// Restrict to one job category
        #[arg(long)]
        job: Option<String>,
    },
    /// List employee ids
    Employees,
    /// Attrition risk for one employee
    Predict {
        #[arg(long)]
        id: u64,
        /// Include the per-feature attribution
        #[arg(long)]
        explain: bool,
    },
    /// Where one employee sits in the population for a feature
    Dispersion {
        #[arg(long)]
        id: u64,
        #[arg(long, value_parser = parse_feature)]
        feature: Feature,
    },
}

fn parse_feature(s: &str) -> Result<Feature, String> {
    s.parse::<Feature>().map_err(|e| e.to_string())
}

fn print_json(value: &impl serde::Serialize) -> Result<(), BoxError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_path);
    let mut config = AppConfig::load(&config_path);
    if let Some(p) = cli.data {
        config.data_path = p;
    }
    if let Some(p) = cli.model {
        config.model_path = p;
    }

    StructuredLogger::init(&config.log);
    info!(data = ?config.data_path, model = ?config.model_path, "turnover-insight starting");

    let session = Session::start(config);
    if let Some(e) = session.dataset_error() {
        tracing::warn!(error = %e, "KPIs reflect an empty dataset");
    }

    match cli.command {
        Command::Kpi { job } => print_json(&session.kpis(&JobFilter::from_option(job)))?,
        Command::Employees => print_json(&session.dataset().ids())?,
        Command::Predict { id, explain } => {
            let report = session.report(id, explain)?;
            let session_id = session.id().to_string();
            StructuredLogger::audit(
                &AuditEvent::prediction(&session_id, id, &report.risk),
                &mut std::io::stderr(),
            )?;
            print_json(&report)?;
            if let Err(e) = &report.risk {
                return Err(e.clone().into());
            }
        }
        Command::Dispersion { id, feature } => print_json(&session.dispersion(id, feature)?)?,
    }
    Ok(())
}
