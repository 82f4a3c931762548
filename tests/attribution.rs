//! Integration test: additive attribution, explainer agreement, reproducibility.

mod common;

use common::*;
use proptest::prelude::*;
use std::sync::Arc;
use turnover_insight::config::{AttributionConfig, AttributionMethod};
use turnover_insight::data::{load_dataset, EmployeeRecord};
use turnover_insight::explain::{Explainer, OutputSpace};
use turnover_insight::features::{Feature, FeatureVector, ReferencePopulation};
use turnover_insight::model::{Classifier, LogisticModel, Scaler};
use turnover_insight::{AttributionEngine, Error, Session, Table};

fn scaled_logistic() -> LogisticModel {
    let scaler = Scaler {
        mean: vec![0.6, 0.7, 3.8, 200.0, 3.5, 0.15, 0.6],
        scale: vec![0.25, 0.17, 1.2, 50.0, 1.4, 0.35, 0.6],
    };
    LogisticModel::new(
        feature_names(),
        &[-1.1, 0.2, -0.3, 0.25, 0.4, -0.5, -0.4],
        -1.3,
        Some(&scaler),
        0.5,
    )
    .unwrap()
}

fn population(n: u64) -> Table {
    let records = (0..n)
        .map(|i| {
            let f = i as f64;
            EmployeeRecord {
                id: i + 1,
                job: if i % 3 == 0 { "hr" } else { "sales" }.to_string(),
                satisfaction_level: Some((f * 0.137) % 1.0),
                last_evaluation: Some(0.4 + (f * 0.071) % 0.6),
                project_count: Some((2 + i % 6) as f64),
                average_monthly_hours: Some(100.0 + (f * 17.0) % 200.0),
                tenure_years: Some((1 + i % 8) as f64),
                work_accident: Some((i % 7 == 0) as u8 as f64),
                salary_encoded: Some((i % 3) as f64),
                left: (i % 4 == 0) as u8,
            }
        })
        .collect();
    Table::from_records(records).unwrap()
}

fn engine(method: AttributionMethod) -> AttributionEngine {
    AttributionEngine::new(AttributionConfig {
        method,
        timeout_ms: 0,
        ..AttributionConfig::default()
    })
}

#[test]
fn linear_attribution_is_additive_in_log_odds() {
    let model = scaled_logistic();
    let reference = ReferencePopulation::from_table(&population(40));
    let x = FeatureVector::new([0.1, 0.85, 6.0, 280.0, 4.0, 0.0, 0.0]).unwrap();

    let r = engine(AttributionMethod::Auto).explain(&model, &reference, &x).unwrap();
    assert_eq!(r.explainer, Explainer::Linear);
    assert_eq!(r.output_space, OutputSpace::Raw);
    assert_eq!(r.contributions.len(), 7);
    assert!((r.output - model.decision_function(&x).unwrap()).abs() < 1e-9);
    assert!(r.additivity_gap() < 1e-9);
}

#[test]
fn exact_and_linear_agree_on_linear_models() {
    let model = scaled_logistic();
    let reference = ReferencePopulation::from_table(&population(25));
    let x = FeatureVector::new([0.3, 0.9, 5.0, 250.0, 6.0, 1.0, 2.0]).unwrap();

    let lin = engine(AttributionMethod::Linear).explain(&model, &reference, &x).unwrap();
    let ex = engine(AttributionMethod::Exact).explain(&model, &reference, &x).unwrap();
    assert_eq!(ex.explainer, Explainer::Exact);
    assert!((lin.baseline - ex.baseline).abs() < 1e-9);
    for (a, b) in lin.contributions.iter().zip(&ex.contributions) {
        assert_eq!(a.feature, b.feature);
        assert!((a.contribution - b.contribution).abs() < 1e-9, "{a:?} vs {b:?}");
    }
}

#[test]
fn exact_attribution_without_decision_function_uses_probability() {
    let model = ScriptedClassifier::new();
    let reference = ReferencePopulation::from_table(&population(30));
    let x = FeatureVector::new([0.1, 0.85, 6.0, 280.0, 4.0, 0.0, 0.0]).unwrap();

    let r = engine(AttributionMethod::Auto).explain(&model, &reference, &x).unwrap();
    assert_eq!(r.explainer, Explainer::Exact);
    assert_eq!(r.output_space, OutputSpace::Probability);
    assert!((r.output - 0.8).abs() < 1e-12);
    assert!(r.additivity_gap() < 1e-9);
    // only satisfaction drives the scripted model
    assert_eq!(r.ranked()[0].feature, Feature::SatisfactionLevel);
    for c in r.contributions.iter().filter(|c| c.feature != Feature::SatisfactionLevel) {
        assert!(c.contribution.abs() < 1e-12);
    }
}

#[test]
fn linear_method_on_non_linear_model_fails() {
    let reference = ReferencePopulation::from_table(&population(5));
    let x = FeatureVector::new([0.5; 7]).unwrap();
    let err = engine(AttributionMethod::Linear)
        .explain(&ScriptedClassifier::new(), &reference, &x)
        .unwrap_err();
    assert!(matches!(err, Error::AttributionFailure(_)));
}

#[test]
fn empty_reference_fails_without_touching_risk() {
    let dir = tempfile::tempdir().unwrap();
    let rows = "1,sales,0.8,0.9,4,,3,0,1,0\n";
    let table = load_dataset(&write_csv(dir.path(), rows)).unwrap();
    let cfg = config(dir.path().join("df_model.csv"), dir.path().join("unused.json"));
    let session = Session::from_parts(cfg, table, Arc::new(scaled_logistic())).unwrap();
    assert!(session.reference().is_empty());
    let x = FeatureVector::new([0.5; 7]).unwrap();
    assert!(session.assess_features(&x).is_ok());

    let err = engine(AttributionMethod::Auto)
        .explain(&scaled_logistic(), session.reference(), &x)
        .unwrap_err();
    assert!(matches!(err, Error::AttributionFailure(ref m) if m.contains("empty")));
}

#[test]
fn report_isolates_per_request_failures() {
    let dir = tempfile::tempdir().unwrap();
    // employee 1 is complete, employee 2 is not, so the reference has one row
    let rows = "1,sales,0.8,0.9,4,190,3,0,1,0\n2,hr,0.1,0.85,6,,4,0,0,1\n";
    let mut cfg = config(
        write_csv(dir.path(), rows),
        write_model(dir.path(), LOGISTIC_ARTIFACT),
    );
    cfg.attribution.method = AttributionMethod::Linear;
    let session = Session::start(cfg);

    let report = session.report(1, true).unwrap();
    assert!(report.risk.is_ok());
    assert!(report.attribution.as_ref().unwrap().is_ok());

    let report = session.report(2, true).unwrap();
    assert!(matches!(report.risk, Err(Error::FeatureVectorInvalid(_))));
    assert!(matches!(report.attribution, Some(Err(Error::FeatureVectorInvalid(_)))));
}

#[test]
fn sampled_reference_is_reproducible() {
    let table = population(500);
    let a = ReferencePopulation::sampled(&table, 50, 42);
    let b = ReferencePopulation::sampled(&table, 50, 42);
    assert_eq!(a.len(), 50);
    assert_eq!(a.rows(), b.rows());
    assert_eq!(ReferencePopulation::sampled(&table, 0, 42).len(), 500);
    assert_eq!(ReferencePopulation::sampled(&table, 1_000, 42).len(), 500);
}

#[test]
fn explanation_is_idempotent_through_session() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(
        write_csv(dir.path(), THREE_ROWS),
        write_model(dir.path(), LOGISTIC_ARTIFACT),
    );
    let session = Session::start(cfg);
    let first = session.explain(2).unwrap();
    assert_eq!(first, session.explain(2).unwrap());
    assert_eq!(first.background_size, 3);
    // satisfaction 0.1 against a mean of 0.5 dominates
    assert_eq!(first.ranked()[0].feature, Feature::SatisfactionLevel);
}

fn feature_vector() -> impl Strategy<Value = FeatureVector> {
    (0.0..=1.0f64, 0.3..=1.0f64, 2.0..=7.0f64, 90.0..=320.0f64, 1.0..=10.0f64, 0.0..=1.0f64, 0.0..=2.0f64)
        .prop_map(|(a, b, c, d, e, f, g)| FeatureVector::new([a, b, c, d, e, f, g]).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn exact_attribution_is_additive(x in feature_vector()) {
        let reference = ReferencePopulation::from_table(&population(8));
        let r = engine(AttributionMethod::Exact).explain(&scaled_logistic(), &reference, &x).unwrap();
        prop_assert!(r.additivity_gap() < 1e-9);
    }
}

#[test]
fn attribution_failure_leaves_assessment_intact() {
    let dir = tempfile::tempdir().unwrap();
    let table = load_dataset(&write_csv(dir.path(), THREE_ROWS)).unwrap();
    let mut cfg = config(dir.path().join("df_model.csv"), dir.path().join("unused.json"));
    cfg.attribution.method = AttributionMethod::Linear;
    let session = Session::from_parts(cfg, table, Arc::new(ScriptedClassifier::new())).unwrap();

    let report = session.report(2, true).unwrap();
    assert_eq!(report.risk.as_ref().unwrap().probability, 0.8);
    assert!(matches!(report.attribution, Some(Err(Error::AttributionFailure(_)))));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["risk"]["ok"]["risk_tier"], "high");
    assert_eq!(json["attribution"]["error"]["kind"], "attribution_failure");
}

/// Scripted classifier that takes a few milliseconds per call.
struct Slow(ScriptedClassifier);

impl Classifier for Slow {
    fn name(&self) -> &str {
        "slow"
    }
    fn capabilities(&self) -> turnover_insight::model::CapabilitySet {
        self.0.capabilities()
    }
    fn feature_names(&self) -> &[String] {
        self.0.feature_names()
    }
    fn predict(&self, x: &FeatureVector) -> turnover_insight::Result<u8> {
        self.0.predict(x)
    }
    fn predict_proba(&self, x: &FeatureVector) -> turnover_insight::Result<[f64; 2]> {
        std::thread::sleep(std::time::Duration::from_millis(2));
        self.0.predict_proba(x)
    }
}

#[test]
fn exact_attribution_past_deadline_fails() {
    let reference = ReferencePopulation::from_table(&population(5));
    let x = FeatureVector::new([0.1, 0.85, 6.0, 280.0, 4.0, 0.0, 0.0]).unwrap();
    let engine = AttributionEngine::new(AttributionConfig {
        method: AttributionMethod::Exact,
        timeout_ms: 1,
        ..AttributionConfig::default()
    });
    let err = engine.explain(&Slow(ScriptedClassifier::new()), &reference, &x).unwrap_err();
    assert!(matches!(err, Error::AttributionFailure(ref m) if m.contains("deadline")), "{err:?}");

    // scoring the same employee is unaffected
    let scorer = turnover_insight::RiskScorer::new(Default::default());
    assert!(scorer.score(&Slow(ScriptedClassifier::new()), &x).is_ok());
}
