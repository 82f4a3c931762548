//! Shared fixtures: small CSV tables, model artifacts and a scripted classifier.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use turnover_insight::config::AppConfig;
use turnover_insight::features::{Feature, FeatureVector};
use turnover_insight::model::{Capability, CapabilitySet, Classifier};
use turnover_insight::Result;

pub const HEADER: &str = "id_colab,job,satisfaction_level,last_evaluation,number_project,average_montly_hours,time_spend_company,work_accident,salary_encoded,left";

/// Three employees; id 2 is the unhappy, overworked leaver.
pub const THREE_ROWS: &str = "\
1,sales,0.8,0.9,4,190,3,0,1,0
2,hr,0.1,0.85,6,280,4,0,0,1
3,sales,0.6,0.7,3,160,2,1,2,0
";

pub const LOGISTIC_ARTIFACT: &str = r#"{
  "kind": "logistic_regression",
  "feature_names": ["satisfaction_level", "last_evaluation", "number_project",
                    "average_montly_hours", "time_spend_company", "work_accident", "salary_encoded"],
  "coef": [-4.0, 0.5, 0.3, 0.01, 0.25, -1.5, -0.7],
  "intercept": -1.0
}"#;

pub fn write_csv(dir: &Path, rows: &str) -> PathBuf {
    let path = dir.join("df_model.csv");
    std::fs::write(&path, format!("{HEADER}\n{rows}")).unwrap();
    path
}

pub fn write_model(dir: &Path, json: &str) -> PathBuf {
    let path = dir.join("model.json");
    std::fs::write(&path, json).unwrap();
    path
}

pub fn config(data: PathBuf, model: PathBuf) -> AppConfig {
    AppConfig {
        data_path: data,
        model_path: model,
        ..AppConfig::default()
    }
}

pub fn feature_names() -> Vec<String> {
    Feature::ALL.iter().map(|f| f.name().to_string()).collect()
}

/// Returns `[0.2, 0.8]` for satisfaction below 0.2, `[0.9, 0.1]` otherwise.
/// No decision function.
pub struct ScriptedClassifier {
    names: Vec<String>,
}

impl ScriptedClassifier {
    pub fn new() -> Self {
        Self {
            names: feature_names(),
        }
    }
}

impl Classifier for ScriptedClassifier {
    fn name(&self) -> &str {
        "scripted"
    }

    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::of(&[Capability::Predict, Capability::PredictProba])
    }

    fn feature_names(&self) -> &[String] {
        &self.names
    }

    fn predict(&self, x: &FeatureVector) -> Result<u8> {
        let [_, p1] = self.predict_proba(x)?;
        Ok(u8::from(p1 >= 0.5))
    }

    fn predict_proba(&self, x: &FeatureVector) -> Result<[f64; 2]> {
        if x.get(Feature::SatisfactionLevel) < 0.2 {
            Ok([0.2, 0.8])
        } else {
            Ok([0.9, 0.1])
        }
    }
}
