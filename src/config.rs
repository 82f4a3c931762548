//! Session configuration. Loaded from JSON; every section falls back to defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Env var naming the config file.
pub const CONFIG_PATH_ENV: &str = "TURNOVER_CONFIG_PATH";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Employee table (CSV)
    pub data_path: PathBuf,
    /// Serialized classifier (JSON artifact)
    pub model_path: PathBuf,
    /// Risk tier thresholds
    pub risk: RiskConfig,
    /// Attribution engine limits
    pub attribution: AttributionConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RiskConfig {
    /// Probability at or above this is at least Moderate
    pub moderate_threshold: f64,
    /// Probability at or above this is High
    pub high_threshold: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributionMethod {
    /// Closed form when the classifier is linear, exact enumeration otherwise
    Auto,
    Linear,
    Exact,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributionConfig {
    pub method: AttributionMethod,
    /// Upper bound on reference rows used as background
    pub max_background: usize,
    /// Seed for background sampling
    pub seed: u64,
    /// Wall-clock budget per explanation (milliseconds, 0 = unbounded)
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("df_model.csv"),
            model_path: PathBuf::from("logistic_model.json"),
            risk: RiskConfig::default(),
            attribution: AttributionConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            moderate_threshold: 0.30,
            high_threshold: 0.60,
        }
    }
}

impl Default for AttributionConfig {
    fn default() -> Self {
        Self {
            method: AttributionMethod::Auto,
            max_background: 100,
            seed: 42,
            timeout_ms: 5_000,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl RiskConfig {
    /// Thresholds must satisfy `0 <= moderate < high <= 1`.
    pub fn validate(&self) -> Result<(), String> {
        let (m, h) = (self.moderate_threshold, self.high_threshold);
        if !(m.is_finite() && h.is_finite()) {
            return Err("thresholds must be finite".to_string());
        }
        if !(0.0..=1.0).contains(&m) || !(0.0..=1.0).contains(&h) {
            return Err(format!("thresholds out of [0, 1]: moderate={m}, high={h}"));
        }
        if m >= h {
            return Err(format!("moderate threshold {m} must be below high threshold {h}"));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load from JSON file if present; otherwise return default.
    /// An invalid risk section is replaced by the default thresholds.
    pub fn load(path: &Path) -> Self {
        let mut config = Self::default();
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(data) => match serde_json::from_str::<AppConfig>(&data) {
                    Ok(c) => config = c,
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "config unparseable; using defaults")
                    }
                },
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "config unreadable; using defaults")
                }
            }
        }
        if let Err(reason) = config.risk.validate() {
            tracing::warn!(%reason, "invalid risk thresholds; using defaults");
            config.risk = RiskConfig::default();
        }
        config
    }

    /// Config path from `TURNOVER_CONFIG_PATH`, or `config.json`.
    pub fn default_path() -> PathBuf {
        std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.json"))
    }
}
