//! Pipeline configuration loaded from `params.yaml`.
//!
//! The document is a nested key-value map. Every stage loads it on its own;
//! keys a stage does not touch may be absent. Path values are relative to the
//! project root handed to the stage (absolute paths are kept as-is).
//!
//! ```yaml
//! dataset:
//!   path: data/raw/houses.csv
//!   processed_data: data/processed/houses.csv
//!   test: data/test/houses_test.csv
//! model:
//!   linear: models/linear.bin
//! reports:
//!   metrics: reports/metrics.json
//! train:
//!   test_size: 0.2
//!   random_state: 42
//! ```

use crate::error::{PipelineError, Result};
use crate::preprocessing::imputation::ImputeStrategy;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the configuration document inside the project root.
pub const CONFIG_FILE: &str = "params.yaml";

/// Parsed configuration. Immutable once loaded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dataset: DatasetSettings,
    #[serde(default)]
    pub model: ModelSettings,
    #[serde(default)]
    pub reports: ReportSettings,
    #[serde(default)]
    pub train: TrainSettings,
    #[serde(default)]
    pub preprocess: PreprocessSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// `dataset.*` paths.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetSettings {
    /// Raw input read by the preprocessor.
    pub path: Option<PathBuf>,
    /// Imputed table written by the preprocessor and read by the trainer.
    pub processed_data: Option<PathBuf>,
    /// Held-out table read by the evaluator.
    pub test: Option<PathBuf>,
}

/// `model.*` paths.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Serialized linear model artifact.
    pub linear: Option<PathBuf>,
}

/// `reports.*` paths.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSettings {
    /// JSON metrics report written by the evaluator.
    pub metrics: Option<PathBuf>,
}

/// `train.*` settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainSettings {
    /// Fraction of rows held out for the diagnostic test split.
    #[serde(default = "default_test_size")]
    pub test_size: f64,

    /// Seed of the split shuffle.
    #[serde(default = "default_random_state")]
    pub random_state: u64,

    /// Name of the regression target column.
    #[serde(default = "default_target")]
    pub target: String,
}

fn default_test_size() -> f64 {
    0.2
}

fn default_random_state() -> u64 {
    42
}

fn default_target() -> String {
    "price".to_string()
}

impl Default for TrainSettings {
    fn default() -> Self {
        Self {
            test_size: default_test_size(),
            random_state: default_random_state(),
            target: default_target(),
        }
    }
}

/// `preprocess.*` settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessSettings {
    #[serde(default = "default_strategy")]
    pub strategy: ImputeStrategy,
}

fn default_strategy() -> ImputeStrategy {
    ImputeStrategy::Median
}

impl Default for PreprocessSettings {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
        }
    }
}

/// `logging.*` settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Directory (relative to the project root) holding one log file per stage.
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,

    /// Most verbose level written to console and file.
    #[serde(default = "default_level")]
    pub level: LevelFilter,
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_level() -> LevelFilter {
    LevelFilter::Debug
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            level: default_level(),
        }
    }
}

fn required<'a>(value: &'a Option<PathBuf>, key: &str) -> Result<&'a Path> {
    value
        .as_deref()
        .ok_or_else(|| PipelineError::MissingKey(key.to_string()))
}

impl Config {
    /// Parse a configuration document.
    pub fn from_yaml_str(content: &str, origin: &Path) -> Result<Self> {
        let config: Config =
            serde_yaml::from_str(content).map_err(|e| PipelineError::ConfigLoad {
                path: origin.to_path_buf(),
                reason: e.to_string(),
            })?;
        config.validate(origin)?;
        Ok(config)
    }

    fn validate(&self, origin: &Path) -> Result<()> {
        let test_size = self.train.test_size;
        if !(test_size > 0.0 && test_size < 1.0) {
            return Err(PipelineError::ConfigLoad {
                path: origin.to_path_buf(),
                reason: format!("train.test_size must be in (0, 1), got {test_size}"),
            });
        }
        if self.train.target.is_empty() {
            return Err(PipelineError::ConfigLoad {
                path: origin.to_path_buf(),
                reason: "train.target must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn raw_data_path(&self) -> Result<&Path> {
        required(&self.dataset.path, "dataset.path")
    }

    pub fn processed_data_path(&self) -> Result<&Path> {
        required(&self.dataset.processed_data, "dataset.processed_data")
    }

    pub fn test_data_path(&self) -> Result<&Path> {
        required(&self.dataset.test, "dataset.test")
    }

    pub fn model_path(&self) -> Result<&Path> {
        required(&self.model.linear, "model.linear")
    }

    pub fn metrics_path(&self) -> Result<&Path> {
        required(&self.reports.metrics, "reports.metrics")
    }
}

/// Read and parse the configuration document at `path`.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| PipelineError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Config::from_yaml_str(&content, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
dataset:
  path: data/raw/houses.csv
  processed_data: data/processed/houses.csv
  test: data/test/houses_test.csv
model:
  linear: models/linear.bin
reports:
  metrics: reports/metrics.json
train:
  test_size: 0.25
  random_state: 7
"#;

    fn origin() -> &'static Path {
        Path::new("params.yaml")
    }

    #[test]
    fn test_parse_full_document() {
        let config = Config::from_yaml_str(FULL, origin()).unwrap();
        assert_eq!(
            config.raw_data_path().unwrap(),
            Path::new("data/raw/houses.csv")
        );
        assert_eq!(
            config.model_path().unwrap(),
            Path::new("models/linear.bin")
        );
        assert_eq!(config.train.test_size, 0.25);
        assert_eq!(config.train.random_state, 7);
        assert_eq!(config.train.target, "price");
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_yaml_str("dataset:\n  path: raw.csv\n", origin()).unwrap();
        assert_eq!(config.train.test_size, 0.2);
        assert_eq!(config.train.random_state, 42);
        assert!(matches!(config.preprocess.strategy, ImputeStrategy::Median));
        assert_eq!(config.logging.dir, PathBuf::from("logs"));
        assert_eq!(config.logging.level, LevelFilter::Debug);
    }

    #[test]
    fn test_missing_key_reported_on_access() {
        let config = Config::from_yaml_str("dataset:\n  path: raw.csv\n", origin()).unwrap();
        match config.metrics_path() {
            Err(PipelineError::MissingKey(key)) => assert_eq!(key, "reports.metrics"),
            other => panic!("expected MissingKey, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_test_size_rejected() {
        let result = Config::from_yaml_str("train:\n  test_size: 1.5\n", origin());
        assert!(matches!(result, Err(PipelineError::ConfigLoad { .. })));
    }

    #[test]
    fn test_malformed_yaml_rejected() {
        let result = Config::from_yaml_str("dataset: [unclosed", origin());
        assert!(matches!(result, Err(PipelineError::ConfigLoad { .. })));
    }

    #[test]
    fn test_strategy_and_level_parsed() {
        let yaml = "preprocess:\n  strategy: mean\nlogging:\n  level: warn\n  dir: out/logs\n";
        let config = Config::from_yaml_str(yaml, origin()).unwrap();
        assert!(matches!(config.preprocess.strategy, ImputeStrategy::Mean));
        assert_eq!(config.logging.level, LevelFilter::Warn);
        assert_eq!(config.logging.dir, PathBuf::from("out/logs"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(dir.path().join("params.yaml"));
        assert!(matches!(result, Err(PipelineError::ConfigLoad { .. })));
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, FULL).unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(
            config.test_data_path().unwrap(),
            Path::new("data/test/houses_test.csv")
        );
    }
}
