//! Pipeline stages.
//!
//! Every stage has the same shape: load config, load inputs, transform,
//! persist outputs. A [`StageContext`] carries what all of them share: the
//! project root, the loaded configuration and the stage's logger. Failures
//! are logged with context and returned unchanged.

pub mod evaluate;
pub mod preprocess;
pub mod train;

use crate::config::{load_config, Config, LoggingSettings, CONFIG_FILE};
use crate::dataset::Table;
use crate::error::{PipelineError, Result};
use crate::logging::{self, StageLogger};
use std::fmt::Display;
use std::path::{Path, PathBuf};

/// Environment variable overriding the project root used by the binaries.
pub const ROOT_ENV: &str = "OLS_PIPELINE_ROOT";

/// Project root for the binaries: `$OLS_PIPELINE_ROOT`, else the working directory.
pub fn project_root() -> Result<PathBuf> {
    match std::env::var_os(ROOT_ENV) {
        Some(root) => Ok(PathBuf::from(root)),
        None => std::env::current_dir().map_err(|e| PipelineError::ConfigLoad {
            path: PathBuf::from("."),
            reason: format!("cannot determine working directory: {e}"),
        }),
    }
}

/// Shared state of one stage run.
#[derive(Debug)]
pub struct StageContext {
    root: PathBuf,
    config: Config,
    logger: StageLogger,
}

fn open_logger(name: &str, root: &Path, settings: &LoggingSettings) -> Result<StageLogger> {
    let dir = root.join(&settings.dir);
    logging::init(name, &dir, settings.level).map_err(|e| PipelineError::persist(dir, e))
}

impl StageContext {
    /// Load `<root>/params.yaml` and open the stage's log file.
    ///
    /// A configuration failure is still logged, to the default log directory,
    /// before it is returned.
    pub fn load(stage: &str, root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let config_path = root.join(CONFIG_FILE);
        let config = match load_config(&config_path) {
            Ok(config) => config,
            Err(err) => {
                if let Ok(logger) = open_logger(stage, &root, &LoggingSettings::default()) {
                    logger.error(format_args!("failed to load params: {err}"));
                }
                return Err(err);
            }
        };
        let logger = open_logger(stage, &root, &config.logging)?;
        logger.debug(format_args!("params loaded from {}", config_path.display()));
        Ok(Self {
            root,
            config,
            logger,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn logger(&self) -> &StageLogger {
        &self.logger
    }

    /// Resolve a configured path against the project root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    /// Resolve a required config path, logging the missing key on failure.
    pub(crate) fn config_path(
        &self,
        lookup: impl FnOnce(&Config) -> Result<&Path>,
    ) -> Result<PathBuf> {
        let relative = self.check("reading params", lookup(&self.config))?;
        Ok(self.resolve(relative))
    }

    /// Drop rows whose target is missing, warning with the count.
    pub(crate) fn drop_unlabelled(&self, table: &Table) -> Result<Table> {
        let target = &self.config.train.target;
        let (kept, dropped) = self.check("dropping rows", table.drop_missing_target(target))?;
        if dropped > 0 {
            self.logger
                .warn(format_args!("dropped {dropped} rows with missing `{target}`"));
        }
        Ok(kept)
    }

    /// Log `result`'s error under `context` and hand the result back.
    pub(crate) fn check<T>(&self, context: impl Display, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            self.logger.error(format_args!("{context} failed: {err}"));
        }
        result
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_opens_stage_log_under_root() {
        let dir = tempdir().unwrap();
        write_project(dir.path(), PARAMS, &[]);

        let ctx = StageContext::load("train", dir.path()).unwrap();
        assert_eq!(ctx.logger().path(), dir.path().join("logs").join("train.log"));
        assert_eq!(
            ctx.resolve(Path::new("models/linear.bin")),
            dir.path().join("models/linear.bin")
        );

        let log = fs::read_to_string(ctx.logger().path()).unwrap();
        assert!(log.contains("-train-DEBUG-params loaded from"));
    }

    #[test]
    fn test_missing_config_is_logged_and_returned() {
        let dir = tempdir().unwrap();
        let err = StageContext::load("evaluate", dir.path()).unwrap_err();
        assert!(matches!(err, PipelineError::ConfigLoad { .. }));

        let log = fs::read_to_string(dir.path().join("logs").join("evaluate.log")).unwrap();
        assert!(log.contains("-evaluate-ERROR-failed to load params"));
    }

    #[test]
    fn test_config_path_missing_key() {
        let dir = tempdir().unwrap();
        write_project(dir.path(), "train:\n  test_size: 0.3\n", &[]);
        let ctx = StageContext::load("preprocess", dir.path()).unwrap();

        let err = ctx.config_path(Config::raw_data_path).unwrap_err();
        assert!(matches!(err, PipelineError::MissingKey(ref key) if key == "dataset.path"));
        let log = fs::read_to_string(ctx.logger().path()).unwrap();
        assert!(log.contains("reading params failed"));
    }
}
