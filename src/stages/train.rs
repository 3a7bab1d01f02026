//! Trainer: processed dataset -> seeded split -> OLS fit -> model artifact.

use crate::config::Config;
use crate::dataset::{load_table, train_test_split, Table};
use crate::error::Result;
use crate::metrics::{self, RegressionMetrics};
use crate::model::linear::{FitReport, LinearModel, LinearRegression};
use crate::model::{Fitted, InferenceModel};
use crate::stages::StageContext;
use std::path::PathBuf;

pub const STAGE_NAME: &str = "train";

/// What a training run produced.
#[derive(Debug, Clone)]
pub struct TrainSummary {
    pub n_train: usize,
    pub n_test: usize,
    pub fit: FitReport,
    /// Diagnostic scores on the held-out split. Not persisted.
    pub metrics: RegressionMetrics,
    pub model_path: PathBuf,
}

/// Fit OLS of the target against every other column of `train`.
pub fn fit(ctx: &StageContext, train: &Table) -> Result<(LinearModel<Fitted>, FitReport)> {
    let target = &ctx.config().train.target;
    let (names, x, y) = ctx.check(
        "building training matrix",
        train.features_and_target(target),
    )?;
    let (model, report) = ctx.check("fit", LinearRegression::new().fit(&names, &x, &y))?;

    for feature in &report.dependent_features {
        ctx.logger().warn(format_args!(
            "feature `{feature}` is constant or linearly dependent on other features, \
             coefficient set to 0"
        ));
    }
    ctx.logger().debug(format_args!(
        "fitted on {} rows, rank {}, intercept {}",
        report.n_samples,
        report.rank,
        model.intercept()
    ));
    Ok((model, report))
}

/// Run the stage: load `dataset.processed_data`, split, fit, print
/// diagnostics and write the model to `model.linear`.
pub fn run(ctx: &StageContext) -> Result<TrainSummary> {
    let logger = ctx.logger();
    let settings = &ctx.config().train;
    let data_path = ctx.config_path(Config::processed_data_path)?;
    let model_path = ctx.config_path(Config::model_path)?;

    let data = ctx.check(
        format_args!("loading data from {}", data_path.display()),
        load_table(&data_path),
    )?;
    logger.debug("loaded data for training successfully");
    let data = ctx.drop_unlabelled(&data)?;

    let (train, test) = ctx.check(
        format_args!(
            "splitting with test_size={} random_state={}",
            settings.test_size, settings.random_state
        ),
        train_test_split(&data, settings.test_size, settings.random_state),
    )?;
    logger.debug(format_args!(
        "split into {} train and {} test rows",
        train.n_rows(),
        test.n_rows()
    ));

    let (model, fit_report) = fit(ctx, &train)?;
    let scores = ctx.check("scoring", metrics::score(&model, &test, &settings.target))?;

    println!("mse is {}", scores.mse);
    println!("r2 score is {}", scores.r2);
    logger.info(format_args!("mse={} r2={}", scores.mse, scores.r2));

    ctx.check(
        format_args!("saving model to {}", model_path.display()),
        model.save_to_file(&model_path),
    )?;
    logger.debug(format_args!("model saved in {}", model_path.display()));

    Ok(TrainSummary {
        n_train: train.n_rows(),
        n_test: test.n_rows(),
        fit: fit_report,
        metrics: scores,
        model_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::stages::test_support::*;
    use std::fs;
    use tempfile::tempdir;

    fn line_csv(n: usize) -> String {
        // price = 150 * sqft + 50000, exactly
        let mut csv = String::from("sqft,price\n");
        for i in 0..n {
            let sqft = 800 + 100 * i;
            csv.push_str(&format!("{sqft},{}\n", 150 * sqft + 50000));
        }
        csv
    }

    #[test]
    fn test_run_fits_and_saves() {
        let dir = tempdir().unwrap();
        let csv = line_csv(10);
        write_project(dir.path(), PARAMS, &[("data/processed/houses.csv", &csv)]);
        let ctx = StageContext::load(STAGE_NAME, dir.path()).unwrap();

        let summary = run(&ctx).unwrap();
        assert_eq!((summary.n_train, summary.n_test), (8, 2));
        assert!(summary.fit.dependent_features.is_empty());
        assert!(summary.metrics.mse < 1e-6);
        assert_eq!(summary.model_path, dir.path().join("models/linear.bin"));

        let model = LinearModel::<Fitted>::load_from_file(&summary.model_path).unwrap();
        assert_eq!(model.feature_names(), &["sqft".to_string()]);
        assert!((model.coefficients()[0] - 150.0).abs() < 1e-6);
        assert!((model.intercept() - 50000.0).abs() < 1e-3);
    }

    #[test]
    fn test_run_drops_unlabelled_rows() {
        let dir = tempdir().unwrap();
        let mut csv = line_csv(10);
        csv.push_str("1234,\n");
        write_project(dir.path(), PARAMS, &[("data/processed/houses.csv", &csv)]);
        let ctx = StageContext::load(STAGE_NAME, dir.path()).unwrap();

        let summary = run(&ctx).unwrap();
        assert_eq!(summary.n_train + summary.n_test, 10);
        let log = fs::read_to_string(ctx.logger().path()).unwrap();
        assert!(log.contains("-WARNING-dropped 1 rows with missing `price`"));
    }

    #[test]
    fn test_run_warns_on_dependent_feature() {
        let dir = tempdir().unwrap();
        let mut csv = String::from("sqft,sqm,price\n");
        for i in 0..10 {
            let sqft = 800 + 100 * i;
            csv.push_str(&format!("{sqft},{},{}\n", 2 * sqft, 150 * sqft + (i % 3) * 1000));
        }
        write_project(dir.path(), PARAMS, &[("data/processed/houses.csv", &csv)]);
        let ctx = StageContext::load(STAGE_NAME, dir.path()).unwrap();

        let summary = run(&ctx).unwrap();
        assert_eq!(summary.fit.dependent_features, vec!["sqm".to_string()]);
        let log = fs::read_to_string(ctx.logger().path()).unwrap();
        assert!(log.contains("feature `sqm` is constant or linearly dependent"));
    }

    #[test]
    fn test_run_missing_target_column() {
        let dir = tempdir().unwrap();
        write_project(
            dir.path(),
            PARAMS,
            &[("data/processed/houses.csv", "sqft,rooms\n1,2\n3,4\n")],
        );
        let ctx = StageContext::load(STAGE_NAME, dir.path()).unwrap();
        assert!(matches!(run(&ctx), Err(PipelineError::Schema(_))));
    }

    #[test]
    fn test_save_failure_is_reported() {
        let dir = tempdir().unwrap();
        let csv = line_csv(10);
        write_project(dir.path(), PARAMS, &[("data/processed/houses.csv", &csv)]);
        // a regular file where the model directory should be
        fs::write(dir.path().join("models"), "not a directory").unwrap();
        let ctx = StageContext::load(STAGE_NAME, dir.path()).unwrap();

        let err = run(&ctx).unwrap_err();
        assert!(matches!(err, PipelineError::Persist { .. }));
        let log = fs::read_to_string(ctx.logger().path()).unwrap();
        assert!(log.contains("-ERROR-saving model to"));
    }

    #[test]
    fn test_run_rejects_non_finite_feature() {
        let dir = tempdir().unwrap();
        let mut csv = line_csv(5);
        csv.push_str("inf,100000\n");
        write_project(dir.path(), PARAMS, &[("data/processed/houses.csv", &csv)]);
        let ctx = StageContext::load(STAGE_NAME, dir.path()).unwrap();

        let err = run(&ctx).unwrap_err();
        assert!(matches!(err, PipelineError::Transform { .. }));
        assert!(!dir.path().join("models/linear.bin").exists());
    }

    #[test]
    fn test_run_empty_table_fails_on_split() {
        let dir = tempdir().unwrap();
        write_project(dir.path(), PARAMS, &[("data/processed/houses.csv", "sqft,price\n")]);
        let ctx = StageContext::load(STAGE_NAME, dir.path()).unwrap();

        assert!(matches!(
            run(&ctx),
            Err(PipelineError::Transform { operation: "split", .. })
        ));
    }
}
