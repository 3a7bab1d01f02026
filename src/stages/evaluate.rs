//! Evaluator: model artifact + held-out dataset -> metrics report.

use crate::config::Config;
use crate::dataset::{load_table, Table};
use crate::error::{PipelineError, Result};
use crate::metrics::{self, RegressionMetrics};
use crate::model::linear::LinearModel;
use crate::model::{Fitted, InferenceModel};
use crate::stages::StageContext;

pub const STAGE_NAME: &str = "evaluate";

/// Score `model` on `table`.
///
/// The target column is checked before anything else; feature columns are
/// matched by the names stored in the model.
pub fn score(
    ctx: &StageContext,
    model: &LinearModel<Fitted>,
    table: &Table,
) -> Result<RegressionMetrics> {
    let target = &ctx.config().train.target;
    if table.column(target).is_none() {
        return ctx.check(
            "scoring",
            Err(PipelineError::Schema(format!(
                "test data has no target column `{target}`"
            ))),
        );
    }
    let table = ctx.drop_unlabelled(table)?;
    ctx.check("scoring", metrics::score(model, &table, target))
}

/// Run the stage: load `model.linear` and `dataset.test`, write the report
/// to `reports.metrics`.
pub fn run(ctx: &StageContext) -> Result<RegressionMetrics> {
    let logger = ctx.logger();
    let model_path = ctx.config_path(Config::model_path)?;
    let test_path = ctx.config_path(Config::test_data_path)?;
    let report_path = ctx.config_path(Config::metrics_path)?;

    let model = ctx.check(
        format_args!("loading model from {}", model_path.display()),
        LinearModel::<Fitted>::load_from_file(&model_path),
    )?;
    logger.debug(format_args!("model loaded from {}", model_path.display()));

    let test = ctx.check(
        format_args!("loading data from {}", test_path.display()),
        load_table(&test_path),
    )?;
    logger.debug(format_args!("test data loaded from {}", test_path.display()));

    let scores = score(ctx, &model, &test)?;
    logger.info(format_args!("mse={} r2={}", scores.mse, scores.r2));

    ctx.check(
        format_args!("saving report to {}", report_path.display()),
        metrics::save_report(&scores, &report_path),
    )?;
    logger.debug(format_args!("metrics saved in {}", report_path.display()));
    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::linear::LinearParams;
    use crate::stages::test_support::*;
    use ndarray::array;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn save_model(root: &Path) {
        let model = LinearModel::<Fitted>::new(LinearParams {
            feature_names: vec!["sqft".to_string(), "rooms".to_string()],
            coefficients: array![100.0, 1000.0],
            intercept: 5000.0,
        });
        model.save_to_file(root.join("models/linear.bin")).unwrap();
    }

    #[test]
    fn test_run_writes_report() {
        let dir = tempdir().unwrap();
        // columns reordered plus an extra one; one unlabelled row
        let test_csv = "rooms,city,sqft,price\n2,a,1000,107000\n3,b,2000,208000\n4,c,1500,\n";
        write_project(dir.path(), PARAMS, &[("data/test/houses_test.csv", test_csv)]);
        save_model(dir.path());
        let ctx = StageContext::load(STAGE_NAME, dir.path()).unwrap();

        let scores = run(&ctx).unwrap();
        assert_eq!(scores, RegressionMetrics { mse: 0.0, r2: 1.0 });

        let report = fs::read_to_string(dir.path().join("reports/metrics.json")).unwrap();
        assert_eq!(report, "{\n  \"mse\": 0.0,\n  \"r2\": 1.0\n}");
    }

    #[test]
    fn test_missing_target_is_schema_error_before_scoring() {
        let dir = tempdir().unwrap();
        write_project(
            dir.path(),
            PARAMS,
            &[("data/test/houses_test.csv", "sqft,rooms\n1000,2\n")],
        );
        save_model(dir.path());
        let ctx = StageContext::load(STAGE_NAME, dir.path()).unwrap();

        let err = run(&ctx).unwrap_err();
        assert!(matches!(err, PipelineError::Schema(ref msg) if msg.contains("`price`")));
        assert!(!dir.path().join("reports/metrics.json").exists());
    }

    #[test]
    fn test_missing_feature_is_schema_error() {
        let dir = tempdir().unwrap();
        write_project(
            dir.path(),
            PARAMS,
            &[("data/test/houses_test.csv", "sqft,price\n1000,1\n")],
        );
        save_model(dir.path());
        let ctx = StageContext::load(STAGE_NAME, dir.path()).unwrap();
        assert!(matches!(run(&ctx), Err(PipelineError::Schema(_))));
    }

    #[test]
    fn test_missing_model_is_data_load_error() {
        let dir = tempdir().unwrap();
        write_project(
            dir.path(),
            PARAMS,
            &[("data/test/houses_test.csv", "sqft,price\n1000,1\n")],
        );
        let ctx = StageContext::load(STAGE_NAME, dir.path()).unwrap();

        assert!(matches!(run(&ctx), Err(PipelineError::DataLoad { .. })));
        let log = fs::read_to_string(ctx.logger().path()).unwrap();
        assert!(log.contains("-ERROR-loading model from"));
    }

    #[test]
    fn test_non_finite_feature_aborts_without_report() {
        let dir = tempdir().unwrap();
        write_project(
            dir.path(),
            PARAMS,
            &[("data/test/houses_test.csv", "sqft,rooms,price\n1,1,2\ninf,2,6\n")],
        );
        save_model(dir.path());
        let ctx = StageContext::load(STAGE_NAME, dir.path()).unwrap();

        assert!(matches!(run(&ctx), Err(PipelineError::Transform { .. })));
        assert!(!dir.path().join("reports/metrics.json").exists());
    }
}
