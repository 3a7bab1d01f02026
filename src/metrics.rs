//! Regression metrics and the JSON metrics report.

use crate::dataset::Table;
use crate::error::{PipelineError, Result};
use crate::model::linear::LinearModel;
use crate::model::{Fitted, InferenceModel};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn check_lengths(y_true: &[f64], y_pred: &[f64]) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(PipelineError::transform(
            "scoring",
            format!(
                "{} targets but {} predictions",
                y_true.len(),
                y_pred.len()
            ),
        ));
    }
    if y_true.is_empty() {
        return Err(PipelineError::transform("scoring", "no samples to score"));
    }
    Ok(())
}

/// Mean Squared Error: `mean((y_true - y_pred)^2)`. Never negative.
///
/// # Errors
/// [`PipelineError::Transform`] on empty or length-mismatched inputs.
pub fn mse(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    check_lengths(y_true, y_pred)?;
    let sum_sq: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(&t, &p)| (t - p).powi(2))
        .sum();
    Ok(sum_sq / y_true.len() as f64)
}

/// Coefficient of determination.
///
/// R² = 1 - (SS_res / SS_tot)
///
/// where:
/// - SS_res = sum((y_true - y_pred)^2)
/// - SS_tot = sum((y_true - mean(y_true))^2)
///
/// A constant `y_true` gives 1.0 for a perfect prediction and 0.0 otherwise.
/// Values are negative when the model does worse than the mean.
///
/// # Errors
/// [`PipelineError::Transform`] on empty or length-mismatched inputs.
pub fn r2(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    check_lengths(y_true, y_pred)?;
    let mean_true = y_true.iter().sum::<f64>() / y_true.len() as f64;

    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(&t, &p)| (t - p).powi(2))
        .sum();
    let ss_tot: f64 = y_true.iter().map(|&t| (t - mean_true).powi(2)).sum();

    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - ss_res / ss_tot)
}

/// The metrics report: `{"mse": .., "r2": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub mse: f64,
    pub r2: f64,
}

impl RegressionMetrics {
    pub fn calculate(y_true: &[f64], y_pred: &[f64]) -> Result<Self> {
        Ok(Self {
            mse: mse(y_true, y_pred)?,
            r2: r2(y_true, y_pred)?,
        })
    }
}

/// Predict every row of `table` and score against its `target` column.
///
/// Features are taken by the model's stored names, so column order and extra
/// columns in `table` do not matter.
pub fn score(
    model: &LinearModel<Fitted>,
    table: &Table,
    target: &str,
) -> Result<RegressionMetrics> {
    let y_true = table.target_vector(target)?;
    let x = table.feature_matrix(model.feature_names())?;
    let y_pred = model.predict_batch(&x)?;
    RegressionMetrics::calculate(&y_true.to_vec(), &y_pred.to_vec())
}

/// Write `metrics` as 2-space indented JSON, replacing any previous report.
pub fn save_report<P: AsRef<Path>>(metrics: &RegressionMetrics, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PipelineError::persist(path, e))?;
    }
    let json =
        serde_json::to_string_pretty(metrics).map_err(|e| PipelineError::persist(path, e))?;
    fs::write(path, json).map_err(|e| PipelineError::persist(path, e))
}
