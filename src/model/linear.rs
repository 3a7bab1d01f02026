//! Ordinary least-squares linear regression.
//!
//! The model carries its training state in the type:
//! - [`LinearRegression`] = `LinearModel<Unfitted>`: can only be fitted.
//! - `LinearModel<Fitted>`: predicts and (de)serializes.
//!
//! Fitting centers features and target, solves the centered least-squares
//! problem with Householder QR and recovers the intercept from the means:
//! `intercept = mean(y) - mean(x) · coefficients`. No regularization, no
//! feature scaling.

pub use crate::model::{Fitted, InferenceModel, Unfitted};
use crate::error::{PipelineError, Result};
use crate::model::lstsq::lstsq;
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Parameters of a linear model: `y = x · coefficients + intercept`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearParams {
    /// Names of the feature columns, in coefficient order.
    pub feature_names: Vec<String>,
    pub coefficients: Array1<f64>,
    pub intercept: f64,
}

/// Serializable representation of [`LinearParams`].
///
/// Plain `Vec<f64>` storage; values round-trip bit for bit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializableLinearParams {
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl From<&LinearParams> for SerializableLinearParams {
    fn from(params: &LinearParams) -> Self {
        Self {
            feature_names: params.feature_names.clone(),
            coefficients: params.coefficients.to_vec(),
            intercept: params.intercept,
        }
    }
}

impl TryFrom<SerializableLinearParams> for LinearParams {
    type Error = PipelineError;

    fn try_from(value: SerializableLinearParams) -> Result<Self> {
        if value.feature_names.len() != value.coefficients.len() {
            return Err(PipelineError::Schema(format!(
                "model has {} feature names but {} coefficients",
                value.feature_names.len(),
                value.coefficients.len()
            )));
        }
        Ok(Self {
            feature_names: value.feature_names,
            coefficients: Array1::from(value.coefficients),
            intercept: value.intercept,
        })
    }
}

/// Summary of a fit, for logging.
#[derive(Debug, Clone, Default)]
pub struct FitReport {
    pub n_samples: usize,
    /// Effective rank of the centered design matrix.
    pub rank: usize,
    /// Feature columns linearly dependent on earlier ones; their coefficient is 0.
    pub dependent_features: Vec<String>,
}

/// A linear model with its state encoded at the type level.
#[derive(Debug, Clone)]
pub struct LinearModel<S> {
    params: LinearParams,
    _state: PhantomData<S>,
}

/// Alias for an **unfitted** linear regression model.
pub type LinearRegression = LinearModel<Unfitted>;

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    pub fn new() -> Self {
        Self {
            params: LinearParams {
                feature_names: Vec::new(),
                coefficients: Array1::zeros(0),
                intercept: 0.0,
            },
            _state: PhantomData,
        }
    }

    /// Fit `y ≈ x · coefficients + intercept` by least squares.
    ///
    /// `feature_names` labels the columns of `x` and is stored in the fitted model.
    ///
    /// # Errors
    /// [`PipelineError::Transform`] when shapes disagree or there are no samples.
    pub fn fit(
        self,
        feature_names: &[String],
        x: &Array2<f64>,
        y: &Array1<f64>,
    ) -> Result<(LinearModel<Fitted>, FitReport)> {
        let (n_samples, n_features) = x.dim();
        if feature_names.len() != n_features {
            return Err(PipelineError::transform(
                "fit",
                format!(
                    "{} feature names for {n_features} feature columns",
                    feature_names.len()
                ),
            ));
        }
        if y.len() != n_samples {
            return Err(PipelineError::transform(
                "fit",
                format!("{n_samples} samples but {} targets", y.len()),
            ));
        }

        let x_mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| PipelineError::transform("fit", "no samples"))?;
        let y_mean = y
            .mean()
            .ok_or_else(|| PipelineError::transform("fit", "no samples"))?;

        let x_centered = x - &x_mean;
        let y_centered = y - y_mean;
        let solution = lstsq(&x_centered, &y_centered)?;

        let intercept = y_mean - x_mean.dot(&solution.coefficients);
        let report = FitReport {
            n_samples,
            rank: solution.rank,
            dependent_features: solution
                .dropped
                .iter()
                .map(|&j| feature_names[j].clone())
                .collect(),
        };

        let params = LinearParams {
            feature_names: feature_names.to_vec(),
            coefficients: solution.coefficients,
            intercept,
        };
        Ok((LinearModel::<Fitted>::new(params), report))
    }
}

impl LinearModel<Fitted> {
    /// Creates a fitted model from known parameters.
    pub fn new(params: LinearParams) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }

    pub fn params(&self) -> &LinearParams {
        &self.params
    }

    pub fn feature_names(&self) -> &[String] {
        &self.params.feature_names
    }

    pub fn coefficients(&self) -> &Array1<f64> {
        &self.params.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.params.intercept
    }
}

/// Batch inference: `x · coefficients + intercept`, one prediction per row.
impl InferenceModel for LinearModel<Fitted> {
    type InputBatch = Array2<f64>;
    type OutputBatch = Array1<f64>;
    type ParamsRepr = SerializableLinearParams;

    fn predict_batch(&self, input: &Self::InputBatch) -> Result<Self::OutputBatch> {
        if input.ncols() != self.params.coefficients.len() {
            return Err(PipelineError::transform(
                "predict",
                format!(
                    "model expects {} features, got {}",
                    self.params.coefficients.len(),
                    input.ncols()
                ),
            ));
        }
        Ok(input.dot(&self.params.coefficients) + self.params.intercept)
    }

    fn extract_params(&self) -> Self::ParamsRepr {
        (&self.params).into()
    }

    fn from_params(params: Self::ParamsRepr) -> Result<Self> {
        Ok(Self::new(LinearParams::try_from(params)?))
    }
}
