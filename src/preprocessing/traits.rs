//! Core traits for table transformers.
//!
//! - [`Transformer`]: unfitted, holds hyperparameters and learns from a table.
//! - [`FittedTransformer`]: holds learned statistics and transforms tables.

use crate::dataset::Table;
use crate::error::Result;
use crate::serialization::SerializableParams;

/// A transformer before fitting.
///
/// # Example
/// ```ignore
/// use ols_pipeline::preprocessing::{ImputeStrategy, SimpleImputer, Transformer};
///
/// let imputer = SimpleImputer::new(ImputeStrategy::Median);
/// let fitted = imputer.fit(&table)?;
/// let imputed = fitted.transform(&table)?;
/// ```
pub trait Transformer: Clone {
    type Fitted: FittedTransformer;

    /// Learn statistics from `data`.
    ///
    /// # Errors
    /// Returns an error if the table cannot be fitted (e.g. it is empty).
    fn fit(&self, data: &Table) -> Result<Self::Fitted>;

    /// Fit on `data` and transform the same table.
    fn fit_transform(&self, data: &Table) -> Result<Table> {
        let fitted = self.fit(data)?;
        fitted.transform(data)
    }
}

/// A transformer after fitting.
///
/// `extract_params()` followed by `from_params()` is a round trip.
pub trait FittedTransformer: Clone {
    /// Serializable representation of the learned statistics.
    type Params: SerializableParams;

    /// Apply the learned statistics to `data`.
    ///
    /// # Errors
    /// Returns an error if `data` lacks a column seen during fit.
    fn transform(&self, data: &Table) -> Result<Table>;

    fn extract_params(&self) -> Self::Params;

    fn from_params(params: Self::Params) -> Result<Self>
    where
        Self: Sized;

    /// Number of columns the transformer was fitted on.
    fn n_features_in(&self) -> usize;
}
