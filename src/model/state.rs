/// Marker for a model that has **not been fitted yet**.
///
/// Only `fit` is available in this state; `predict_batch` and persistence
/// exist solely on `Fitted` models.
#[derive(Debug, Clone, Copy)]
pub struct Unfitted;

/// Marker for a model produced by `fit` or loaded from an artifact.
///
/// A fitted model holds inference parameters only: coefficients, intercept
/// and the feature names they apply to.
#[derive(Debug, Clone, Copy)]
pub struct Fitted;
