//! Table preprocessing transformers.
//!
//! Transformers follow the same fitted/unfitted split as models: an unfitted
//! [`Transformer`] holds hyperparameters, [`Transformer::fit`] learns
//! statistics from a table and returns a [`FittedTransformer`] that applies
//! them.
//!
//! # Example
//!
//! ```ignore
//! use ols_pipeline::preprocessing::{FittedTransformer, ImputeStrategy, SimpleImputer, Transformer};
//!
//! let fitted = SimpleImputer::new(ImputeStrategy::Median)
//!     .with_excluded(["price"])
//!     .fit(&raw)?;
//! let processed = fitted.transform(&raw)?;
//! ```

pub mod imputation;
pub mod traits;

pub use imputation::{FittedSimpleImputer, ImputeStrategy, SimpleImputer, SimpleImputerParams};
pub use traits::{FittedTransformer, Transformer};
