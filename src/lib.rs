//! # ols-pipeline
//!
//! A three-stage linear-regression pipeline: median imputation, ordinary
//! least-squares training and held-out evaluation. Stages only talk through
//! files on disk, and each one loads the shared `params.yaml` on its own.
//!
//! ## Core Design Principles
//!
//! - **Stateful Type Safety**: models and transformers carry their training
//!   state in the type system (`Unfitted` vs `Fitted`), so only fitted ones
//!   predict, transform or serialize.
//! - **Explicit Context**: the project root and the stage logger are passed
//!   in, never discovered globally.
//! - **Fail Loudly**: every failure is logged with context and returned as a
//!   [`PipelineError`]; nothing is swallowed.
//!
//! ## Quick Start
//!
//! ```no_run
//! use ols_pipeline::stages::{self, StageContext};
//!
//! let root = stages::project_root()?;
//! let ctx = StageContext::load(stages::train::STAGE_NAME, root)?;
//! let summary = stages::train::run(&ctx)?;
//! println!("held-out r2: {}", summary.metrics.r2);
//! # Ok::<(), ols_pipeline::PipelineError>(())
//! ```
//!
//! ## Module Structure
//!
//! - `config`: `params.yaml` schema and loading
//! - `dataset`: CSV tables, missing values and the seeded train/test split
//! - `preprocessing`: imputation transformers
//! - `model`: OLS linear regression and model persistence
//! - `metrics`: MSE, R² and the JSON report
//! - `logging`: per-stage console + file logger
//! - `stages`: preprocess, train and evaluate entry points

/// Pipeline configuration.
pub mod config;

/// Tabular data loading, saving and splitting.
pub mod dataset;

pub mod error;

pub mod logging;

/// Regression metrics and reporting.
pub mod metrics;

/// Machine learning models with compile-time state safety.
pub mod model;

/// Data preprocessing transformers.
pub mod preprocessing;

/// Model persistence format.
pub mod serialization;

/// The three pipeline stages.
pub mod stages;

pub use config::{load_config, Config};
pub use error::{PipelineError, Result};
pub use model::linear::{LinearModel, LinearRegression};
pub use model::{Fitted, InferenceModel, Unfitted};
