//! Error type shared by every pipeline stage.
//!
//! Variants map one-to-one onto the failure classes a stage can hit:
//! configuration, data loading, transformation (imputation, split, fit,
//! scoring), persistence and schema violations.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The configuration document could not be read or parsed, or holds an invalid value.
    #[error("Config load error ({path}): {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    /// A key the running stage needs is absent from the configuration.
    #[error("Config load error: missing key `{0}`")]
    MissingKey(String),

    /// An input file (dataset or model artifact) could not be read or decoded.
    #[error("Data load error ({path}): {source}")]
    DataLoad {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Imputation, splitting, fitting or scoring failed.
    #[error("Transform error during {operation}: {reason}")]
    Transform {
        operation: &'static str,
        reason: String,
    },

    /// An output file could not be written.
    #[error("Persist error ({path}): {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A dataset does not have the expected shape (e.g. no target column).
    #[error("Schema error: {0}")]
    Schema(String),
}

impl PipelineError {
    pub fn data_load(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        PipelineError::DataLoad {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn persist(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        PipelineError::Persist {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn transform(operation: &'static str, reason: impl Into<String>) -> Self {
        PipelineError::Transform {
            operation,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
