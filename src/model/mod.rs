pub mod state;
pub use state::{Fitted, Unfitted};

pub mod linear;
pub mod lstsq;

use crate::error::{PipelineError, Result};
use crate::serialization::SerializableParams;
use std::fs;
use std::path::Path;

/// A fitted model: batch prediction plus persistence of its parameters.
///
/// `extract_params()` followed by `from_params()` must reproduce a model that
/// predicts identically.
pub trait InferenceModel {
    type InputBatch;
    type OutputBatch;
    /// Plain-data representation written to disk.
    type ParamsRepr: SerializableParams;

    fn predict_batch(&self, input: &Self::InputBatch) -> Result<Self::OutputBatch>;

    fn extract_params(&self) -> Self::ParamsRepr;

    fn from_params(params: Self::ParamsRepr) -> Result<Self>
    where
        Self: Sized;

    /// Write the parameters to `path`, creating the parent directory.
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| PipelineError::persist(path, e))?;
        }
        let bytes = self
            .extract_params()
            .to_bytes()
            .map_err(|e| PipelineError::persist(path, e))?;
        fs::write(path, bytes).map_err(|e| PipelineError::persist(path, e))
    }

    /// Read parameters written by [`InferenceModel::save_to_file`].
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self>
    where
        Self: Sized,
    {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| PipelineError::data_load(path, e))?;
        let params =
            Self::ParamsRepr::from_bytes(&bytes).map_err(|e| PipelineError::data_load(path, e))?;
        Self::from_params(params)
    }
}
