//! Preprocessor entry point: impute the raw dataset.
//!
//! ```sh
//! OLS_PIPELINE_ROOT=/path/to/project cargo run --bin preprocess
//! ```

use ols_pipeline::stages::{self, preprocess, StageContext};
use ols_pipeline::PipelineError;

fn main() -> Result<(), PipelineError> {
    let root = stages::project_root()?;
    let ctx = StageContext::load(preprocess::STAGE_NAME, root)?;
    preprocess::run(&ctx)?;
    Ok(())
}
