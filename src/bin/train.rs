//! Trainer entry point: split, fit and persist the model.
//!
//! Prints `mse is ..` and `r2 score is ..` for the held-out split.

use ols_pipeline::stages::{self, train, StageContext};
use ols_pipeline::PipelineError;

fn main() -> Result<(), PipelineError> {
    let root = stages::project_root()?;
    let ctx = StageContext::load(train::STAGE_NAME, root)?;
    train::run(&ctx)?;
    Ok(())
}
