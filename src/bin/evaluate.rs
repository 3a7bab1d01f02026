//! Evaluator entry point: score the saved model on the test dataset.

use ols_pipeline::stages::{self, evaluate, StageContext};
use ols_pipeline::PipelineError;

fn main() -> Result<(), PipelineError> {
    let root = stages::project_root()?;
    let ctx = StageContext::load(evaluate::STAGE_NAME, root)?;
    evaluate::run(&ctx)?;
    Ok(())
}
