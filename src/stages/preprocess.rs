//! Preprocessor: raw dataset -> imputed processed dataset.

use crate::config::Config;
use crate::dataset::{load_table, save_table, Table};
use crate::error::Result;
use crate::preprocessing::{FittedTransformer, SimpleImputer, Transformer};
use crate::stages::StageContext;

pub const STAGE_NAME: &str = "preprocess";

/// Fill missing numeric cells, leaving the target column alone.
///
/// A table without rows passes through unchanged.
pub fn impute(ctx: &StageContext, table: &Table) -> Result<Table> {
    let config = ctx.config();
    let logger = ctx.logger();
    if table.n_rows() == 0 {
        logger.warn("no rows to impute, writing the table unchanged");
        return Ok(table.clone());
    }
    let imputer = SimpleImputer::new(config.preprocess.strategy.clone())
        .with_excluded([config.train.target.as_str()]);
    let fitted = ctx.check("imputation", imputer.fit(table))?;

    for (column, fill) in fitted.statistics() {
        match fill {
            Some(value) => logger.debug(format_args!("column `{column}` filled with {value}")),
            None => logger.warn(format_args!(
                "column `{column}` has no observed values, left unimputed"
            )),
        }
    }
    ctx.check("imputation", fitted.transform(table))
}

/// Run the stage: load `dataset.path`, impute, write `dataset.processed_data`.
pub fn run(ctx: &StageContext) -> Result<Table> {
    let logger = ctx.logger();
    let raw_path = ctx.config_path(Config::raw_data_path)?;
    let processed_path = ctx.config_path(Config::processed_data_path)?;

    let raw = ctx.check(
        format_args!("loading data from {}", raw_path.display()),
        load_table(&raw_path),
    )?;
    logger.debug(format_args!(
        "loaded {} rows x {} columns from {}",
        raw.n_rows(),
        raw.n_cols(),
        raw_path.display()
    ));

    let processed = impute(ctx, &raw)?;

    ctx.check(
        format_args!("saving processed data to {}", processed_path.display()),
        save_table(&processed, &processed_path),
    )?;
    logger.info(format_args!(
        "processed data saved in {}",
        processed_path.display()
    ));
    Ok(processed)
}
