//! Simple Imputer.
//!
//! Fills missing cells of numeric columns with a per-column statistic
//! computed over the whole fitted table. Text columns and excluded columns
//! (typically the regression target) are never touched.
//!
//! # Example
//! ```ignore
//! use ols_pipeline::preprocessing::{FittedTransformer, ImputeStrategy, SimpleImputer, Transformer};
//!
//! let imputer = SimpleImputer::new(ImputeStrategy::Median).with_excluded(["price"]);
//! let fitted = imputer.fit(&raw)?;
//! let processed = fitted.transform(&raw)?;
//! ```

use crate::dataset::{ColumnData, Table};
use crate::error::{PipelineError, Result};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use serde::{Deserialize, Serialize};

/// Strategy for imputing missing values.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputeStrategy {
    /// Replace missing values with the median of each column.
    #[default]
    Median,
    /// Replace missing values with the mean of each column.
    Mean,
    /// Replace missing values with the most frequent value of each column
    /// (smallest value on ties).
    MostFrequent,
    /// Replace missing values with a constant value.
    Constant(f64),
}

/// Serializable parameters for a fitted SimpleImputer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimpleImputerParams {
    pub strategy: ImputeStrategy,
    /// Fitted numeric columns, in table order.
    pub columns: Vec<String>,
    /// Fill value per column; `None` when the column had no observed value.
    pub statistics: Vec<Option<f64>>,
}

/// SimpleImputer transformer (unfitted).
#[derive(Clone, Debug, Default)]
pub struct SimpleImputer {
    strategy: ImputeStrategy,
    excluded: Vec<String>,
}

impl SimpleImputer {
    /// Create a new SimpleImputer with the specified strategy.
    pub fn new(strategy: ImputeStrategy) -> Self {
        Self {
            strategy,
            excluded: Vec::new(),
        }
    }

    /// Columns that must never be imputed.
    pub fn with_excluded<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded.extend(columns.into_iter().map(Into::into));
        self
    }
}

fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

fn most_frequent(sorted: &[f64]) -> f64 {
    let mut best = sorted[0];
    let mut best_count = 0;
    let mut i = 0;
    while i < sorted.len() {
        let value = sorted[i];
        let run = sorted[i..].iter().take_while(|&&v| v == value).count();
        if run > best_count {
            best = value;
            best_count = run;
        }
        i += run;
    }
    best
}

/// Fill value for one column, ignoring missing cells.
fn compute_statistic(values: &[Option<f64>], strategy: &ImputeStrategy) -> Option<f64> {
    if let ImputeStrategy::Constant(val) = strategy {
        return Some(*val);
    }

    let mut observed: Vec<f64> = values.iter().flatten().copied().collect();
    if observed.is_empty() {
        return None;
    }

    Some(match strategy {
        ImputeStrategy::Mean => observed.iter().sum::<f64>() / observed.len() as f64,
        ImputeStrategy::Median => {
            observed.sort_by(f64::total_cmp);
            median(&observed)
        }
        ImputeStrategy::MostFrequent => {
            observed.sort_by(f64::total_cmp);
            most_frequent(&observed)
        }
        ImputeStrategy::Constant(val) => *val,
    })
}

impl Transformer for SimpleImputer {
    type Fitted = FittedSimpleImputer;

    fn fit(&self, data: &Table) -> Result<Self::Fitted> {
        if data.n_rows() == 0 {
            return Err(PipelineError::transform(
                "imputation",
                "cannot fit SimpleImputer on an empty table",
            ));
        }

        let mut columns = Vec::new();
        let mut statistics = Vec::new();
        for column in data.columns() {
            if self.excluded.contains(&column.name) {
                continue;
            }
            if let Some(values) = column.as_numeric() {
                columns.push(column.name.clone());
                statistics.push(compute_statistic(values, &self.strategy));
            }
        }

        Ok(FittedSimpleImputer {
            strategy: self.strategy.clone(),
            columns,
            statistics,
        })
    }
}

/// Fitted SimpleImputer ready to transform tables.
#[derive(Clone, Debug)]
pub struct FittedSimpleImputer {
    strategy: ImputeStrategy,
    columns: Vec<String>,
    statistics: Vec<Option<f64>>,
}

impl FittedSimpleImputer {
    pub fn strategy(&self) -> &ImputeStrategy {
        &self.strategy
    }

    /// `(column, fill value)` pairs in table order.
    pub fn statistics(&self) -> impl Iterator<Item = (&str, Option<f64>)> + '_ {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.statistics.iter().copied())
    }
}

impl FittedTransformer for FittedSimpleImputer {
    type Params = SimpleImputerParams;

    fn transform(&self, data: &Table) -> Result<Table> {
        let mut out = data.clone();
        for (name, stat) in self.statistics() {
            let column = data.column(name).ok_or_else(|| {
                PipelineError::Schema(format!("imputer was fitted on missing column `{name}`"))
            })?;
            let values = column.as_numeric().ok_or_else(|| {
                PipelineError::Schema(format!("imputer column `{name}` is no longer numeric"))
            })?;
            let Some(fill) = stat else {
                continue;
            };
            let filled = values.iter().map(|v| Some(v.unwrap_or(fill))).collect();
            out.set_column_data(name, ColumnData::Numeric(filled))?;
        }
        Ok(out)
    }

    fn extract_params(&self) -> Self::Params {
        SimpleImputerParams {
            strategy: self.strategy.clone(),
            columns: self.columns.clone(),
            statistics: self.statistics.clone(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self> {
        if params.columns.len() != params.statistics.len() {
            return Err(PipelineError::Schema(format!(
                "imputer has {} columns but {} statistics",
                params.columns.len(),
                params.statistics.len()
            )));
        }
        Ok(Self {
            strategy: params.strategy,
            columns: params.columns,
            statistics: params.statistics,
        })
    }

    fn n_features_in(&self) -> usize {
        self.columns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;

    fn create_test_data_with_missing() -> Table {
        // sqft: [1, NaN, 3, 5], rooms: [NaN, 4, 6, 8], city: text, price: [10, NaN, 30, 50]
        Table::new(vec![
            Column::numeric("sqft", vec![Some(1.0), None, Some(3.0), Some(5.0)]),
            Column::numeric("rooms", vec![None, Some(4.0), Some(6.0), Some(8.0)]),
            Column::text(
                "city",
                vec![Some("a".into()), None, Some("b".into()), Some("a".into())],
            ),
            Column::numeric("price", vec![Some(10.0), None, Some(30.0), Some(50.0)]),
        ])
        .unwrap()
    }

    fn numeric(table: &Table, name: &str) -> Vec<Option<f64>> {
        table.column(name).unwrap().as_numeric().unwrap().to_vec()
    }

    #[test]
    fn test_simple_imputer_median() {
        let data = create_test_data_with_missing();
        let fitted = SimpleImputer::new(ImputeStrategy::Median)
            .with_excluded(["price"])
            .fit(&data)
            .unwrap();

        let stats: Vec<_> = fitted.statistics().collect();
        // sqft: median of [1, 3, 5] = 3; rooms: median of [4, 6, 8] = 6
        assert_eq!(stats, vec![("sqft", Some(3.0)), ("rooms", Some(6.0))]);

        let imputed = fitted.transform(&data).unwrap();
        assert_eq!(
            numeric(&imputed, "sqft"),
            vec![Some(1.0), Some(3.0), Some(3.0), Some(5.0)]
        );
        assert_eq!(
            numeric(&imputed, "rooms"),
            vec![Some(6.0), Some(4.0), Some(6.0), Some(8.0)]
        );
    }

    #[test]
    fn test_excluded_and_text_columns_untouched() {
        let data = create_test_data_with_missing();
        let imputed = SimpleImputer::new(ImputeStrategy::Median)
            .with_excluded(["price"])
            .fit_transform(&data)
            .unwrap();

        assert_eq!(numeric(&imputed, "price")[1], None);
        assert_eq!(imputed.column("city"), data.column("city"));
    }

    #[test]
    fn test_even_count_median_averages_middle() {
        let data = Table::new(vec![Column::numeric(
            "x",
            vec![Some(4.0), Some(1.0), None, Some(3.0), Some(2.0)],
        )])
        .unwrap();
        let fitted = SimpleImputer::new(ImputeStrategy::Median).fit(&data).unwrap();
        assert_eq!(fitted.statistics().next(), Some(("x", Some(2.5))));
    }

    #[test]
    fn test_simple_imputer_mean() {
        let data = create_test_data_with_missing();
        let fitted = SimpleImputer::new(ImputeStrategy::Mean).fit(&data).unwrap();
        let stats: Vec<_> = fitted.statistics().collect();
        assert_eq!(stats[0], ("sqft", Some(3.0)));
        assert_eq!(stats[1], ("rooms", Some(6.0)));
        // without exclusion the target is fitted too
        assert_eq!(stats[2], ("price", Some(30.0)));
    }

    #[test]
    fn test_simple_imputer_most_frequent() {
        let data = Table::new(vec![
            Column::numeric("a", vec![Some(1.0), Some(1.0), Some(2.0), None]),
            // tie between 2 and 5: smallest wins
            Column::numeric("b", vec![Some(5.0), Some(2.0), None, None]),
        ])
        .unwrap();
        let fitted = SimpleImputer::new(ImputeStrategy::MostFrequent)
            .fit(&data)
            .unwrap();
        let stats: Vec<_> = fitted.statistics().collect();
        assert_eq!(stats, vec![("a", Some(1.0)), ("b", Some(2.0))]);
    }

    #[test]
    fn test_simple_imputer_constant() {
        let data = create_test_data_with_missing();
        let imputed = SimpleImputer::new(ImputeStrategy::Constant(-1.0))
            .with_excluded(["price"])
            .fit_transform(&data)
            .unwrap();
        assert_eq!(numeric(&imputed, "sqft")[1], Some(-1.0));
        assert_eq!(numeric(&imputed, "rooms")[0], Some(-1.0));
    }

    #[test]
    fn test_all_missing_column_left_as_is() {
        let data = Table::new(vec![
            Column::numeric("empty", vec![None, None]),
            Column::numeric("x", vec![Some(1.0), None]),
        ])
        .unwrap();
        let fitted = SimpleImputer::new(ImputeStrategy::Median).fit(&data).unwrap();
        assert_eq!(fitted.statistics().next(), Some(("empty", None)));

        let imputed = fitted.transform(&data).unwrap();
        assert_eq!(numeric(&imputed, "empty"), vec![None, None]);
        assert_eq!(numeric(&imputed, "x"), vec![Some(1.0), Some(1.0)]);
    }

    #[test]
    fn test_simple_imputer_empty_data() {
        let data = Table::new(vec![Column::numeric("x", vec![])]).unwrap();
        let result = SimpleImputer::new(ImputeStrategy::Median).fit(&data);
        assert!(matches!(result, Err(PipelineError::Transform { .. })));
    }

    #[test]
    fn test_transform_missing_column() {
        let data = create_test_data_with_missing();
        let fitted = SimpleImputer::new(ImputeStrategy::Median).fit(&data).unwrap();
        let other = Table::new(vec![Column::numeric("sqft", vec![None])]).unwrap();
        assert!(matches!(
            fitted.transform(&other),
            Err(PipelineError::Schema(_))
        ));
    }

    #[test]
    fn test_params_roundtrip() {
        let data = create_test_data_with_missing();
        let fitted = SimpleImputer::new(ImputeStrategy::Median)
            .with_excluded(["price"])
            .fit(&data)
            .unwrap();

        let params = fitted.extract_params();
        let restored = FittedSimpleImputer::from_params(params).unwrap();
        assert_eq!(restored.n_features_in(), 2);
        assert_eq!(
            restored.transform(&data).unwrap(),
            fitted.transform(&data).unwrap()
        );
    }

    #[test]
    fn test_strategy_serde_names() {
        let yaml = serde_yaml::to_string(&ImputeStrategy::MostFrequent).unwrap();
        assert_eq!(yaml.trim(), "most_frequent");
        let parsed: ImputeStrategy = serde_yaml::from_str("median").unwrap();
        assert_eq!(parsed, ImputeStrategy::Median);
    }
}
