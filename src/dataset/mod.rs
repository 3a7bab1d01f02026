//! Tabular data: an ordered set of named, equally long columns.
//!
//! Tables are read from and written to comma-separated files with a header
//! row. A column whose non-missing cells all parse as `f64` is numeric;
//! anything else is kept as text.
//!
//! # Example
//!
//! ```no_run
//! use ols_pipeline::dataset::{load_table, save_table};
//!
//! let table = load_table("data/raw/houses.csv").unwrap();
//! let (names, x, y) = table.features_and_target("price").unwrap();
//! assert_eq!(x.ncols(), names.len());
//! assert_eq!(x.nrows(), y.len());
//! save_table(&table, "data/processed/houses.csv").unwrap();
//! ```

use crate::error::{PipelineError, Result};
use csv::{ReaderBuilder, WriterBuilder};
use ndarray::{Array1, Array2};
use std::fs;
use std::path::Path;

pub mod split;
pub use split::{split_indices, train_test_split};

/// Cell values treated as missing when reading.
const MISSING_MARKERS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell.trim())
}

/// Values of a single column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn missing_count(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Text(v) => v.iter().filter(|c| c.is_none()).count(),
        }
    }

    fn select(&self, rows: &[usize]) -> ColumnData {
        match self {
            ColumnData::Numeric(v) => ColumnData::Numeric(rows.iter().map(|&r| v[r]).collect()),
            ColumnData::Text(v) => {
                ColumnData::Text(rows.iter().map(|&r| v[r].clone()).collect())
            }
        }
    }

    fn cell_to_string(&self, row: usize) -> String {
        match self {
            ColumnData::Numeric(v) => v[row].map(|x| x.to_string()).unwrap_or_default(),
            ColumnData::Text(v) => v[row].clone().unwrap_or_default(),
        }
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    pub fn text(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Text(values),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.data, ColumnData::Numeric(_))
    }

    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match &self.data {
            ColumnData::Numeric(v) => Some(v),
            ColumnData::Text(_) => None,
        }
    }
}

/// In-memory table with a fixed schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Build a table, checking that names are unique and columns equally long.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let n_rows = columns.first().map(|c| c.data.len()).unwrap_or(0);
        for (i, col) in columns.iter().enumerate() {
            if col.data.len() != n_rows {
                return Err(PipelineError::Schema(format!(
                    "column `{}` has {} rows, expected {}",
                    col.name,
                    col.data.len(),
                    n_rows
                )));
            }
            if columns[..i].iter().any(|c| c.name == col.name) {
                return Err(PipelineError::Schema(format!(
                    "duplicate column `{}`",
                    col.name
                )));
            }
        }
        Ok(Self { columns, n_rows })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Replace the data of an existing column. The length must not change.
    pub fn set_column_data(&mut self, name: &str, data: ColumnData) -> Result<()> {
        if data.len() != self.n_rows {
            return Err(PipelineError::Schema(format!(
                "column `{name}` has {} rows, expected {}",
                data.len(),
                self.n_rows
            )));
        }
        let column = self
            .columns
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| PipelineError::Schema(format!("no column `{name}`")))?;
        column.data = data;
        Ok(())
    }

    /// New table holding the given rows, in the given order.
    pub fn select_rows(&self, rows: &[usize]) -> Table {
        Table {
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    data: c.data.select(rows),
                })
                .collect(),
            n_rows: rows.len(),
        }
    }

    fn numeric_target(&self, target: &str) -> Result<&[Option<f64>]> {
        let column = self.column(target).ok_or_else(|| {
            PipelineError::Schema(format!("missing target column `{target}`"))
        })?;
        column.as_numeric().ok_or_else(|| {
            PipelineError::Schema(format!("target column `{target}` is not numeric"))
        })
    }

    /// Drop rows whose target is missing. Returns the kept table and the
    /// number of dropped rows.
    pub fn drop_missing_target(&self, target: &str) -> Result<(Table, usize)> {
        let values = self.numeric_target(target)?;
        let keep: Vec<usize> = values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|_| i))
            .collect();
        let dropped = self.n_rows - keep.len();
        Ok((self.select_rows(&keep), dropped))
    }

    /// Names of every column except `target`, in table order.
    pub fn feature_names(&self, target: &str) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.name != target)
            .map(|c| c.name.clone())
            .collect()
    }

    /// Dense `(n_rows, features.len())` matrix of the named columns.
    ///
    /// Every named column must exist and be numeric (checked for all columns
    /// first, as a schema error), then every cell must be present and finite.
    pub fn feature_matrix(&self, features: &[String]) -> Result<Array2<f64>> {
        let columns = features
            .iter()
            .map(|name| {
                let column = self.column(name).ok_or_else(|| {
                    PipelineError::Schema(format!("missing feature column `{name}`"))
                })?;
                column.as_numeric().ok_or_else(|| {
                    PipelineError::Schema(format!("feature column `{name}` is not numeric"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut matrix = Array2::<f64>::zeros((self.n_rows, features.len()));
        for (j, (name, values)) in features.iter().zip(columns).enumerate() {
            for (i, value) in values.iter().enumerate() {
                matrix[[i, j]] = finite_cell(*value, "feature extraction", || {
                    format!("column `{name}` at row {i}")
                })?;
            }
        }
        Ok(matrix)
    }

    /// Target vector. The column must exist, be numeric, complete and finite.
    pub fn target_vector(&self, target: &str) -> Result<Array1<f64>> {
        self.numeric_target(target)?
            .iter()
            .enumerate()
            .map(|(i, v)| {
                finite_cell(*v, "target extraction", || {
                    format!("target `{target}` at row {i}")
                })
            })
            .collect::<Result<Vec<f64>>>()
            .map(Array1::from)
    }

    /// Split into feature names, feature matrix and target vector.
    pub fn features_and_target(
        &self,
        target: &str,
    ) -> Result<(Vec<String>, Array2<f64>, Array1<f64>)> {
        let y = self.target_vector(target)?;
        let names = self.feature_names(target);
        let x = self.feature_matrix(&names)?;
        Ok((names, x, y))
    }
}

/// A present, finite cell value; `locate` names the cell in the error.
fn finite_cell(
    value: Option<f64>,
    operation: &'static str,
    locate: impl FnOnce() -> String,
) -> Result<f64> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        Some(v) => Err(PipelineError::transform(
            operation,
            format!("non-finite value {v} in {}", locate()),
        )),
        None => Err(PipelineError::transform(
            operation,
            format!("missing value in {}", locate()),
        )),
    }
}

fn infer_column(name: String, cells: Vec<String>) -> Column {
    let parsed: Option<Vec<Option<f64>>> = cells
        .iter()
        .map(|cell| {
            if is_missing(cell) {
                Some(None)
            } else {
                cell.trim()
                    .parse::<f64>()
                    .ok()
                    .map(|v| if v.is_nan() { None } else { Some(v) })
            }
        })
        .collect();

    match parsed {
        Some(values) => Column::numeric(name, values),
        None => Column::text(
            name,
            cells
                .into_iter()
                .map(|c| if is_missing(&c) { None } else { Some(c) })
                .collect(),
        ),
    }
}

/// Read a comma-separated file with a header row.
pub fn load_table<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| PipelineError::data_load(path, e))?;

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| PipelineError::data_load(path, e))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for result in rdr.records() {
        let record = result.map_err(|e| PipelineError::data_load(path, e))?;
        for (col, value) in cells.iter_mut().zip(record.iter()) {
            col.push(value.to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, col)| infer_column(name, col))
        .collect();
    Table::new(columns).map_err(|e| PipelineError::data_load(path, e.to_string()))
}

/// Write a table as comma-separated text, creating the parent directory.
///
/// Missing cells are written empty.
pub fn save_table<P: AsRef<Path>>(table: &Table, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PipelineError::persist(path, e))?;
    }

    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .map_err(|e| PipelineError::persist(path, e))?;
    wtr.write_record(table.column_names())
        .map_err(|e| PipelineError::persist(path, e))?;
    for row in 0..table.n_rows() {
        let record: Vec<String> = table
            .columns()
            .iter()
            .map(|c| c.data.cell_to_string(row))
            .collect();
        wtr.write_record(&record)
            .map_err(|e| PipelineError::persist(path, e))?;
    }
    wtr.flush().map_err(|e| PipelineError::persist(path, e))
}
