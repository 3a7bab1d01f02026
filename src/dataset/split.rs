//! Seeded train/test partitioning.

use super::Table;
use crate::error::{PipelineError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Shuffle `0..n_samples` with `random_state` and cut off the test part.
///
/// The test set holds `ceil(test_size * n_samples)` indices, the train set
/// the rest. Both keep shuffled order. Returns `(train, test)`.
///
/// # Errors
/// `test_size` outside `(0, 1)`, or a split leaving either side empty.
pub fn split_indices(
    n_samples: usize,
    test_size: f64,
    random_state: u64,
) -> Result<(Vec<usize>, Vec<usize>)> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(PipelineError::transform(
            "split",
            format!("test_size must be in (0, 1), got {test_size}"),
        ));
    }

    let n_test = (test_size * n_samples as f64).ceil() as usize;
    let n_train = n_samples.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(PipelineError::transform(
            "split",
            format!(
                "{n_samples} samples with test_size={test_size} leaves \
                 {n_train} train and {n_test} test samples"
            ),
        ));
    }

    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = StdRng::seed_from_u64(random_state);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    Ok((train, indices))
}

/// Partition a table's rows into `(train, test)` tables.
pub fn train_test_split(
    table: &Table,
    test_size: f64,
    random_state: u64,
) -> Result<(Table, Table)> {
    let (train, test) = split_indices(table.n_rows(), test_size, random_state)?;
    Ok((table.select_rows(&train), table.select_rows(&test)))
}
