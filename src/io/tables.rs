//! Delimited-table readers for pre-vectorized datasets.
//!
//! Tables are comma-separated with a header row. Feature tables load into an
//! N×F matrix; label tables flatten to one dimension regardless of how many
//! columns they were stored with. Missing or malformed files propagate as
//! errors with context, no recovery.
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use ndarray::{Array1, Array2};

use crate::classifier::SubjectivityClassifier;
use crate::data_handling::Dataset;

pub const X_TRAIN_FILE: &str = "x_train.csv";
pub const Y_TRAIN_FILE: &str = "y_train.csv";
pub const X_TEST_FILE: &str = "x_test.csv";
pub const Y_TEST_FILE: &str = "y_test.csv";

/// Read a comma-separated numeric table into a matrix, one row per data row.
pub fn read_feature_table<P: AsRef<Path>>(path: P) -> Result<Array2<f64>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(&path)
        .with_context(|| format!("Failed to open table: {}", path.as_ref().display()))?;

    let mut values = Vec::new();
    let mut n_cols = None;

    for (row_idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;
        if n_cols.is_none() {
            if record.is_empty() {
                bail!("Table {} has no columns", path.as_ref().display());
            }
            n_cols = Some(record.len());
        }
        for (col_idx, field) in record.iter().enumerate() {
            let parsed = field.trim().parse::<f64>().with_context(|| {
                format!(
                    "Invalid numeric value '{}' at row {}, column {}",
                    field,
                    row_idx + 1,
                    col_idx + 1
                )
            })?;
            values.push(parsed);
        }
    }

    let n_cols =
        n_cols.ok_or_else(|| anyhow!("Table {} has no data rows", path.as_ref().display()))?;
    let n_rows = values.len() / n_cols;
    Array2::from_shape_vec((n_rows, n_cols), values).context("Failed to build feature matrix")
}

/// Read a label table and flatten it to one dimension. Integer-valued float
/// columns load cleanly; values are rounded to the nearest integer label.
pub fn read_label_table<P: AsRef<Path>>(path: P) -> Result<Array1<i32>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(&path)
        .with_context(|| format!("Failed to open label table: {}", path.as_ref().display()))?;

    let mut labels = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;
        for field in record.iter() {
            let parsed = field.trim().parse::<f64>().with_context(|| {
                format!("Invalid label value '{}' at row {}", field, row_idx + 1)
            })?;
            labels.push(parsed.round() as i32);
        }
    }

    Ok(Array1::from_vec(labels))
}

/// Load the four fixed-name tables from `dir` into a validated dataset.
pub fn load_data_from<P: AsRef<Path>>(dir: P) -> Result<Dataset> {
    let dir = dir.as_ref();
    let x_train = read_feature_table(dir.join(X_TRAIN_FILE))?;
    let y_train = read_label_table(dir.join(Y_TRAIN_FILE))?;
    let x_test = read_feature_table(dir.join(X_TEST_FILE))?;
    let y_test = read_label_table(dir.join(Y_TEST_FILE))?;
    let data = Dataset::new(x_train, y_train, x_test, y_test)?;
    data.log_summary();
    Ok(data)
}

/// Load the four tables from the working directory.
pub fn load_data() -> Result<Dataset> {
    load_data_from(".")
}

/// Load the four tables from `dir` and bind them to a ready-to-fit
/// neural-network classifier.
pub fn load_data_into_classifier_from<P: AsRef<Path>>(dir: P) -> Result<SubjectivityClassifier> {
    Ok(SubjectivityClassifier::neural(load_data_from(dir)?))
}

/// Working-directory variant of [`load_data_into_classifier_from`].
pub fn load_data_into_classifier() -> Result<SubjectivityClassifier> {
    load_data_into_classifier_from(".")
}
