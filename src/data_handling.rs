//! In-memory dataset container used by the classifier wrappers.
//!
//! A `Dataset` bundles the four arrays a supervised experiment needs: train
//! features, train labels, test features, test labels. Shape invariants are
//! checked once at construction so downstream code can index freely.
use std::collections::BTreeSet;

use anyhow::{bail, Result};
use ndarray::{Array1, Array2};

#[derive(Debug, Clone)]
pub struct Dataset {
    pub x_train: Array2<f64>,
    pub y_train: Array1<i32>,
    pub x_test: Array2<f64>,
    pub y_test: Array1<i32>,
}

impl Dataset {
    /// Bundle the four arrays, validating shapes.
    ///
    /// Train and test must share the feature dimensionality, label vectors
    /// must be row-aligned with their feature matrices, and the training
    /// split must be non-empty.
    pub fn new(
        x_train: Array2<f64>,
        y_train: Array1<i32>,
        x_test: Array2<f64>,
        y_test: Array1<i32>,
    ) -> Result<Self> {
        if x_train.nrows() == 0 {
            bail!("Training set is empty");
        }
        if x_train.ncols() != x_test.ncols() {
            bail!(
                "Feature dimensionality mismatch: train has {} columns, test has {}",
                x_train.ncols(),
                x_test.ncols()
            );
        }
        if x_train.nrows() != y_train.len() {
            bail!(
                "Train labels length {} does not match {} feature rows",
                y_train.len(),
                x_train.nrows()
            );
        }
        if x_test.nrows() != y_test.len() {
            bail!(
                "Test labels length {} does not match {} feature rows",
                y_test.len(),
                x_test.nrows()
            );
        }
        Ok(Dataset {
            x_train,
            y_train,
            x_test,
            y_test,
        })
    }

    pub fn n_features(&self) -> usize {
        self.x_train.ncols()
    }

    /// Sorted distinct labels across the training split. This is the class
    /// axis every per-class metric vector is indexed by.
    pub fn class_labels(&self) -> Vec<i32> {
        self.y_train
            .iter()
            .copied()
            .collect::<BTreeSet<i32>>()
            .into_iter()
            .collect()
    }

    pub fn log_summary(&self) {
        log::info!(
            "Dataset: {} train rows, {} test rows, {} features, {} classes",
            self.x_train.nrows(),
            self.x_test.nrows(),
            self.n_features(),
            self.class_labels().len()
        );
    }
}
