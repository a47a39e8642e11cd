use anyhow::Result;
use ndarray::Array2;

/// A small trait abstraction for the trainable backends. This centralizes
/// the contract in the `models` module so implementations can live next to
/// model code; the `SubjectivityClassifier` wrapper dispatches through it
/// instead of knowing any backend concretely.
pub trait ClassifierModel {
    /// Train on a feature matrix and row-aligned integer labels.
    fn fit(&mut self, x: &Array2<f64>, y: &[i32]) -> Result<()>;

    /// Predict one label per row of `x`. Requires a prior `fit`.
    fn predict(&self, x: &Array2<f64>) -> Result<Vec<i32>>;

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}
