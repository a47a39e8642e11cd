//! Exhaustive hyperparameter search for the support-vector variant.
//!
//! The optimizer is bound to a dense feature matrix and labels, splits them
//! into train/test folds once with a seeded rng, then fits and evaluates one
//! classifier per grid point. Trial rows can be appended to a CSV results
//! file for offline inspection. Selection is by macro-averaged F-score.
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::classifier::SubjectivityClassifier;
use crate::config::{ClassifierConfig, Gamma};
use crate::data_handling::Dataset;
use crate::metrics::ClassScores;

const SPLIT_SEED: u64 = 42;
const TEST_FRACTION: f64 = 0.2;

/// Outcome of one winning hyperparameter trial: the configuration, the full
/// datasets it was scored on, and the per-class score vectors. Immutable
/// after construction.
#[derive(Debug, Clone)]
pub struct SvmSearchResult {
    pub dataset: Dataset,
    pub kernel: String,
    pub c: f64,
    pub gamma: Gamma,
    pub precision: Array1<f64>,
    pub recall: Array1<f64>,
    pub fscore: Array1<f64>,
}

fn fmt_scores(scores: &Array1<f64>) -> String {
    let entries = scores
        .iter()
        .map(|v| format!("{:.4}", v))
        .collect::<Vec<_>>();
    format!("[{}]", entries.join(", "))
}

impl fmt::Display for SvmSearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "kernel: {}", self.kernel)?;
        writeln!(f, "precision: {}", fmt_scores(&self.precision))?;
        writeln!(f, "recall: {}", fmt_scores(&self.recall))?;
        writeln!(f, "f-score: {}", fmt_scores(&self.fscore))?;
        writeln!(f, "c: {}", self.c)?;
        write!(f, "gamma: {}", self.gamma)
    }
}

pub struct SvmOptimizer {
    vectors: Array2<f64>,
    labels: Array1<i32>,
    kernels: Vec<String>,
    c_grid: Vec<f64>,
    gamma_grid: Vec<Gamma>,
}

impl SvmOptimizer {
    /// Bind the optimizer to a dense feature matrix and row-aligned labels.
    pub fn new(vectors: Array2<f64>, labels: Array1<i32>) -> Self {
        SvmOptimizer {
            vectors,
            labels,
            kernels: vec!["linear".to_string(), "rbf".to_string()],
            c_grid: vec![0.1, 1.0, 10.0, 100.0],
            gamma_grid: vec![
                Gamma::Auto,
                Gamma::Value(0.01),
                Gamma::Value(0.1),
                Gamma::Value(1.0),
            ],
        }
    }

    /// Override the search grid.
    pub fn with_grid(
        mut self,
        kernels: Vec<String>,
        c_grid: Vec<f64>,
        gamma_grid: Vec<Gamma>,
    ) -> Self {
        self.kernels = kernels;
        self.c_grid = c_grid;
        self.gamma_grid = gamma_grid;
        self
    }

    /// Stratified train/test split so every class appears in both folds.
    /// Seeded so repeated runs see the same folds.
    fn split(&self) -> Result<Dataset> {
        if self.vectors.nrows() != self.labels.len() {
            bail!(
                "Labels length {} does not match {} vector rows",
                self.labels.len(),
                self.vectors.nrows()
            );
        }

        let mut by_class: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
        for (idx, &label) in self.labels.iter().enumerate() {
            by_class.entry(label).or_default().push(idx);
        }

        let mut rng = StdRng::seed_from_u64(SPLIT_SEED);
        let mut train_idx = Vec::new();
        let mut test_idx = Vec::new();
        for indices in by_class.values() {
            let mut indices = indices.clone();
            indices.shuffle(&mut rng);
            // A singleton class stays in the training fold.
            let n_test = if indices.len() > 1 {
                ((indices.len() as f64 * TEST_FRACTION).round() as usize)
                    .clamp(1, indices.len() - 1)
            } else {
                0
            };
            test_idx.extend_from_slice(&indices[..n_test]);
            train_idx.extend_from_slice(&indices[n_test..]);
        }
        train_idx.sort_unstable();
        test_idx.sort_unstable();

        Dataset::new(
            self.vectors.select(Axis(0), &train_idx),
            self.labels.select(Axis(0), &train_idx),
            self.vectors.select(Axis(0), &test_idx),
            self.labels.select(Axis(0), &test_idx),
        )
    }

    /// The grid as (kernel, c, gamma) trials. Gamma only matters to the
    /// non-linear kernels, so the linear kernel runs once per cost.
    fn trials(&self) -> Vec<(String, f64, Gamma)> {
        let mut trials = Vec::new();
        for kernel in &self.kernels {
            for &c in &self.c_grid {
                if kernel == "linear" {
                    trials.push((kernel.clone(), c, Gamma::Auto));
                } else {
                    for &gamma in &self.gamma_grid {
                        trials.push((kernel.clone(), c, gamma));
                    }
                }
            }
        }
        trials
    }

    /// Search the grid and return the winning fitted classifier with its
    /// result record. When `results_file` is given, one CSV row is written
    /// per trial.
    pub fn optimal<P: AsRef<Path>>(
        &self,
        results_file: Option<P>,
        verbose: bool,
    ) -> Result<(SubjectivityClassifier, SvmSearchResult)> {
        let dataset = self.split()?;

        let mut writer = match results_file {
            Some(path) => {
                let mut w = csv::Writer::from_path(&path).with_context(|| {
                    format!("Failed to open results file: {}", path.as_ref().display())
                })?;
                w.write_record(["kernel", "c", "gamma", "precision", "recall", "fscore"])?;
                Some(w)
            }
            None => None,
        };

        let mut best: Option<(f64, SubjectivityClassifier, ClassScores)> = None;
        let mut best_trial: Option<(String, f64, Gamma)> = None;

        for (kernel, c, gamma) in self.trials() {
            let classifier = SubjectivityClassifier::svm(dataset.clone())
                .configure(ClassifierConfig::Svm {
                    kernel: kernel.clone(),
                    c,
                    gamma,
                })
                .fit()?;
            let scores = classifier.evaluate()?;
            let macro_f = scores.macro_fscore();

            if verbose {
                log::info!(
                    "trial kernel={} c={} gamma={}: macro F-score {:.4}",
                    kernel,
                    c,
                    gamma,
                    macro_f
                );
            } else {
                log::debug!(
                    "trial kernel={} c={} gamma={}: macro F-score {:.4}",
                    kernel,
                    c,
                    gamma,
                    macro_f
                );
            }

            if let Some(w) = writer.as_mut() {
                w.write_record([
                    kernel.clone(),
                    c.to_string(),
                    gamma.to_string(),
                    scores.macro_precision().to_string(),
                    scores.macro_recall().to_string(),
                    macro_f.to_string(),
                ])?;
            }

            let improved = best.as_ref().map(|(f, _, _)| macro_f > *f).unwrap_or(true);
            if improved {
                best = Some((macro_f, classifier, scores));
                best_trial = Some((kernel, c, gamma));
            }
        }

        if let Some(w) = writer.as_mut() {
            w.flush()?;
        }

        let (_, classifier, scores) =
            best.ok_or_else(|| anyhow!("Hyperparameter grid is empty"))?;
        let (kernel, c, gamma) =
            best_trial.ok_or_else(|| anyhow!("Hyperparameter grid is empty"))?;

        let result = SvmSearchResult {
            dataset: classifier.data().clone(),
            kernel,
            c,
            gamma,
            precision: scores.precision.clone(),
            recall: scores.recall.clone(),
            fscore: scores.fscore.clone(),
        };

        Ok((classifier, result))
    }
}
