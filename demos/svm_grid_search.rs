//! Run the SVM hyperparameter search over a synthetic corpus and print the
//! winning configuration.
//!
//! ```bash
//! RUST_LOG=info cargo run --example svm_grid_search
//! ```
use anyhow::Result;
use ndarray::{Array1, Array2};

use subjectivity_classifiers::pipeline::{Pipeline, PreprocessedCorpus, Preprocessor};

/// Stand-in for a real vectorizing preprocessor: two Gaussian-ish clusters
/// of dense sentence vectors with alternating subjectivity labels.
struct SyntheticPreprocessor {
    n_sentences: usize,
    dim: usize,
}

impl Preprocessor for SyntheticPreprocessor {
    fn preprocess(&mut self, verbose: bool) -> Result<PreprocessedCorpus> {
        let n = self.n_sentences;
        let dim = self.dim;

        let mut values = Vec::with_capacity(n * dim);
        let mut labels = Vec::with_capacity(n);
        let mut sentences = Vec::with_capacity(n);
        for i in 0..n {
            let label = (i % 2) as i32;
            for j in 0..dim {
                values.push(label as f64 * 3.0 + ((i * 13 + j * 5) % 11) as f64 * 0.1);
            }
            labels.push(label);
            sentences.push(format!("synthetic sentence {}", i));
        }

        if verbose {
            log::info!("generated {} synthetic sentence vectors", n);
        }

        let processed_sentences = sentences
            .iter()
            .map(|s| s.split_whitespace().map(str::to_string).collect())
            .collect();
        let vectors = Array2::from_shape_vec((n, dim), values)?;

        Ok(PreprocessedCorpus {
            sentences,
            processed_sentences,
            labels: Array1::from_vec(labels),
            matrices: Vec::new(),
            vectors,
        })
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let mut pipeline = Pipeline::new(SyntheticPreprocessor {
        n_sentences: 80,
        dim: 8,
    });
    pipeline.preprocess(true)?;
    let result = pipeline.optimal_svm(Some("svm_results.csv"), true)?;

    println!("best configuration:\n{}", result);
    Ok(())
}
