//! Integration tests for the grid search and the pipeline state machine.

use std::fs;

use anyhow::{bail, Result};
use ndarray::{Array1, Array2};
use subjectivity_classifiers::config::Gamma;
use subjectivity_classifiers::data_handling::Dataset;
use subjectivity_classifiers::pipeline::{
    Pipeline, PipelineStage, PreprocessedCorpus, Preprocessor,
};
use subjectivity_classifiers::search::{SvmOptimizer, SvmSearchResult};

/// Dense two-cluster vectors with alternating labels.
fn corpus_vectors(n: usize, n_features: usize) -> (Array2<f64>, Array1<i32>) {
    let mut values = Vec::with_capacity(n * n_features);
    let mut labels = Vec::with_capacity(n);
    for i in 0..n {
        let label = (i % 2) as i32;
        for j in 0..n_features {
            values.push(label as f64 * 4.0 + ((i * 7 + j * 3) % 5) as f64 * 0.05);
        }
        labels.push(label);
    }
    (
        Array2::from_shape_vec((n, n_features), values).unwrap(),
        Array1::from_vec(labels),
    )
}

struct StubPreprocessor;

impl Preprocessor for StubPreprocessor {
    fn preprocess(&mut self, _verbose: bool) -> Result<PreprocessedCorpus> {
        let (vectors, labels) = corpus_vectors(40, 4);
        let sentences: Vec<String> = (0..40).map(|i| format!("sentence {}", i)).collect();
        let processed_sentences = sentences
            .iter()
            .map(|s| s.split_whitespace().map(str::to_string).collect())
            .collect();
        let matrices = (0..40)
            .map(|_| Array2::zeros((2, 4)))
            .collect::<Vec<Array2<f64>>>();
        Ok(PreprocessedCorpus {
            sentences,
            processed_sentences,
            labels,
            matrices,
            vectors,
        })
    }
}

struct FailingPreprocessor;

impl Preprocessor for FailingPreprocessor {
    fn preprocess(&mut self, _verbose: bool) -> Result<PreprocessedCorpus> {
        bail!("tokenizer exploded")
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

#[test]
fn pipeline_starts_unprocessed() {
    let pipeline = Pipeline::new(StubPreprocessor);
    assert_eq!(pipeline.stage(), PipelineStage::Unprocessed);
    assert!(pipeline.classifier().is_none());
}

#[test]
fn optimal_svm_before_preprocess_errors() {
    let mut pipeline = Pipeline::new(StubPreprocessor);
    let err = pipeline.optimal_svm::<&str>(None, false).unwrap_err();
    assert!(format!("{}", err).contains("before preprocess"));
}

#[test]
fn preprocess_stores_products_and_transitions() {
    let mut pipeline = Pipeline::new(StubPreprocessor);
    pipeline.preprocess(false).unwrap();

    assert_eq!(pipeline.stage(), PipelineStage::Preprocessed);
    assert_eq!(pipeline.sentences.len(), 40);
    assert_eq!(pipeline.processed_sentences.len(), 40);
    assert_eq!(pipeline.labels.len(), 40);
    assert_eq!(pipeline.matrices.len(), 40);
    assert_eq!(pipeline.vectors.nrows(), 40);
    assert_eq!(pipeline.vectors.ncols(), 4);
}

#[test]
fn preprocessor_errors_propagate_unchanged() {
    let mut pipeline = Pipeline::new(FailingPreprocessor);
    let err = pipeline.preprocess(true).unwrap_err();
    assert!(format!("{}", err).contains("tokenizer exploded"));
    assert_eq!(pipeline.stage(), PipelineStage::Unprocessed);
}

#[test]
fn optimal_svm_stores_winner_and_transitions() {
    let mut pipeline = Pipeline::new(StubPreprocessor);
    pipeline.preprocess(false).unwrap();
    let result = pipeline.optimal_svm::<&str>(None, false).unwrap();

    assert_eq!(pipeline.stage(), PipelineStage::Optimized);
    assert!(pipeline.classifier().is_some());
    assert_eq!(result.fscore.len(), 2);
}

// ---------------------------------------------------------------------------
// Optimizer
// ---------------------------------------------------------------------------

#[test]
fn optimal_writes_one_row_per_trial() {
    let (vectors, labels) = corpus_vectors(40, 4);
    let optimizer = SvmOptimizer::new(vectors, labels).with_grid(
        vec!["linear".to_string()],
        vec![1.0, 10.0],
        vec![],
    );

    let dir = tempfile::tempdir().unwrap();
    let results = dir.path().join("svm_results.csv");
    optimizer.optimal(Some(&results), false).unwrap();

    let contents = fs::read_to_string(&results).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3, "header plus one row per trial");
    assert!(lines[0].starts_with("kernel,"));
}

#[test]
fn optimal_is_deterministic() {
    let (vectors, labels) = corpus_vectors(40, 4);
    let optimizer = SvmOptimizer::new(vectors.clone(), labels.clone());
    let (_, first) = optimizer.optimal::<&str>(None, false).unwrap();

    let optimizer = SvmOptimizer::new(vectors, labels);
    let (_, second) = optimizer.optimal::<&str>(None, false).unwrap();

    assert_eq!(first.kernel, second.kernel);
    assert!((first.c - second.c).abs() < 1e-12);
    assert_eq!(first.fscore.to_vec(), second.fscore.to_vec());
}

#[test]
fn result_rendering_lists_all_fields() {
    let x = Array2::from_shape_vec((2, 2), vec![0.0, 0.0, 1.0, 1.0]).unwrap();
    let result = SvmSearchResult {
        dataset: Dataset::new(
            x.clone(),
            Array1::from_vec(vec![0, 1]),
            x,
            Array1::from_vec(vec![0, 1]),
        )
        .unwrap(),
        kernel: "linear".to_string(),
        c: 1.0,
        gamma: Gamma::Auto,
        precision: Array1::from_vec(vec![1.0, 0.5]),
        recall: Array1::from_vec(vec![0.75, 1.0]),
        fscore: Array1::from_vec(vec![0.8571, 0.6667]),
    };

    let rendered = result.to_string();
    for field in ["kernel:", "precision:", "recall:", "f-score:", "c:", "gamma:"] {
        assert!(rendered.contains(field), "missing {} in:\n{}", field, rendered);
    }
    assert!(rendered.contains("linear"));
    assert!(rendered.contains("auto"));
}
