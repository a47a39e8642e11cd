//! End-to-end orchestration: preprocessing, then optimizer-driven model
//! search.
//!
//! The pipeline is a three-stage state machine: unprocessed, preprocessed,
//! optimized. Preprocessing is delegated to an injected collaborator;
//! errors from collaborators propagate unchanged.
use std::path::Path;

use anyhow::{anyhow, Result};
use ndarray::{Array1, Array2};

use crate::classifier::SubjectivityClassifier;
use crate::search::{SvmOptimizer, SvmSearchResult};

/// External preprocessing collaborator: turns raw input into sentences,
/// tokenized sentences, labels, per-sentence embedding matrices, and dense
/// sentence vectors.
pub trait Preprocessor {
    fn preprocess(&mut self, verbose: bool) -> Result<PreprocessedCorpus>;
}

#[derive(Debug, Clone)]
pub struct PreprocessedCorpus {
    pub sentences: Vec<String>,
    pub processed_sentences: Vec<Vec<String>>,
    pub labels: Array1<i32>,
    pub matrices: Vec<Array2<f64>>,
    pub vectors: Array2<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Unprocessed,
    Preprocessed,
    Optimized,
}

pub struct Pipeline<P> {
    preprocessor: P,
    stage: PipelineStage,
    pub sentences: Vec<String>,
    pub processed_sentences: Vec<Vec<String>>,
    pub labels: Array1<i32>,
    pub matrices: Vec<Array2<f64>>,
    pub vectors: Array2<f64>,
    classifier: Option<SubjectivityClassifier>,
    optimizer: Option<SvmOptimizer>,
}

impl<P: Preprocessor> Pipeline<P> {
    pub fn new(preprocessor: P) -> Self {
        Pipeline {
            preprocessor,
            stage: PipelineStage::Unprocessed,
            sentences: Vec::new(),
            processed_sentences: Vec::new(),
            labels: Array1::zeros(0),
            matrices: Vec::new(),
            vectors: Array2::zeros((0, 0)),
            classifier: None,
            optimizer: None,
        }
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Run the preprocessor, store its products, and bind an SVM optimizer
    /// to the dense vectors and labels.
    pub fn preprocess(&mut self, verbose: bool) -> Result<&mut Self> {
        let corpus = self.preprocessor.preprocess(verbose)?;

        log::info!(
            "preprocessed {} sentences into {}x{} dense vectors",
            corpus.sentences.len(),
            corpus.vectors.nrows(),
            corpus.vectors.ncols()
        );

        self.optimizer = Some(SvmOptimizer::new(
            corpus.vectors.clone(),
            corpus.labels.clone(),
        ));
        self.sentences = corpus.sentences;
        self.processed_sentences = corpus.processed_sentences;
        self.labels = corpus.labels;
        self.matrices = corpus.matrices;
        self.vectors = corpus.vectors;
        self.stage = PipelineStage::Preprocessed;
        Ok(self)
    }

    /// Search the SVM hyperparameter space, keep the winning classifier on
    /// the pipeline, and return its result record. Requires a prior
    /// `preprocess`.
    pub fn optimal_svm<Q: AsRef<Path>>(
        &mut self,
        results_file: Option<Q>,
        verbose: bool,
    ) -> Result<SvmSearchResult> {
        let optimizer = self
            .optimizer
            .as_ref()
            .ok_or_else(|| anyhow!("optimal_svm called before preprocess"))?;

        let (classifier, result) = optimizer.optimal(results_file, verbose)?;
        self.classifier = Some(classifier);
        self.stage = PipelineStage::Optimized;
        Ok(result)
    }

    /// The winning classifier, once `optimal_svm` has run.
    pub fn classifier(&self) -> Option<&SubjectivityClassifier> {
        self.classifier.as_ref()
    }
}
