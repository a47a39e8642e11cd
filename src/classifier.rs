//! The classifier wrapper: a dataset, a configuration, and an optional
//! trained model handle.
use std::collections::BTreeSet;

use anyhow::{anyhow, Result};

use crate::config::ClassifierConfig;
use crate::data_handling::Dataset;
use crate::metrics::{precision_recall_fscore, ClassScores};
use crate::models::classifier_trait::ClassifierModel;
use crate::models::factory;

/// Trainable classifier bound to a dataset.
///
/// Lifecycle: constructed with data, optionally `configure`d, `fit` (builds
/// and trains the backend, overwriting any previous model), then `evaluate`d
/// read-only against the held-out test split. All three chain fluently.
pub struct SubjectivityClassifier {
    data: Dataset,
    config: ClassifierConfig,
    model: Option<Box<dyn ClassifierModel>>,
}

impl SubjectivityClassifier {
    pub fn new(data: Dataset, config: ClassifierConfig) -> Self {
        SubjectivityClassifier {
            data,
            config,
            model: None,
        }
    }

    /// Support-vector variant with default hyperparameters.
    pub fn svm(data: Dataset) -> Self {
        Self::new(data, ClassifierConfig::svm_defaults())
    }

    /// Feed-forward variant with default hyperparameters; the hidden width
    /// is resolved from the dataset's feature count.
    pub fn neural(data: Dataset) -> Self {
        let config = ClassifierConfig::neural_defaults(data.n_features());
        Self::new(data, config)
    }

    /// Replace the configuration wholesale. Does not touch any trained
    /// model; the next `fit` rebuilds from the new value.
    pub fn configure(mut self, config: ClassifierConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn data(&self) -> &Dataset {
        &self.data
    }

    /// Build the backend from the current configuration and train it on the
    /// stored training split.
    pub fn fit(mut self) -> Result<Self> {
        let mut model = factory::build_model(&self.config);
        let y_train = self.data.y_train.to_vec();
        model.fit(&self.data.x_train, &y_train)?;
        log::debug!("fit {} on {} rows", model.name(), self.data.x_train.nrows());
        self.model = Some(model);
        Ok(self)
    }

    /// Run the trained model on the stored test features and score against
    /// the test labels. Errors if called before `fit`.
    pub fn evaluate(&self) -> Result<ClassScores> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| anyhow!("evaluate called before fit"))?;

        let predicted = model.predict(&self.data.x_test)?;

        // Class axis: distinct labels seen in the test split or predictions.
        let mut classes: BTreeSet<i32> = self.data.y_test.iter().copied().collect();
        classes.extend(predicted.iter().copied());
        let classes: Vec<i32> = classes.into_iter().collect();

        let y_test = self.data.y_test.to_vec();
        precision_recall_fscore(&y_test, &predicted, &classes)
    }
}
