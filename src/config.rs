use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Central configuration for the classifiers in this crate.
///
/// One variant per backend; each variant carries its own hyper-parameters.
/// A configuration is an immutable value: `SubjectivityClassifier::configure`
/// swaps the whole value and `fit` rebuilds the underlying model from it, so
/// there is no drift between repeated `configure` calls.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub enum ClassifierConfig {
    Svm {
        /// Kernel name: `linear`, `rbf`, or `poly`.
        kernel: String,
        /// Misclassification cost.
        c: f64,
        /// Kernel coefficient for `rbf` and `poly`.
        gamma: Gamma,
    },
    NeuralNet {
        /// Weight optimizer: `adam` or `sgd`.
        solver: String,
        /// Hidden-layer activation: `tanh`, `relu`, `logistic`, or `identity`.
        activation: String,
        /// L2 penalty strength added to the training loss.
        alpha: f64,
        /// Widths of the hidden layers, input to output.
        hidden_layer_sizes: Vec<usize>,
    },
}

/// Kernel coefficient. `Auto` resolves to `1 / n_features` at fit time.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub enum Gamma {
    Auto,
    Value(f64),
}

impl Gamma {
    pub fn resolve(&self, n_features: usize) -> f64 {
        match self {
            Gamma::Auto => 1.0 / n_features.max(1) as f64,
            Gamma::Value(v) => *v,
        }
    }
}

impl fmt::Display for Gamma {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gamma::Auto => write!(f, "auto"),
            Gamma::Value(v) => write!(f, "{}", v),
        }
    }
}

impl FromStr for Gamma {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Gamma::Auto),
            other => other
                .parse::<f64>()
                .map(Gamma::Value)
                .map_err(|_| format!("Invalid gamma: {}. Expected 'auto' or a number", s)),
        }
    }
}

impl ClassifierConfig {
    /// Default support-vector configuration: linear kernel, unit cost.
    pub fn svm_defaults() -> Self {
        ClassifierConfig::Svm {
            kernel: "linear".to_string(),
            c: 1.0,
            gamma: Gamma::Auto,
        }
    }

    /// Default feed-forward configuration for an input of `n_features`
    /// columns: one hidden layer of half the input width, rounded up.
    pub fn neural_defaults(n_features: usize) -> Self {
        ClassifierConfig::NeuralNet {
            solver: "adam".to_string(),
            activation: "tanh".to_string(),
            alpha: 1e-4,
            hidden_layer_sizes: vec![(n_features + 1) / 2],
        }
    }
}

impl FromStr for ClassifierConfig {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "svm" => Ok(ClassifierConfig::svm_defaults()),
            // Hidden width is data-dependent; callers that pick the neural
            // variant by name get a placeholder resolved at construction.
            "nn" | "neural" | "mlp" => Ok(ClassifierConfig::neural_defaults(1)),
            _ => Err(format!(
                "Unknown classifier type: {}. Valid options are: svm, nn",
                s
            )),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig::svm_defaults()
    }
}
