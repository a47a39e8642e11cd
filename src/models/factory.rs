use crate::config::ClassifierConfig;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::neural::MlpModel;
use crate::models::svm::SvmModel;

/// Build a boxed backend from a `ClassifierConfig`.
/// Currently this is a thin factory implemented as a single function.
pub fn build_model(config: &ClassifierConfig) -> Box<dyn ClassifierModel> {
    match config {
        ClassifierConfig::Svm { kernel, c, gamma } => {
            Box::new(SvmModel::new(kernel.clone(), *c, *gamma))
        }
        ClassifierConfig::NeuralNet {
            solver,
            activation,
            alpha,
            hidden_layer_sizes,
        } => Box::new(MlpModel::new(
            solver.clone(),
            activation.clone(),
            *alpha,
            hidden_layer_sizes.clone(),
        )),
    }
}
