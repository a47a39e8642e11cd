//! Support-vector backend built on linfa-svm.
use anyhow::{anyhow, bail, Context, Result};
use linfa::dataset::Pr;
use linfa::traits::Predict;
use linfa::Dataset;
use linfa_svm::{Svm, SvmParams};
use ndarray::{Array1, Array2};

use crate::config::Gamma;
use crate::models::classifier_trait::ClassifierModel;

/// SMO stopping tolerance.
const SOLVER_EPS: f64 = 1e-7;
/// Degree used by the polynomial kernel.
const POLY_DEGREE: f64 = 3.0;

pub struct SvmModel {
    kernel: String,
    c: f64,
    gamma: Gamma,
    /// (negative, positive) labels, fixed at fit time.
    classes: Option<(i32, i32)>,
    model: Option<Svm<f64, Pr>>,
}

impl SvmModel {
    pub fn new(kernel: String, c: f64, gamma: Gamma) -> Self {
        SvmModel {
            kernel,
            c,
            gamma,
            classes: None,
            model: None,
        }
    }
}

impl ClassifierModel for SvmModel {
    fn fit(&mut self, x: &Array2<f64>, y: &[i32]) -> Result<()> {
        let mut distinct: Vec<i32> = y.to_vec();
        distinct.sort_unstable();
        distinct.dedup();
        if distinct.len() != 2 {
            bail!(
                "SVM backend requires exactly 2 classes, got {}",
                distinct.len()
            );
        }
        let (neg, pos) = (distinct[0], distinct[1]);

        let targets = y.iter().map(|&l| l == pos).collect::<Vec<bool>>();
        let dataset = Dataset::new(x.to_owned(), Array1::from_vec(targets));

        let mut params: SvmParams<f64, Pr> = Svm::<f64, Pr>::params()
            .eps(SOLVER_EPS)
            .pos_neg_weights(self.c, self.c);

        let gamma = self.gamma.resolve(x.ncols());
        params = match self.kernel.as_str() {
            "linear" => params.linear_kernel(),
            "rbf" => params.gaussian_kernel(gamma),
            "poly" => params.polynomial_kernel(gamma, POLY_DEGREE),
            other => bail!(
                "Unsupported kernel type: {}. Valid options are: linear, rbf, poly",
                other
            ),
        };

        let model = <SvmParams<f64, Pr> as linfa::traits::Fit<_, _, _>>::fit(&params, &dataset)
            .context("SVM training failed")?;
        self.classes = Some((neg, pos));
        self.model = Some(model);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Vec<i32>> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| anyhow!("SVM predict called before fit"))?;
        let (neg, pos) = self
            .classes
            .ok_or_else(|| anyhow!("SVM predict called before fit"))?;

        let predictions = model.predict(x.to_owned());
        let labels = predictions
            .targets()
            .iter()
            .map(|&p| if *p > 0.5 { pos } else { neg })
            .collect::<Vec<i32>>();
        Ok(labels)
    }

    fn name(&self) -> &str {
        "svm"
    }
}
