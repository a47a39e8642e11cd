//! Feed-forward backend built on candle.
//!
//! A stack of `Linear` layers with a configurable activation between them,
//! trained full-batch with cross-entropy loss plus an explicit L2 penalty.
//! Weights are drawn from a fixed-seed rng, so two fits of the same
//! configuration produce identical models.
use anyhow::{anyhow, bail, Result};
use candle_core::{DType, Device, Tensor, Var, D};
use candle_nn::{loss, ops, AdamW, Linear, Module, Optimizer, ParamsAdamW, SGD};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::classifier_trait::ClassifierModel;

const EPOCHS: usize = 200;
const LEARNING_RATE: f64 = 1e-3;
const INIT_SEED: u64 = 42;

pub struct MlpModel {
    solver: String,
    activation: String,
    alpha: f64,
    hidden_layer_sizes: Vec<usize>,
    device: Device,
    net: Option<TrainedNet>,
}

struct TrainedNet {
    layers: Vec<Linear>,
    activation: String,
    /// Class labels indexed by output-logit position.
    classes: Vec<i32>,
}

impl MlpModel {
    pub fn new(
        solver: String,
        activation: String,
        alpha: f64,
        hidden_layer_sizes: Vec<usize>,
    ) -> Self {
        MlpModel {
            solver,
            activation,
            alpha,
            hidden_layer_sizes,
            device: Device::Cpu,
            net: None,
        }
    }

    fn features_tensor(&self, x: &Array2<f64>) -> Result<Tensor> {
        let values = x.iter().map(|&v| v as f32).collect::<Vec<f32>>();
        let tensor = Tensor::from_vec(values, (x.nrows(), x.ncols()), &self.device)?;
        Ok(tensor)
    }
}

fn apply_activation(name: &str, t: &Tensor) -> candle_core::Result<Tensor> {
    match name {
        "tanh" => t.tanh(),
        "relu" => t.relu(),
        "logistic" => ops::sigmoid(t),
        // Validated before training; identity is the fallthrough.
        _ => Ok(t.clone()),
    }
}

fn forward(layers: &[Linear], activation: &str, x: &Tensor) -> candle_core::Result<Tensor> {
    let mut out = x.clone();
    for (i, layer) in layers.iter().enumerate() {
        out = layer.forward(&out)?;
        if i + 1 < layers.len() {
            out = apply_activation(activation, &out)?;
        }
    }
    Ok(out)
}

/// Sum of squared parameters across the whole network.
fn l2_penalty(vars: &[Var], device: &Device) -> candle_core::Result<Tensor> {
    let mut sum = Tensor::zeros((), DType::F32, device)?;
    for var in vars {
        sum = (sum + var.as_tensor().sqr()?.sum_all()?)?;
    }
    Ok(sum)
}

/// One linear layer with uniform init in `±1/sqrt(fan_in)` drawn from `rng`.
/// Returns the layer plus its trainable weight and bias vars.
fn seeded_linear(
    fan_in: usize,
    fan_out: usize,
    rng: &mut StdRng,
    device: &Device,
) -> candle_core::Result<(Linear, Var, Var)> {
    let bound = 1.0 / (fan_in.max(1) as f32).sqrt();
    let weight: Vec<f32> = (0..fan_out * fan_in)
        .map(|_| rng.gen_range(-bound..bound))
        .collect();
    let weight = Var::from_tensor(&Tensor::from_vec(weight, (fan_out, fan_in), device)?)?;
    let bias: Vec<f32> = (0..fan_out).map(|_| rng.gen_range(-bound..bound)).collect();
    let bias = Var::from_tensor(&Tensor::from_vec(bias, fan_out, device)?)?;
    let layer = Linear::new(weight.as_tensor().clone(), Some(bias.as_tensor().clone()));
    Ok((layer, weight, bias))
}

enum Solver {
    Adam(AdamW),
    Sgd(SGD),
}

impl Solver {
    fn backward_step(&mut self, loss: &Tensor) -> candle_core::Result<()> {
        match self {
            Solver::Adam(opt) => opt.backward_step(loss),
            Solver::Sgd(opt) => opt.backward_step(loss),
        }
    }
}

impl ClassifierModel for MlpModel {
    fn fit(&mut self, x: &Array2<f64>, y: &[i32]) -> Result<()> {
        match self.activation.as_str() {
            "tanh" | "relu" | "logistic" | "identity" => {}
            other => bail!(
                "Unsupported activation: {}. Valid options are: tanh, relu, logistic, identity",
                other
            ),
        }

        let mut classes: Vec<i32> = y.to_vec();
        classes.sort_unstable();
        classes.dedup();
        if classes.len() < 2 {
            bail!("Neural backend requires at least 2 classes");
        }

        let class_indices = y
            .iter()
            .map(|l| {
                classes
                    .iter()
                    .position(|c| c == l)
                    .map(|i| i as u32)
                    .ok_or_else(|| anyhow!("Label {} missing from class axis", l))
            })
            .collect::<Result<Vec<u32>>>()?;

        let mut dims = Vec::with_capacity(self.hidden_layer_sizes.len() + 2);
        dims.push(x.ncols());
        dims.extend_from_slice(&self.hidden_layer_sizes);
        dims.push(classes.len());

        let mut rng = StdRng::seed_from_u64(INIT_SEED);
        let mut layers = Vec::with_capacity(dims.len() - 1);
        let mut vars = Vec::with_capacity(2 * (dims.len() - 1));
        for win in dims.windows(2) {
            let (layer, weight, bias) = seeded_linear(win[0], win[1], &mut rng, &self.device)?;
            layers.push(layer);
            vars.push(weight);
            vars.push(bias);
        }

        let features = self.features_tensor(x)?;
        let targets = Tensor::from_vec(class_indices, y.len(), &self.device)?;

        let mut solver = match self.solver.as_str() {
            "adam" => Solver::Adam(AdamW::new(
                vars.clone(),
                ParamsAdamW {
                    lr: LEARNING_RATE,
                    weight_decay: 0.0,
                    ..Default::default()
                },
            )?),
            "sgd" => Solver::Sgd(SGD::new(vars.clone(), LEARNING_RATE)?),
            other => bail!("Unsupported solver: {}. Valid options are: adam, sgd", other),
        };

        for epoch in 0..EPOCHS {
            let logits = forward(&layers, &self.activation, &features)?;
            let ce = loss::cross_entropy(&logits, &targets)?;
            let penalty = l2_penalty(&vars, &self.device)?.affine(self.alpha, 0.0)?;
            let total = (ce + penalty)?;
            solver.backward_step(&total)?;

            if epoch % 50 == 0 {
                log::debug!("mlp epoch {}: loss {:.6}", epoch, total.to_scalar::<f32>()?);
            }
        }

        self.net = Some(TrainedNet {
            layers,
            activation: self.activation.clone(),
            classes,
        });
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Vec<i32>> {
        let net = self
            .net
            .as_ref()
            .ok_or_else(|| anyhow!("MLP predict called before fit"))?;

        let features = self.features_tensor(x)?;
        let logits = forward(&net.layers, &net.activation, &features)?;
        let indices = logits.argmax(D::Minus1)?.to_vec1::<u32>()?;
        Ok(indices
            .into_iter()
            .map(|i| net.classes[i as usize])
            .collect())
    }

    fn name(&self) -> &str {
        "mlp"
    }
}
