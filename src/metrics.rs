//! Per-class evaluation scores.
use anyhow::{bail, Result};
use ndarray::Array1;

/// Precision, recall, and F-score per class, plus support counts.
///
/// Vectors are indexed by `classes`, which is sorted ascending. Support is
/// the number of true occurrences of each class and is carried for reporting
/// but is not part of the classifier `evaluate` contract.
#[derive(Debug, Clone)]
pub struct ClassScores {
    pub classes: Vec<i32>,
    pub precision: Array1<f64>,
    pub recall: Array1<f64>,
    pub fscore: Array1<f64>,
    pub support: Array1<usize>,
}

impl ClassScores {
    pub fn macro_precision(&self) -> f64 {
        mean(&self.precision)
    }

    pub fn macro_recall(&self) -> f64 {
        mean(&self.recall)
    }

    pub fn macro_fscore(&self) -> f64 {
        mean(&self.fscore)
    }
}

fn mean(values: &Array1<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sum() / values.len() as f64
}

/// Compute per-class precision, recall, and F-score.
///
/// For each class c: precision = TP / (TP + FP), recall = TP / (TP + FN),
/// F = 2 * P * R / (P + R). A zero denominator scores 0.0 for that entry.
///
/// # Arguments
///
/// * `y_true` - Ground-truth labels.
/// * `y_pred` - Predicted labels, same length.
/// * `classes` - The class axis, sorted ascending. Labels outside this set
///   still count as false positives/negatives against the listed classes.
pub fn precision_recall_fscore(
    y_true: &[i32],
    y_pred: &[i32],
    classes: &[i32],
) -> Result<ClassScores> {
    if y_true.len() != y_pred.len() {
        bail!(
            "Label vectors must have equal lengths: {} vs {}",
            y_true.len(),
            y_pred.len()
        );
    }
    if classes.is_empty() {
        bail!("Class axis is empty");
    }

    let mut precision = Vec::with_capacity(classes.len());
    let mut recall = Vec::with_capacity(classes.len());
    let mut fscore = Vec::with_capacity(classes.len());
    let mut support = Vec::with_capacity(classes.len());

    for &class in classes {
        let mut tp = 0usize;
        let mut fp = 0usize;
        let mut fn_ = 0usize;
        for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
            match (t == class, p == class) {
                (true, true) => tp += 1,
                (false, true) => fp += 1,
                (true, false) => fn_ += 1,
                (false, false) => {}
            }
        }
        let p = ratio(tp, tp + fp);
        let r = ratio(tp, tp + fn_);
        let f = if p + r > 0.0 {
            2.0 * p * r / (p + r)
        } else {
            0.0
        };
        precision.push(p);
        recall.push(r);
        fscore.push(f);
        support.push(tp + fn_);
    }

    Ok(ClassScores {
        classes: classes.to_vec(),
        precision: Array1::from_vec(precision),
        recall: Array1::from_vec(recall),
        fscore: Array1::from_vec(fscore),
        support: Array1::from_vec(support),
    })
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
