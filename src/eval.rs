//! Classifier Performance Metrics
//!
//! Standard binary-classification scores computed from hard labels and,
//! for ROC AUC, the predicted positive-class scores. Zero-denominator
//! cases (no predicted positives, no actual positives, a single class)
//! return 0.0 rather than erroring, so a degenerate test split never
//! aborts an evaluation run.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Performance metrics for one (model, dataset) evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub roc_auc: f64,
}

/// Fraction of correct predictions. 0.0 on empty input.
pub fn accuracy(y_true: &[bool], y_pred: &[bool]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();
    correct as f64 / y_true.len() as f64
}

/// True positives / predicted positives. 0.0 when nothing was predicted
/// positive.
pub fn precision(y_true: &[bool], y_pred: &[bool]) -> f64 {
    let mut tp = 0usize;
    let mut predicted_pos = 0usize;
    for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
        if p {
            predicted_pos += 1;
            if t {
                tp += 1;
            }
        }
    }
    if predicted_pos == 0 {
        0.0
    } else {
        tp as f64 / predicted_pos as f64
    }
}

/// True positives / actual positives. 0.0 when there are no positive rows.
pub fn recall(y_true: &[bool], y_pred: &[bool]) -> f64 {
    let mut tp = 0usize;
    let mut actual_pos = 0usize;
    for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
        if t {
            actual_pos += 1;
            if p {
                tp += 1;
            }
        }
    }
    if actual_pos == 0 {
        0.0
    } else {
        tp as f64 / actual_pos as f64
    }
}

/// Harmonic mean of precision and recall. 0.0 when both are zero.
pub fn f1_score(y_true: &[bool], y_pred: &[bool]) -> f64 {
    let p = precision(y_true, y_pred);
    let r = recall(y_true, y_pred);
    if p + r == 0.0 {
        0.0
    } else {
        2.0 * p * r / (p + r)
    }
}

/// Area under the ROC curve via the rank statistic (Mann-Whitney U),
/// with mid-ranks for tied scores. 0.0 when either class is absent.
pub fn roc_auc(y_true: &[bool], y_score: &[f64]) -> f64 {
    let n_pos = y_true.iter().filter(|&&t| t).count();
    let n_neg = y_true.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return 0.0;
    }

    let mut order: Vec<usize> = (0..y_score.len()).collect();
    order.sort_by(|&a, &b| {
        y_score[a]
            .partial_cmp(&y_score[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Assign 1-based ranks, averaging over tie groups.
    let mut ranks = vec![0.0f64; y_score.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && y_score[order[j + 1]] == y_score[order[i]] {
            j += 1;
        }
        let mid_rank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = mid_rank;
        }
        i = j + 1;
    }

    let pos_rank_sum: f64 = y_true
        .iter()
        .zip(ranks.iter())
        .filter(|(&t, _)| t)
        .map(|(_, &r)| r)
        .sum();

    let u = pos_rank_sum - (n_pos * (n_pos + 1)) as f64 / 2.0;
    u / (n_pos * n_neg) as f64
}

/// Compute the full performance metric set.
///
/// # Errors
///
/// `Error::ShapeMismatch` when the slices disagree in length.
pub fn compute_performance_metrics(
    y_true: &[bool],
    y_pred: &[bool],
    y_score: &[f64],
) -> Result<PerformanceMetrics> {
    if y_pred.len() != y_true.len() {
        return Err(Error::ShapeMismatch {
            expected: y_true.len(),
            got: y_pred.len(),
        });
    }
    if y_score.len() != y_true.len() {
        return Err(Error::ShapeMismatch {
            expected: y_true.len(),
            got: y_score.len(),
        });
    }

    Ok(PerformanceMetrics {
        accuracy: accuracy(y_true, y_pred),
        precision: precision(y_true, y_pred),
        recall: recall(y_true, y_pred),
        f1_score: f1_score(y_true, y_pred),
        roc_auc: roc_auc(y_true, y_score),
    })
}
