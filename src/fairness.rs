//! Group Fairness Metrics
//!
//! Computes group-fairness statistics for binary classifiers from
//! (ground truth, prediction, group membership) triples. The group slice
//! flags protected rows (`true` = protected group, `false` = reference
//! group).
//!
//! All metric functions are pure and total: a partition that leaves one
//! side empty yields the documented degenerate value (`0.0`, or `1.0`
//! for the disparate impact ratio) rather than an error.
//!
//! # Example
//!
//! ```
//! use equidad::fairness::compute_all_metrics;
//!
//! let y_true = [true, false, true, false];
//! let y_pred = [true, true, false, false];
//! let group = [true, true, false, false];
//!
//! let metrics = compute_all_metrics(&y_true, &y_pred, &group).unwrap();
//! assert!(metrics.demographic_parity_diff.abs() <= 1.0);
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Fairness metrics for one (model, dataset) evaluation.
///
/// Fixed-field record rather than an open mapping, so a missing metric
/// is a compile error instead of a runtime surprise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FairnessMetrics {
    /// mean(pred | protected) - mean(pred | reference), range [-1, 1]
    pub demographic_parity_diff: f64,
    /// TPR(protected) - TPR(reference), range [-1, 1]
    pub equal_opportunity_diff: f64,
    /// (|TPR diff| + |FPR diff|) / 2, range [0, 1]
    pub equalized_odds_diff: f64,
    /// positive_rate(protected) / positive_rate(reference), 1 = parity
    pub disparate_impact_ratio: f64,
    /// Alias of demographic parity, kept as a distinct named output
    /// because downstream weighting treats it separately.
    pub statistical_parity_diff: f64,
}

/// Positive-prediction rate within each side of the partition.
///
/// Returns `(protected, reference)`; a side with zero members is `None`.
fn positive_rates(y_pred: &[bool], group: &[bool]) -> (Option<f64>, Option<f64>) {
    let mut prot_pos = 0usize;
    let mut prot_n = 0usize;
    let mut ref_pos = 0usize;
    let mut ref_n = 0usize;

    for (&pred, &g) in y_pred.iter().zip(group.iter()) {
        if g {
            prot_n += 1;
            if pred {
                prot_pos += 1;
            }
        } else {
            ref_n += 1;
            if pred {
                ref_pos += 1;
            }
        }
    }

    let rate = |pos: usize, n: usize| {
        if n == 0 {
            None
        } else {
            Some(pos as f64 / n as f64)
        }
    };
    (rate(prot_pos, prot_n), rate(ref_pos, ref_n))
}

/// Rate of `pred == true` among rows where `condition` holds, restricted
/// to one side of the partition. Zero when the denominator is empty.
fn conditional_rate(
    y_true: &[bool],
    y_pred: &[bool],
    group: &[bool],
    side: bool,
    truth_value: bool,
) -> f64 {
    let mut hits = 0usize;
    let mut denom = 0usize;

    for ((&t, &p), &g) in y_true.iter().zip(y_pred.iter()).zip(group.iter()) {
        if g == side && t == truth_value {
            denom += 1;
            if p {
                hits += 1;
            }
        }
    }

    if denom == 0 {
        0.0
    } else {
        hits as f64 / denom as f64
    }
}

/// Demographic parity difference.
///
/// Range [-1, 1], 0 = perfect parity. Returns 0.0 when either side of
/// the partition is empty.
pub fn demographic_parity_difference(y_pred: &[bool], group: &[bool]) -> f64 {
    match positive_rates(y_pred, group) {
        (Some(prot), Some(refr)) => prot - refr,
        _ => 0.0,
    }
}

/// Equal opportunity difference: TPR(protected) - TPR(reference).
///
/// Range [-1, 1], 0 = perfect equality. A side with no positive-truth
/// rows contributes a TPR of 0.
pub fn equal_opportunity_difference(y_true: &[bool], y_pred: &[bool], group: &[bool]) -> f64 {
    let tpr_prot = conditional_rate(y_true, y_pred, group, true, true);
    let tpr_ref = conditional_rate(y_true, y_pred, group, false, true);
    tpr_prot - tpr_ref
}

/// Equalized odds difference: average of absolute TPR and FPR differences.
pub fn equalized_odds_difference(y_true: &[bool], y_pred: &[bool], group: &[bool]) -> f64 {
    let tpr_prot = conditional_rate(y_true, y_pred, group, true, true);
    let tpr_ref = conditional_rate(y_true, y_pred, group, false, true);
    let fpr_prot = conditional_rate(y_true, y_pred, group, true, false);
    let fpr_ref = conditional_rate(y_true, y_pred, group, false, false);

    ((tpr_prot - tpr_ref).abs() + (fpr_prot - fpr_ref).abs()) / 2.0
}

/// Disparate impact ratio.
///
/// Range [0, inf), 1 = perfect parity, [0.8, 1.25] is the conventional
/// acceptable band. Returns 1.0 when either side of the partition is
/// empty. Returns 0.0 when the reference positive rate is zero even if
/// the protected rate is nonzero: an undefined ratio is treated as
/// maximal disparity.
pub fn disparate_impact_ratio(y_pred: &[bool], group: &[bool]) -> f64 {
    let (prot, refr) = match positive_rates(y_pred, group) {
        (Some(p), Some(r)) => (p, r),
        _ => return 1.0,
    };

    if refr == 0.0 {
        0.0
    } else {
        prot / refr
    }
}

/// Statistical parity difference (same quantity as demographic parity).
pub fn statistical_parity_difference(y_pred: &[bool], group: &[bool]) -> f64 {
    demographic_parity_difference(y_pred, group)
}

/// Compute all five fairness metrics over one consistent partition.
///
/// # Errors
///
/// `Error::ShapeMismatch` when the three slices disagree in length.
pub fn compute_all_metrics(
    y_true: &[bool],
    y_pred: &[bool],
    group: &[bool],
) -> Result<FairnessMetrics> {
    if y_pred.len() != y_true.len() {
        return Err(Error::ShapeMismatch {
            expected: y_true.len(),
            got: y_pred.len(),
        });
    }
    if group.len() != y_true.len() {
        return Err(Error::ShapeMismatch {
            expected: y_true.len(),
            got: group.len(),
        });
    }

    Ok(FairnessMetrics {
        demographic_parity_diff: demographic_parity_difference(y_pred, group),
        equal_opportunity_diff: equal_opportunity_difference(y_true, y_pred, group),
        equalized_odds_diff: equalized_odds_difference(y_true, y_pred, group),
        disparate_impact_ratio: disparate_impact_ratio(y_pred, group),
        statistical_parity_diff: statistical_parity_difference(y_pred, group),
    })
}
