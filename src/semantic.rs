//! Semantic Bias Indicators
//!
//! Aggregates per-model results for a dataset into three cross-model
//! indicators:
//!
//! - **Bias Delta Score**: weighted scalar summarizing one model's
//!   fairness metrics, aggregated mean/max/min/std across models.
//! - **Fairness Stability Index**: coefficient-of-variation measure of
//!   how consistent the fairness metrics are across models.
//! - **Prediction Drift Score**: disagreement rate of each model's
//!   predictions against a reference model's.
//!
//! All consume `BTreeMap`s keyed by model name so that iteration order,
//! and therefore every reported aggregate, is deterministic.

use crate::error::{Error, Result};
use crate::fairness::FairnessMetrics;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bias Delta Score component weights. Must sum to 1.0.
pub const DPD_WEIGHT: f64 = 0.25;
pub const EOD_WEIGHT: f64 = 0.25;
pub const EODD_WEIGHT: f64 = 0.25;
pub const DIR_WEIGHT: f64 = 0.15;
pub const SPD_WEIGHT: f64 = 0.10;

/// Cross-model bias summary for one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasDeltaSummary {
    pub mean_bias_delta: f64,
    pub max_bias_delta: f64,
    pub min_bias_delta: f64,
    pub std_bias_delta: f64,
    pub per_model_scores: BTreeMap<String, f64>,
}

/// Stability classification derived from the index value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StabilityCategory {
    High,
    Medium,
    Low,
}

impl StabilityCategory {
    /// Classify an index value: High above 0.7, Medium above 0.5, else Low.
    pub fn from_index(index: f64) -> Self {
        if index > 0.7 {
            StabilityCategory::High
        } else if index > 0.5 {
            StabilityCategory::Medium
        } else {
            StabilityCategory::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StabilityCategory::High => "High",
            StabilityCategory::Medium => "Medium",
            StabilityCategory::Low => "Low",
        }
    }
}

/// Cross-model fairness consistency for one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityIndex {
    /// 1 / (1 + avg CV), range (0, 1], higher = more stable.
    pub fairness_stability_index: f64,
    /// Average coefficient of variation over the five components.
    pub coefficient_of_variation: f64,
    /// Per-component CV, fixed order: dpd, eod, eodd, |1-dir|, spd.
    pub per_metric_cv: [f64; 5],
    pub stability_category: StabilityCategory,
}

/// Absolute-valued bias components in fixed order:
/// dpd, eod, eodd, |1 - dir|, spd.
fn bias_components(m: &FairnessMetrics) -> [f64; 5] {
    [
        m.demographic_parity_diff.abs(),
        m.equal_opportunity_diff.abs(),
        m.equalized_odds_diff.abs(),
        (1.0 - m.disparate_impact_ratio).abs(),
        m.statistical_parity_diff.abs(),
    ]
}

/// Weighted Bias Delta Score for a single model's metrics.
pub fn bias_delta(m: &FairnessMetrics) -> f64 {
    let [dpd, eod, eodd, dir, spd] = bias_components(m);
    dpd * DPD_WEIGHT + eod * EOD_WEIGHT + eodd * EODD_WEIGHT + dir * DIR_WEIGHT + spd * SPD_WEIGHT
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation, matching the original aggregation.
fn population_std(values: &[f64]) -> f64 {
    let m = mean(values);
    (values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64).sqrt()
}

/// Compute the cross-model Bias Delta Score summary.
///
/// # Errors
///
/// `Error::EmptyInput` when no models are supplied.
pub fn compute_bias_delta_score(
    metrics_by_model: &BTreeMap<String, FairnessMetrics>,
) -> Result<BiasDeltaSummary> {
    if metrics_by_model.is_empty() {
        return Err(Error::EmptyInput(
            "bias delta score requires at least one model".to_string(),
        ));
    }

    let per_model_scores: BTreeMap<String, f64> = metrics_by_model
        .iter()
        .map(|(name, m)| (name.clone(), bias_delta(m)))
        .collect();
    let scores: Vec<f64> = per_model_scores.values().copied().collect();

    Ok(BiasDeltaSummary {
        mean_bias_delta: mean(&scores),
        max_bias_delta: scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        min_bias_delta: scores.iter().copied().fold(f64::INFINITY, f64::min),
        std_bias_delta: population_std(&scores),
        per_model_scores,
    })
}

/// Compute the Fairness Stability Index across models.
///
/// With a single model every per-component CV is 0 and the index
/// saturates at 1.0; at least two models are needed for a meaningful
/// variation measure.
///
/// # Errors
///
/// `Error::EmptyInput` when no models are supplied.
pub fn compute_fairness_stability_index(
    metrics_by_model: &BTreeMap<String, FairnessMetrics>,
) -> Result<StabilityIndex> {
    if metrics_by_model.is_empty() {
        return Err(Error::EmptyInput(
            "stability index requires at least one model".to_string(),
        ));
    }

    let vectors: Vec<[f64; 5]> = metrics_by_model.values().map(bias_components).collect();

    let mut per_metric_cv = [0.0f64; 5];
    for (i, cv) in per_metric_cv.iter_mut().enumerate() {
        let column: Vec<f64> = vectors.iter().map(|v| v[i]).collect();
        let m = mean(&column);
        *cv = if m == 0.0 {
            0.0
        } else {
            population_std(&column) / m
        };
    }

    let avg_cv = mean(&per_metric_cv);
    let index = 1.0 / (1.0 + avg_cv);

    Ok(StabilityIndex {
        fairness_stability_index: index,
        coefficient_of_variation: avg_cv,
        per_metric_cv,
        stability_category: StabilityCategory::from_index(index),
    })
}

/// Inter-model prediction divergence against a reference model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionDrift {
    pub mean_prediction_drift: f64,
    pub max_prediction_drift: f64,
    /// The model the others were compared against.
    pub reference_model: String,
}

/// Compute the Prediction Drift Score: for every model other than the
/// reference, the fraction of rows where its predictions disagree with
/// the reference's, reported as mean and max.
///
/// When `reference_model` is not present in the map the first model (by
/// key order) is used instead. With fewer than two models both drift
/// values are 0.0.
///
/// # Errors
///
/// `Error::EmptyInput` when no models are supplied, `Error::ShapeMismatch`
/// when a model's prediction vector differs in length from the reference's.
pub fn compute_prediction_drift_score(
    predictions_by_model: &BTreeMap<String, Vec<bool>>,
    reference_model: &str,
) -> Result<PredictionDrift> {
    let reference = if predictions_by_model.contains_key(reference_model) {
        reference_model.to_string()
    } else {
        predictions_by_model
            .keys()
            .next()
            .cloned()
            .ok_or_else(|| {
                Error::EmptyInput("prediction drift requires at least one model".to_string())
            })?
    };
    let reference_preds = &predictions_by_model[&reference];
    if reference_preds.is_empty() {
        return Err(Error::EmptyInput(
            "reference model has no predictions".to_string(),
        ));
    }

    let mut drift_scores = Vec::new();
    for (name, preds) in predictions_by_model {
        if *name == reference {
            continue;
        }
        if preds.len() != reference_preds.len() {
            return Err(Error::ShapeMismatch {
                expected: reference_preds.len(),
                got: preds.len(),
            });
        }
        let disagreements = reference_preds
            .iter()
            .zip(preds)
            .filter(|(a, b)| a != b)
            .count();
        drift_scores.push(disagreements as f64 / reference_preds.len() as f64);
    }

    Ok(PredictionDrift {
        mean_prediction_drift: if drift_scores.is_empty() {
            0.0
        } else {
            mean(&drift_scores)
        },
        max_prediction_drift: drift_scores.iter().copied().fold(0.0, f64::max),
        reference_model: reference,
    })
}
