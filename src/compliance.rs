//! Fairness Compliance Evaluation
//!
//! Applies threshold checks to a fairness metric set and produces a
//! structured verdict. The same evaluator backs both the governance
//! registry and the alerting path, so the decision logic lives here and
//! nowhere else.

use crate::fairness::FairnessMetrics;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Compliance thresholds for the fairness metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FairnessThresholds {
    /// Maximum allowed |demographic parity difference|.
    pub demographic_parity_diff: f64,
    /// Maximum allowed |equal opportunity difference|.
    pub equal_opportunity_diff: f64,
    /// Maximum allowed |equalized odds difference|.
    pub equalized_odds_diff: f64,
    /// Acceptable disparate impact band, lower bound.
    pub disparate_impact_ratio_min: f64,
    /// Acceptable disparate impact band, upper bound.
    pub disparate_impact_ratio_max: f64,
}

impl Default for FairnessThresholds {
    fn default() -> Self {
        Self {
            demographic_parity_diff: 0.1,
            equal_opportunity_diff: 0.1,
            equalized_odds_diff: 0.1,
            disparate_impact_ratio_min: 0.8,
            disparate_impact_ratio_max: 1.25,
        }
    }
}

/// The closed set of threshold violations.
///
/// Serialized names match the persisted registry and audit documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Violation {
    #[serde(rename = "DEMOGRAPHIC_PARITY_VIOLATION")]
    DemographicParity,
    #[serde(rename = "EQUAL_OPPORTUNITY_VIOLATION")]
    EqualOpportunity,
    #[serde(rename = "EQUALIZED_ODDS_VIOLATION")]
    EqualizedOdds,
    #[serde(rename = "DISPARATE_IMPACT_VIOLATION")]
    DisparateImpact,
}

impl Violation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Violation::DemographicParity => "DEMOGRAPHIC_PARITY_VIOLATION",
            Violation::EqualOpportunity => "EQUAL_OPPORTUNITY_VIOLATION",
            Violation::EqualizedOdds => "EQUALIZED_ODDS_VIOLATION",
            Violation::DisparateImpact => "DISPARATE_IMPACT_VIOLATION",
        }
    }
}

/// Verdict of one compliance evaluation. Derived, never stored on its
/// own; the registry embeds it in each record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceStatus {
    pub compliant: bool,
    /// Violations in fixed check order: parity, opportunity, odds, impact.
    pub violations: Vec<Violation>,
    pub checked_at: DateTime<Utc>,
    /// 100 minus 25 per violation, floored at 0. Used for ranking.
    pub compliance_score: f64,
}

/// Evaluate a metric set against thresholds.
///
/// Checks run in a fixed order so identical metrics always produce an
/// identical violation sequence.
pub fn evaluate(metrics: &FairnessMetrics, thresholds: &FairnessThresholds) -> ComplianceStatus {
    let mut violations = Vec::new();

    if metrics.demographic_parity_diff.abs() > thresholds.demographic_parity_diff {
        violations.push(Violation::DemographicParity);
    }
    if metrics.equal_opportunity_diff.abs() > thresholds.equal_opportunity_diff {
        violations.push(Violation::EqualOpportunity);
    }
    if metrics.equalized_odds_diff.abs() > thresholds.equalized_odds_diff {
        violations.push(Violation::EqualizedOdds);
    }
    if metrics.disparate_impact_ratio < thresholds.disparate_impact_ratio_min
        || metrics.disparate_impact_ratio > thresholds.disparate_impact_ratio_max
    {
        violations.push(Violation::DisparateImpact);
    }

    let compliance_score = (100.0 - 25.0 * violations.len() as f64).max(0.0);

    ComplianceStatus {
        compliant: violations.is_empty(),
        violations,
        checked_at: Utc::now(),
        compliance_score,
    }
}
