//! Registry Snapshot Export
//!
//! Flattens registry records into rows for the read-only export
//! collaborators (CRM sync, spreadsheet export). Pure formatting over a
//! snapshot; safe to run next to concurrent registration since it never
//! touches the live stores.

use crate::alert::Alert;
use crate::governance::RegistryRecord;
use serde::{Deserialize, Serialize};

/// One flat export row per registry record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryRow {
    pub version_id: String,
    pub model_name: String,
    pub dataset: String,
    pub registration_timestamp: String,
    pub accuracy: f64,
    pub f1_score: f64,
    pub demographic_parity_diff: f64,
    pub equal_opportunity_diff: f64,
    pub equalized_odds_diff: f64,
    pub disparate_impact_ratio: f64,
    pub statistical_parity_diff: f64,
    pub compliant: bool,
}

impl RegistryRow {
    fn from_record(record: &RegistryRecord) -> Self {
        Self {
            version_id: record.version_id.clone(),
            model_name: record.model_name.clone(),
            dataset: record.dataset.clone(),
            registration_timestamp: record.registration_timestamp.to_rfc3339(),
            accuracy: record.performance_metrics.accuracy,
            f1_score: record.performance_metrics.f1_score,
            demographic_parity_diff: record.fairness_metrics.demographic_parity_diff,
            equal_opportunity_diff: record.fairness_metrics.equal_opportunity_diff,
            equalized_odds_diff: record.fairness_metrics.equalized_odds_diff,
            disparate_impact_ratio: record.fairness_metrics.disparate_impact_ratio,
            statistical_parity_diff: record.fairness_metrics.statistical_parity_diff,
            compliant: record.compliance_status.compliant,
        }
    }
}

/// A point-in-time flat view of the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub rows: Vec<RegistryRow>,
}

impl RegistrySnapshot {
    /// Build a snapshot from exported records.
    pub fn from_records(records: &[RegistryRecord]) -> Self {
        Self {
            rows: records.iter().map(RegistryRow::from_record).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.rows)
    }

    pub fn to_csv(&self) -> String {
        let mut output = String::from(
            "version_id,model_name,dataset,registration_timestamp,accuracy,f1_score,\
             demographic_parity_diff,equal_opportunity_diff,equalized_odds_diff,\
             disparate_impact_ratio,statistical_parity_diff,compliant\n",
        );

        for row in &self.rows {
            output.push_str(&format!(
                "{},{},{},{},{},{},{},{},{},{},{},{}\n",
                csv_field(&row.version_id),
                csv_field(&row.model_name),
                csv_field(&row.dataset),
                csv_field(&row.registration_timestamp),
                row.accuracy,
                row.f1_score,
                row.demographic_parity_diff,
                row.equal_opportunity_diff,
                row.equalized_odds_diff,
                row.disparate_impact_ratio,
                row.statistical_parity_diff,
                row.compliant
            ));
        }

        output
    }
}

/// Quote a CSV field when it contains a delimiter, quote, or newline;
/// embedded quotes are doubled.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Alert list as a JSON payload for the chat/export collaborators.
pub fn alerts_to_json(alerts: &[Alert]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(alerts)
}
