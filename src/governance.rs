//! Model Governance Registry & Audit Log
//!
//! Persists an append-only, versioned record of every evaluated model
//! together with an immutable audit trail. Records are only ever
//! appended; nothing is mutated or deleted after creation.
//!
//! Both stores are whole JSON documents rewritten on every mutation, via
//! write-to-temp-then-rename so a crash mid-write cannot corrupt the
//! previous document. Each audit entry carries a SHA-256 checksum of its
//! `details` payload, computed at write time. The checksum protects that
//! single entry against later corruption; entries are NOT chained to one
//! another, so reordering or truncating the log is not detectable from
//! checksums alone.
//!
//! A failed registration rolls back the in-memory appends and, when the
//! registry was already persisted, re-persists it without the record. If
//! that compensating write also fails the two on-disk documents diverge:
//! the registry file keeps a record with no audit entry. That double
//! fault is reported in the returned error and logged; recovery is
//! re-running `register` once the store is writable again, or removing
//! the trailing record by hand.
//!
//! The registry is an owned struct with `&mut self` mutations. Callers
//! that share it across threads wrap it in a `Mutex`; the version
//! counter, record append, and both persists then execute as one
//! serialized unit per registration.

use crate::compliance::{self, ComplianceStatus, FairnessThresholds, Violation};
use crate::error::{Error, Result};
use crate::eval::PerformanceMetrics;
use crate::fairness::FairnessMetrics;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// One registered (model, dataset, evaluation) event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryRecord {
    /// Unique, monotonically increasing id: `v{n}_{unix_secs}`.
    pub version_id: String,
    pub model_name: String,
    pub dataset: String,
    pub registration_timestamp: DateTime<Utc>,
    pub performance_metrics: PerformanceMetrics,
    pub fairness_metrics: FairnessMetrics,
    pub compliance_status: ComplianceStatus,
    pub model_hash: String,
}

/// One immutable audit event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// `AUD_{n}_{unix_secs}`.
    pub audit_id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub entity_id: String,
    /// Opaque structured payload; for registrations, the full record.
    pub details: serde_json::Value,
    /// SHA-256 hex digest of the canonical JSON form of `details`.
    pub checksum: String,
}

/// Registry-wide compliance roll-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub total_models_registered: usize,
    pub compliant_models: usize,
    pub non_compliant_models: usize,
    /// Compliant fraction; 0.0 for an empty registry.
    pub compliance_rate: f64,
    /// Violation-name to occurrence count over all records.
    pub violation_summary: BTreeMap<String, usize>,
    pub report_generated_at: DateTime<Utc>,
}

/// Governance registry with synchronous write-through persistence.
#[derive(Debug)]
pub struct GovernanceRegistry {
    registry_path: PathBuf,
    audit_log_path: PathBuf,
    records: Vec<RegistryRecord>,
    audit_log: Vec<AuditEntry>,
    version_counter: u64,
    thresholds: FairnessThresholds,
}

impl GovernanceRegistry {
    /// Open (or create) a registry backed by the two given documents.
    ///
    /// The version counter is seeded from the count of existing records,
    /// so ids stay unique across process restarts.
    pub fn open<P: AsRef<Path>, Q: AsRef<Path>>(
        registry_path: P,
        audit_log_path: Q,
    ) -> Result<Self> {
        let registry_path = registry_path.as_ref().to_path_buf();
        let audit_log_path = audit_log_path.as_ref().to_path_buf();

        let records: Vec<RegistryRecord> = load_document(&registry_path)?;
        let audit_log: Vec<AuditEntry> = load_document(&audit_log_path)?;
        let version_counter = records.len() as u64;

        Ok(Self {
            registry_path,
            audit_log_path,
            records,
            audit_log,
            version_counter,
            thresholds: FairnessThresholds::default(),
        })
    }

    /// Replace the compliance thresholds used for new registrations.
    pub fn with_thresholds(mut self, thresholds: FairnessThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Register an evaluated model version.
    ///
    /// Builds a record embedding the compliance verdict, appends it,
    /// persists the registry, then appends a `MODEL_REGISTRATION` audit
    /// entry and persists the audit log. Both writes complete before
    /// this returns. On a persistence failure the in-memory appends are
    /// rolled back so registry and audit log never diverge; the caller
    /// may retry the whole registration.
    pub fn register(
        &mut self,
        model_name: &str,
        dataset: &str,
        performance: &PerformanceMetrics,
        fairness: &FairnessMetrics,
        model_hash: &str,
    ) -> Result<String> {
        self.version_counter += 1;
        let version_id = format!("v{}_{}", self.version_counter, Utc::now().timestamp());

        let record = RegistryRecord {
            version_id: version_id.clone(),
            model_name: model_name.to_string(),
            dataset: dataset.to_string(),
            registration_timestamp: Utc::now(),
            performance_metrics: *performance,
            fairness_metrics: *fairness,
            compliance_status: compliance::evaluate(fairness, &self.thresholds),
            model_hash: model_hash.to_string(),
        };

        let details = serde_json::to_value(&record)
            .map_err(|e| Error::Serialization(e.to_string()))?;

        self.records.push(record);
        if let Err(e) = self.persist_registry() {
            self.records.pop();
            self.version_counter -= 1;
            return Err(e);
        }

        let entry = self.build_audit_entry("MODEL_REGISTRATION", &version_id, details);
        self.audit_log.push(entry);
        if let Err(e) = self.persist_audit_log() {
            // Undo the audit append and take the already-persisted
            // record back out, so the two documents stay consistent.
            self.audit_log.pop();
            self.records.pop();
            self.version_counter -= 1;
            if let Err(undo) = self.persist_registry() {
                // The on-disk registry still holds the record we just
                // rolled back in memory, and it has no matching audit
                // entry. Surface both failures so the operator knows
                // the registry file needs repair.
                tracing::error!(
                    version_id = %version_id,
                    error = %undo,
                    "registry rollback persist failed; on-disk registry holds an unaudited record"
                );
                return Err(Error::Persistence(format!(
                    "audit log persist failed ({e}) and registry rollback persist failed \
                     ({undo}); on-disk registry holds unaudited record {version_id}"
                )));
            }
            return Err(e);
        }

        tracing::info!(version_id = %version_id, model = model_name, dataset, "model registered");
        Ok(version_id)
    }

    /// All records for a model, newest registration first.
    pub fn get_model_history(&self, model_name: &str) -> Vec<RegistryRecord> {
        // Walk in reverse append order so the stable sort keeps the
        // later registration first when timestamps tie.
        let mut history: Vec<RegistryRecord> = self
            .records
            .iter()
            .rev()
            .filter(|r| r.model_name == model_name)
            .cloned()
            .collect();
        history.sort_by(|a, b| b.registration_timestamp.cmp(&a.registration_timestamp));
        history
    }

    /// Look up a single record by version id.
    pub fn get_record(&self, version_id: &str) -> Result<&RegistryRecord> {
        self.records
            .iter()
            .find(|r| r.version_id == version_id)
            .ok_or_else(|| Error::NotFound(format!("version {version_id}")))
    }

    /// Registry-wide compliance roll-up.
    pub fn get_compliance_report(&self) -> ComplianceReport {
        let total = self.records.len();
        let compliant = self
            .records
            .iter()
            .filter(|r| r.compliance_status.compliant)
            .count();

        let mut violation_summary: BTreeMap<String, usize> = BTreeMap::new();
        for record in &self.records {
            for violation in &record.compliance_status.violations {
                *violation_summary
                    .entry(violation.as_str().to_string())
                    .or_insert(0) += 1;
            }
        }

        ComplianceReport {
            total_models_registered: total,
            compliant_models: compliant,
            non_compliant_models: total - compliant,
            compliance_rate: if total > 0 {
                compliant as f64 / total as f64
            } else {
                0.0
            },
            violation_summary,
            report_generated_at: Utc::now(),
        }
    }

    /// Snapshot of all records, in registration order.
    pub fn export_registry(&self) -> Vec<RegistryRecord> {
        self.records.clone()
    }

    /// The complete audit log, in append order.
    pub fn audit_log(&self) -> &[AuditEntry] {
        &self.audit_log
    }

    /// Number of registered records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Re-hash every entry's details and report the ids whose stored
    /// checksum no longer matches.
    pub fn verify_audit_log(&self) -> Vec<String> {
        self.audit_log
            .iter()
            .filter(|e| checksum(&e.details) != e.checksum)
            .map(|e| e.audit_id.clone())
            .collect()
    }

    fn build_audit_entry(
        &self,
        event_type: &str,
        entity_id: &str,
        details: serde_json::Value,
    ) -> AuditEntry {
        AuditEntry {
            audit_id: format!(
                "AUD_{}_{}",
                self.audit_log.len() + 1,
                Utc::now().timestamp()
            ),
            timestamp: Utc::now(),
            event_type: event_type.to_string(),
            entity_id: entity_id.to_string(),
            checksum: checksum(&details),
            details,
        }
    }

    fn persist_registry(&self) -> Result<()> {
        persist_document(&self.registry_path, &self.records)
    }

    fn persist_audit_log(&self) -> Result<()> {
        persist_document(&self.audit_log_path, &self.audit_log)
    }
}

/// SHA-256 hex digest of the canonical JSON form of a value.
///
/// `serde_json::Value` objects keep their keys sorted, so serializing
/// the value yields a canonical byte string for hashing.
pub fn checksum(details: &serde_json::Value) -> String {
    let canonical = details.to_string();
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}

fn load_document<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| Error::Serialization(e.to_string()))
}

/// Atomic whole-document write: serialize to a sibling temp file, then
/// rename over the target.
fn persist_document<T: Serialize>(path: &Path, document: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(document)
        .map_err(|e| Error::Serialization(e.to_string()))?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)
        .map_err(|e| Error::Persistence(format!("write {}: {e}", tmp.display())))?;
    fs::rename(&tmp, path)
        .map_err(|e| Error::Persistence(format!("rename to {}: {e}", path.display())))?;
    Ok(())
}

/// Count per violation kind, convenience over a compliance report.
pub fn violation_count(report: &ComplianceReport, violation: Violation) -> usize {
    report
        .violation_summary
        .get(violation.as_str())
        .copied()
        .unwrap_or(0)
}
