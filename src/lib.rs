//! # Equidad: Fairness Evaluation & Model Governance
//!
//! Equidad evaluates trained binary classifiers for algorithmic fairness,
//! aggregates the measurements into cross-model bias indicators, enforces
//! compliance thresholds, keeps an append-only versioned model registry
//! with a checksummed audit log, and raises severity-tagged alerts.
//!
//! ## Architecture
//!
//! - **fairness**: group-fairness metrics from (truth, prediction, group) triples
//! - **eval**: classifier performance metrics (accuracy, precision, recall, F1, ROC AUC)
//! - **semantic**: cross-model Bias Delta Score and Fairness Stability Index
//! - **compliance**: threshold checks producing a structured verdict
//! - **governance**: versioned model registry and immutable audit log
//! - **alert**: severity-tagged alerts with best-effort external delivery
//! - **export**: flat registry snapshots for external consumers
//! - **config**: store paths and thresholds
//!
//! ## Example
//!
//! ```no_run
//! use equidad::alert::{AlertMonitor, NullChannel};
//! use equidad::eval::compute_performance_metrics;
//! use equidad::fairness::compute_all_metrics;
//! use equidad::governance::GovernanceRegistry;
//!
//! # fn main() -> equidad::Result<()> {
//! let y_true = [true, false, true, false];
//! let y_pred = [true, true, false, false];
//! let y_score = [0.9, 0.6, 0.4, 0.1];
//! let group = [true, true, false, false];
//!
//! let fairness = compute_all_metrics(&y_true, &y_pred, &group)?;
//! let performance = compute_performance_metrics(&y_true, &y_pred, &y_score)?;
//!
//! let mut registry =
//!     GovernanceRegistry::open("model_registry.json", "audit_log.json")?;
//! let version_id = registry.register("logreg", "adult", &performance, &fairness, "sha")?;
//!
//! let mut monitor = AlertMonitor::new(Box::new(NullChannel));
//! let alerts = monitor.check("logreg", "adult", &fairness, &version_id);
//! println!("{} alerts", alerts.len());
//! # Ok(())
//! # }
//! ```

pub mod alert;
pub mod compliance;
pub mod config;
pub mod error;
pub mod eval;
pub mod export;
pub mod fairness;
pub mod governance;
pub mod semantic;

// Re-export commonly used types
pub use alert::{Alert, AlertChannel, AlertMonitor, AlertSeverity, DeliveryError, NullChannel};
pub use compliance::{ComplianceStatus, FairnessThresholds, Violation};
pub use config::EquidadConfig;
pub use error::{Error, Result};
pub use eval::{compute_performance_metrics, PerformanceMetrics};
pub use export::RegistrySnapshot;
pub use fairness::{compute_all_metrics, FairnessMetrics};
pub use governance::{AuditEntry, ComplianceReport, GovernanceRegistry, RegistryRecord};
pub use semantic::{
    compute_bias_delta_score, compute_fairness_stability_index, compute_prediction_drift_score,
    BiasDeltaSummary, PredictionDrift, StabilityCategory, StabilityIndex,
};
