//! Configuration
//!
//! Paths to the persisted stores plus the fairness thresholds. Defaults
//! match the conventional on-disk layout; individual fields can be
//! overridden from a JSON document or environment variables.

use crate::alert::{AlertChannel, AlertMonitor};
use crate::compliance::FairnessThresholds;
use crate::error::{Error, Result};
use crate::governance::GovernanceRegistry;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the registry document path.
pub const ENV_REGISTRY_PATH: &str = "EQUIDAD_REGISTRY_PATH";
/// Environment variable overriding the audit log document path.
pub const ENV_AUDIT_LOG_PATH: &str = "EQUIDAD_AUDIT_LOG_PATH";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquidadConfig {
    pub registry_path: PathBuf,
    pub audit_log_path: PathBuf,
    pub thresholds: FairnessThresholds,
    /// Whether alerting also checks equalized odds. Off by default to
    /// match the compliance/alerting asymmetry of the original system.
    pub check_equalized_odds: bool,
}

impl Default for EquidadConfig {
    fn default() -> Self {
        let data_dir = PathBuf::from("data").join("processed");
        Self {
            registry_path: data_dir.join("model_registry.json"),
            audit_log_path: data_dir.join("audit_log.json"),
            thresholds: FairnessThresholds::default(),
            check_equalized_odds: false,
        }
    }
}

impl EquidadConfig {
    /// Defaults with store paths overridden from the environment, when
    /// the corresponding variables are set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(path) = std::env::var(ENV_REGISTRY_PATH) {
            config.registry_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var(ENV_AUDIT_LOG_PATH) {
            config.audit_log_path = PathBuf::from(path);
        }
        config
    }

    /// Load from a JSON document; absent fields fall back to defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        serde_json::from_str(&content).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Open the governance registry at the configured paths with the
    /// configured thresholds.
    pub fn open_registry(&self) -> Result<GovernanceRegistry> {
        Ok(
            GovernanceRegistry::open(&self.registry_path, &self.audit_log_path)?
                .with_thresholds(self.thresholds),
        )
    }

    /// Build an alert monitor matching this configuration.
    pub fn alert_monitor(&self, channel: Box<dyn AlertChannel>) -> AlertMonitor {
        AlertMonitor::new(channel)
            .with_thresholds(self.thresholds)
            .with_equalized_odds_check(self.check_equalized_odds)
    }
}
