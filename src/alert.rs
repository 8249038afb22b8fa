//! Fairness Alerting
//!
//! Re-applies a subset of the compliance threshold checks to emit
//! severity-tagged alerts and hand them to an external delivery channel.
//! Delivery is fire-and-forget: each alert is sent independently,
//! at-most-once, and a failed delivery is logged without affecting the
//! other alerts or the caller.
//!
//! By default the checks mirror the observed production behavior:
//! demographic parity, equal opportunity, and disparate impact — but
//! NOT equalized odds, even though the compliance evaluator checks it.
//! That asymmetry is preserved deliberately; enable
//! `check_equalized_odds` to make alerting match compliance.

use crate::compliance::{FairnessThresholds, Violation};
use crate::fairness::FairnessMetrics;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Alert severity, ordered from least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Low => "LOW",
            AlertSeverity::Medium => "MEDIUM",
            AlertSeverity::High => "HIGH",
            AlertSeverity::Critical => "CRITICAL",
        }
    }
}

/// A triggered fairness alert. Appended to the monitor's store and
/// forwarded to the delivery channel; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub timestamp: DateTime<Utc>,
    pub severity: AlertSeverity,
    pub alert_type: Violation,
    pub model: String,
    pub dataset: String,
    pub version_id: String,
    pub metric_value: f64,
    /// Display form of the breached threshold; a range for the
    /// disparate impact check ("0.8-1.25").
    pub threshold: String,
    pub message: String,
}

/// Delivery failures. Logged by the dispatcher, never propagated.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("channel unavailable: {0}")]
    Unavailable(String),

    #[error("delivery timed out")]
    Timeout,

    #[error("channel rejected alert: {0}")]
    Rejected(String),
}

/// External notification channel. The transport (webhook, chat, queue)
/// is the implementor's concern; a timeout is an ordinary failure.
pub trait AlertChannel: Send + Sync {
    fn deliver(&self, alert: &Alert) -> Result<(), DeliveryError>;
}

/// Channel that drops every alert. For tests and offline runs.
#[derive(Debug, Default)]
pub struct NullChannel;

impl AlertChannel for NullChannel {
    fn deliver(&self, _alert: &Alert) -> Result<(), DeliveryError> {
        Ok(())
    }
}

/// Evaluates metrics against thresholds, stores triggered alerts, and
/// dispatches them best-effort.
pub struct AlertMonitor {
    thresholds: FairnessThresholds,
    check_equalized_odds: bool,
    alerts: Vec<Alert>,
    channel: Box<dyn AlertChannel>,
}

impl AlertMonitor {
    /// Create a monitor with default thresholds.
    pub fn new(channel: Box<dyn AlertChannel>) -> Self {
        Self {
            thresholds: FairnessThresholds::default(),
            check_equalized_odds: false,
            alerts: Vec::new(),
            channel,
        }
    }

    pub fn with_thresholds(mut self, thresholds: FairnessThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Also alert on equalized odds, matching the compliance evaluator.
    pub fn with_equalized_odds_check(mut self, enabled: bool) -> Self {
        self.check_equalized_odds = enabled;
        self
    }

    /// Check a metric set and dispatch any triggered alerts.
    ///
    /// Checks run in fixed order: demographic parity (HIGH), equal
    /// opportunity (HIGH), equalized odds (HIGH, only when enabled),
    /// disparate impact (CRITICAL). Returns the alerts triggered by
    /// this call; delivery failures are logged and swallowed.
    pub fn check(
        &mut self,
        model: &str,
        dataset: &str,
        metrics: &FairnessMetrics,
        version_id: &str,
    ) -> Vec<Alert> {
        let mut triggered = Vec::new();

        if metrics.demographic_parity_diff.abs() > self.thresholds.demographic_parity_diff {
            triggered.push(self.build_alert(
                AlertSeverity::High,
                Violation::DemographicParity,
                model,
                dataset,
                version_id,
                metrics.demographic_parity_diff,
                format!("{}", self.thresholds.demographic_parity_diff),
                format!("Demographic parity violation detected for {model} on {dataset}"),
            ));
        }

        if metrics.equal_opportunity_diff.abs() > self.thresholds.equal_opportunity_diff {
            triggered.push(self.build_alert(
                AlertSeverity::High,
                Violation::EqualOpportunity,
                model,
                dataset,
                version_id,
                metrics.equal_opportunity_diff,
                format!("{}", self.thresholds.equal_opportunity_diff),
                format!("Equal opportunity violation detected for {model} on {dataset}"),
            ));
        }

        if self.check_equalized_odds
            && metrics.equalized_odds_diff.abs() > self.thresholds.equalized_odds_diff
        {
            triggered.push(self.build_alert(
                AlertSeverity::High,
                Violation::EqualizedOdds,
                model,
                dataset,
                version_id,
                metrics.equalized_odds_diff,
                format!("{}", self.thresholds.equalized_odds_diff),
                format!("Equalized odds violation detected for {model} on {dataset}"),
            ));
        }

        let dir = metrics.disparate_impact_ratio;
        if dir < self.thresholds.disparate_impact_ratio_min
            || dir > self.thresholds.disparate_impact_ratio_max
        {
            triggered.push(self.build_alert(
                AlertSeverity::Critical,
                Violation::DisparateImpact,
                model,
                dataset,
                version_id,
                dir,
                format!(
                    "{}-{}",
                    self.thresholds.disparate_impact_ratio_min,
                    self.thresholds.disparate_impact_ratio_max
                ),
                format!("Disparate impact violation detected for {model} on {dataset}"),
            ));
        }

        self.alerts.extend(triggered.iter().cloned());

        for alert in &triggered {
            if let Err(e) = self.channel.deliver(alert) {
                tracing::warn!(
                    alert_type = alert.alert_type.as_str(),
                    model = %alert.model,
                    error = %e,
                    "alert delivery failed"
                );
            }
        }

        triggered
    }

    /// Every alert this monitor has ever triggered, in order.
    pub fn all_alerts(&self) -> &[Alert] {
        &self.alerts
    }

    #[allow(clippy::too_many_arguments)]
    fn build_alert(
        &self,
        severity: AlertSeverity,
        alert_type: Violation,
        model: &str,
        dataset: &str,
        version_id: &str,
        metric_value: f64,
        threshold: String,
        message: String,
    ) -> Alert {
        Alert {
            timestamp: Utc::now(),
            severity,
            alert_type,
            model: model.to_string(),
            dataset: dataset.to_string(),
            version_id: version_id.to_string(),
            metric_value,
            threshold,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Test channel that records every delivered alert.
    #[derive(Clone, Default)]
    struct RecordingChannel {
        delivered: Arc<Mutex<Vec<Alert>>>,
    }

    impl AlertChannel for RecordingChannel {
        fn deliver(&self, alert: &Alert) -> Result<(), DeliveryError> {
            self.delivered.lock().unwrap().push(alert.clone());
            Ok(())
        }
    }

    /// Test channel that always fails.
    struct DownChannel;

    impl AlertChannel for DownChannel {
        fn deliver(&self, _alert: &Alert) -> Result<(), DeliveryError> {
            Err(DeliveryError::Unavailable("connection refused".to_string()))
        }
    }

    fn metrics(dpd: f64, eod: f64, eodd: f64, dir: f64) -> FairnessMetrics {
        FairnessMetrics {
            demographic_parity_diff: dpd,
            equal_opportunity_diff: eod,
            equalized_odds_diff: eodd,
            disparate_impact_ratio: dir,
            statistical_parity_diff: dpd,
        }
    }

    #[test]
    fn test_severity_ordering() {
        assert!(AlertSeverity::Low < AlertSeverity::Medium);
        assert!(AlertSeverity::Medium < AlertSeverity::High);
        assert!(AlertSeverity::High < AlertSeverity::Critical);
    }

    #[test]
    fn test_no_alerts_for_fair_model() {
        let mut monitor = AlertMonitor::new(Box::new(NullChannel));
        let triggered = monitor.check("logreg", "adult", &metrics(0.05, 0.02, 0.03, 1.0), "v1_0");
        assert!(triggered.is_empty());
        assert!(monitor.all_alerts().is_empty());
    }

    #[test]
    fn test_demographic_parity_alert_is_high() {
        let mut monitor = AlertMonitor::new(Box::new(NullChannel));
        let triggered = monitor.check("logreg", "adult", &metrics(0.15, 0.02, 0.03, 0.95), "v1_0");

        assert_eq!(triggered.len(), 1);
        let alert = &triggered[0];
        assert_eq!(alert.severity, AlertSeverity::High);
        assert_eq!(alert.alert_type, Violation::DemographicParity);
        assert_eq!(alert.threshold, "0.1");
        assert!((alert.metric_value - 0.15).abs() < 1e-12);
        assert!(alert.message.contains("logreg"));
        assert!(alert.message.contains("adult"));
    }

    #[test]
    fn test_disparate_impact_alert_is_critical() {
        let mut monitor = AlertMonitor::new(Box::new(NullChannel));
        let triggered = monitor.check("rf", "compas", &metrics(0.0, 0.0, 0.0, 0.5), "v2_0");

        assert_eq!(triggered.len(), 1);
        assert_eq!(triggered[0].severity, AlertSeverity::Critical);
        assert_eq!(triggered[0].alert_type, Violation::DisparateImpact);
        assert_eq!(triggered[0].threshold, "0.8-1.25");
    }

    #[test]
    fn test_equalized_odds_not_checked_by_default() {
        let mut monitor = AlertMonitor::new(Box::new(NullChannel));
        let triggered = monitor.check("rf", "adult", &metrics(0.0, 0.0, 0.4, 1.0), "v1_0");
        assert!(triggered.is_empty());
    }

    #[test]
    fn test_equalized_odds_check_opt_in() {
        let mut monitor =
            AlertMonitor::new(Box::new(NullChannel)).with_equalized_odds_check(true);
        let triggered = monitor.check("rf", "adult", &metrics(0.0, 0.0, 0.4, 1.0), "v1_0");

        assert_eq!(triggered.len(), 1);
        assert_eq!(triggered[0].alert_type, Violation::EqualizedOdds);
        assert_eq!(triggered[0].severity, AlertSeverity::High);
    }

    #[test]
    fn test_alert_order_fixed() {
        let mut monitor =
            AlertMonitor::new(Box::new(NullChannel)).with_equalized_odds_check(true);
        let triggered = monitor.check("rf", "adult", &metrics(0.2, 0.2, 0.2, 0.5), "v1_0");

        let kinds: Vec<Violation> = triggered.iter().map(|a| a.alert_type).collect();
        assert_eq!(
            kinds,
            vec![
                Violation::DemographicParity,
                Violation::EqualOpportunity,
                Violation::EqualizedOdds,
                Violation::DisparateImpact,
            ]
        );
    }

    #[test]
    fn test_alerts_delivered_to_channel() {
        let channel = RecordingChannel::default();
        let mut monitor = AlertMonitor::new(Box::new(channel.clone()));
        monitor.check("rf", "adult", &metrics(0.2, 0.2, 0.0, 1.0), "v1_0");

        let delivered = channel.delivered.lock().unwrap();
        assert_eq!(delivered.len(), 2);
        assert_eq!(delivered[0].alert_type, Violation::DemographicParity);
        assert_eq!(delivered[1].alert_type, Violation::EqualOpportunity);
    }

    #[test]
    fn test_delivery_failure_does_not_affect_caller() {
        let mut monitor = AlertMonitor::new(Box::new(DownChannel));
        let triggered = monitor.check("rf", "adult", &metrics(0.2, 0.0, 0.0, 0.5), "v1_0");

        // Both alerts are returned and recorded despite the dead channel.
        assert_eq!(triggered.len(), 2);
        assert_eq!(monitor.all_alerts().len(), 2);
    }

    #[test]
    fn test_store_accumulates_across_checks() {
        let mut monitor = AlertMonitor::new(Box::new(NullChannel));
        monitor.check("a", "adult", &metrics(0.2, 0.0, 0.0, 1.0), "v1_0");
        monitor.check("b", "adult", &metrics(0.0, 0.2, 0.0, 1.0), "v2_0");
        assert_eq!(monitor.all_alerts().len(), 2);
        assert_eq!(monitor.all_alerts()[0].model, "a");
        assert_eq!(monitor.all_alerts()[1].model, "b");
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = FairnessThresholds {
            demographic_parity_diff: 0.3,
            ..FairnessThresholds::default()
        };
        let mut monitor = AlertMonitor::new(Box::new(NullChannel)).with_thresholds(thresholds);

        let triggered = monitor.check("rf", "adult", &metrics(0.2, 0.0, 0.0, 1.0), "v1_0");
        assert!(triggered.is_empty());
    }

    #[test]
    fn test_alert_severity_serialized_screaming() {
        let json = serde_json::to_string(&AlertSeverity::Critical).unwrap();
        assert_eq!(json, "\"CRITICAL\"");
        assert_eq!(AlertSeverity::High.as_str(), "HIGH");
    }

    #[test]
    fn test_recording_channel_sees_payload() {
        // Exercise the channel seam directly.
        let channel = RecordingChannel::default();
        let alert = Alert {
            timestamp: Utc::now(),
            severity: AlertSeverity::High,
            alert_type: Violation::DemographicParity,
            model: "rf".to_string(),
            dataset: "adult".to_string(),
            version_id: "v1_0".to_string(),
            metric_value: 0.2,
            threshold: "0.1".to_string(),
            message: "test".to_string(),
        };
        channel.deliver(&alert).unwrap();
        assert_eq!(channel.delivered.lock().unwrap().len(), 1);
    }
}
