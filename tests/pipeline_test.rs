//! End-to-end evaluation pipeline scenarios

use equidad::alert::{AlertMonitor, AlertSeverity, NullChannel};
use equidad::compliance::{self, FairnessThresholds, Violation};
use equidad::eval::PerformanceMetrics;
use equidad::fairness::FairnessMetrics;
use equidad::governance::GovernanceRegistry;
use equidad::semantic::{
    compute_bias_delta_score, compute_fairness_stability_index, StabilityCategory,
};
use equidad::RegistrySnapshot;
use std::collections::BTreeMap;

#[test]
fn test_parity_violation_end_to_end() {
    // The canonical scenario: only demographic parity out of bounds.
    let metrics = FairnessMetrics {
        demographic_parity_diff: 0.15,
        equal_opportunity_diff: 0.02,
        equalized_odds_diff: 0.03,
        disparate_impact_ratio: 0.95,
        statistical_parity_diff: 0.15,
    };

    let status = compliance::evaluate(&metrics, &FairnessThresholds::default());
    assert!(!status.compliant);
    assert_eq!(status.violations, vec![Violation::DemographicParity]);

    let dir = tempfile::tempdir().unwrap();
    let mut registry = GovernanceRegistry::open(
        dir.path().join("registry.json"),
        dir.path().join("audit.json"),
    )
    .unwrap();
    let version_id = registry
        .register(
            "logreg",
            "adult",
            &PerformanceMetrics::default(),
            &metrics,
            "hash",
        )
        .unwrap();

    let record = registry.get_record(&version_id).unwrap();
    assert_eq!(
        record.compliance_status.violations,
        vec![Violation::DemographicParity]
    );

    // Exactly one HIGH alert; 0.95 is inside the disparate impact band.
    let mut monitor = AlertMonitor::new(Box::new(NullChannel));
    let alerts = monitor.check("logreg", "adult", &metrics, &version_id);
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].severity, AlertSeverity::High);
    assert_eq!(alerts[0].alert_type, Violation::DemographicParity);
}

#[test]
fn test_identical_models_are_maximally_stable() {
    let metrics = FairnessMetrics {
        demographic_parity_diff: 0.08,
        equal_opportunity_diff: 0.05,
        equalized_odds_diff: 0.04,
        disparate_impact_ratio: 0.9,
        statistical_parity_diff: 0.08,
    };

    let mut by_model = BTreeMap::new();
    for name in ["logreg", "rf", "gb"] {
        by_model.insert(name.to_string(), metrics);
    }

    let stability = compute_fairness_stability_index(&by_model).unwrap();
    assert!(stability.fairness_stability_index > 0.99);
    assert_eq!(stability.stability_category, StabilityCategory::High);

    let bias = compute_bias_delta_score(&by_model).unwrap();
    assert!((bias.max_bias_delta - bias.min_bias_delta).abs() < 1e-12);
    assert!(bias.std_bias_delta < 1e-12);
    assert_eq!(bias.per_model_scores.len(), 3);
}

#[test]
fn test_registry_snapshot_reflects_registrations() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = GovernanceRegistry::open(
        dir.path().join("registry.json"),
        dir.path().join("audit.json"),
    )
    .unwrap();

    let fair = FairnessMetrics {
        demographic_parity_diff: 0.05,
        equal_opportunity_diff: 0.02,
        equalized_odds_diff: 0.03,
        disparate_impact_ratio: 1.0,
        statistical_parity_diff: 0.05,
    };
    let biased = FairnessMetrics {
        demographic_parity_diff: 0.4,
        equal_opportunity_diff: 0.3,
        equalized_odds_diff: 0.3,
        disparate_impact_ratio: 0.4,
        statistical_parity_diff: 0.4,
    };

    registry
        .register("logreg", "adult", &PerformanceMetrics::default(), &fair, "h1")
        .unwrap();
    registry
        .register("rf", "adult", &PerformanceMetrics::default(), &biased, "h2")
        .unwrap();

    let snapshot = RegistrySnapshot::from_records(&registry.export_registry());
    assert_eq!(snapshot.rows.len(), 2);
    assert!(snapshot.rows[0].compliant);
    assert!(!snapshot.rows[1].compliant);

    let csv = snapshot.to_csv();
    assert_eq!(csv.lines().count(), 3);
}
