//! Integration tests for the governance registry lifecycle

use equidad::eval::PerformanceMetrics;
use equidad::fairness::FairnessMetrics;
use equidad::governance::{checksum, GovernanceRegistry};
use std::sync::{Arc, Mutex};
use std::thread;

fn fair_metrics() -> FairnessMetrics {
    FairnessMetrics {
        demographic_parity_diff: 0.05,
        equal_opportunity_diff: 0.02,
        equalized_odds_diff: 0.03,
        disparate_impact_ratio: 0.95,
        statistical_parity_diff: 0.05,
    }
}

#[test]
fn test_full_registry_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let registry_path = dir.path().join("model_registry.json");
    let audit_path = dir.path().join("audit_log.json");

    // First session: register three model versions.
    {
        let mut registry = GovernanceRegistry::open(&registry_path, &audit_path).unwrap();
        for (model, dataset) in [("logreg", "adult"), ("rf", "adult"), ("logreg", "compas")] {
            registry
                .register(
                    model,
                    dataset,
                    &PerformanceMetrics::default(),
                    &fair_metrics(),
                    "hash",
                )
                .unwrap();
        }
        assert_eq!(registry.len(), 3);
    }

    // Second session: state survived, counter continues.
    let mut registry = GovernanceRegistry::open(&registry_path, &audit_path).unwrap();
    assert_eq!(registry.len(), 3);
    assert_eq!(registry.audit_log().len(), 3);
    assert!(registry.verify_audit_log().is_empty());

    let id = registry
        .register(
            "gb",
            "adult",
            &PerformanceMetrics::default(),
            &fair_metrics(),
            "hash",
        )
        .unwrap();
    assert!(id.starts_with("v4_"));

    let history = registry.get_model_history("logreg");
    assert_eq!(history.len(), 2);

    let report = registry.get_compliance_report();
    assert_eq!(report.total_models_registered, 4);
    assert_eq!(report.compliant_models, 4);
}

#[test]
fn test_audit_entries_are_append_only_and_checksummed() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = GovernanceRegistry::open(
        dir.path().join("registry.json"),
        dir.path().join("audit.json"),
    )
    .unwrap();

    let mut stored_checksums = Vec::new();
    for i in 0..4 {
        registry
            .register(
                &format!("m{i}"),
                "adult",
                &PerformanceMetrics::default(),
                &fair_metrics(),
                "h",
            )
            .unwrap();
        // One audit entry per mutating call, earlier checksums untouched.
        assert_eq!(registry.audit_log().len(), i + 1);
        for (j, prior) in stored_checksums.iter().enumerate() {
            assert_eq!(&registry.audit_log()[j].checksum, prior);
        }
        stored_checksums.push(registry.audit_log()[i].checksum.clone());
    }

    for entry in registry.audit_log() {
        assert_eq!(checksum(&entry.details), entry.checksum);
    }
}

#[test]
fn test_concurrent_registrations_yield_unique_version_ids() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Arc::new(Mutex::new(
        GovernanceRegistry::open(
            dir.path().join("registry.json"),
            dir.path().join("audit.json"),
        )
        .unwrap(),
    ));

    let mut handles = Vec::new();
    for i in 0..8 {
        let registry = Arc::clone(&registry);
        handles.push(thread::spawn(move || {
            let mut guard = registry.lock().unwrap();
            guard
                .register(
                    &format!("model{i}"),
                    "adult",
                    &PerformanceMetrics::default(),
                    &fair_metrics(),
                    "h",
                )
                .unwrap()
        }));
    }

    let mut ids: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 8);

    let guard = registry.lock().unwrap();
    assert_eq!(guard.len(), 8);
    assert_eq!(guard.audit_log().len(), 8);
}
