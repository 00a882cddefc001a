//! The log target is process-global, so the whole lifecycle runs in one test.

use std::fs;
use std::path::Path;

use boolean_spectral_core::logging;
use boolean_spectral_core::{
    AnalysisConfig, BooleanFunction, FeatureTable, FourierPolynomial, LinearityTester,
    SpectralStatistics,
};
use serde_json::{json, Value};

fn records(path: &Path) -> Vec<Value> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn expand_and() -> FourierPolynomial {
    FourierPolynomial::from_function(&BooleanFunction::from_bitcode(&[0, 0, 0, 1]).unwrap())
}

#[test]
fn operations_are_logged_only_while_a_target_is_set() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs").join("ops.jsonl");

    // Disabled by default: logging succeeds without touching the filesystem.
    assert!(!logging::is_enabled());
    logging::log_operation("noop", &json!({ "n": 1 })).unwrap();
    expand_and();
    assert!(!AnalysisConfig::default().init_logging().unwrap());
    assert!(!logging::is_enabled());
    assert!(!path.exists());

    let config = AnalysisConfig {
        log_path: Some(path.to_string_lossy().into_owned()),
        ..AnalysisConfig::default()
    };
    assert!(config.init_logging().unwrap());
    assert!(logging::is_enabled());

    let poly = expand_and();
    SpectralStatistics::new(&poly);
    FeatureTable::from_bitcodes(&[vec![0, 1, 1, 0], vec![0, 0, 0, 1]]).unwrap();
    LinearityTester::new(20, 1).report(&poly);

    let logged = records(&path);
    let operations: Vec<&str> = logged
        .iter()
        .map(|record| record["operation"].as_str().unwrap())
        .collect();
    for expected in [
        "fourier_expand",
        "spectral_statistics",
        "feature_table",
        "linearity_test",
    ] {
        assert!(operations.contains(&expected), "missing {expected} in {operations:?}");
    }
    // one expansion up front plus one per table row
    assert_eq!(operations.iter().filter(|op| **op == "fourier_expand").count(), 3);

    let expand = &logged[0];
    assert_eq!(expand["operation"], "fourier_expand");
    assert_eq!(expand["data"]["num_variables"], 2);
    assert_eq!(expand["data"]["nonzero_terms"], 4);
    assert!(expand["ts_ms"].as_u64().is_some());

    let table = logged
        .iter()
        .find(|record| record["operation"] == "feature_table")
        .unwrap();
    assert_eq!(table["data"]["rows"], 2);

    logging::disable();
    assert!(!logging::is_enabled());
    let before = records(&path).len();
    let poly = expand_and();
    LinearityTester::default().report(&poly);
    logging::log_operation("noop", &json!({})).unwrap();
    assert_eq!(records(&path).len(), before);
}
