// Copyright 2024 The Kubernetes Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! End-to-end runs over synthesized chart fixtures.

use k8s_manifest_validation::validation::{FailOnSeverity, MemoryLogger};
use k8s_manifest_validation::{
    Configuration, ManifestValidation, Severity, Validation, ValidationContext, ValidationStatus,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const PLUGIN: &str = "restart-policy-validation";

/// Copy a fixture app into a scratch directory and return its manifest path.
/// Tests never operate on the source tree.
fn fixture(dir: &Path, app: &str) -> PathBuf {
    let source = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(app)
        .join("chart.k8s.yaml");
    let target = dir.join(format!("{}.k8s.yaml", app));
    std::fs::copy(&source, &target).unwrap();
    target
}

#[test]
fn test_invalid_app_reports_failure() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = fixture(dir.path(), "invalid-app");

    let validation = ManifestValidation::new(Configuration::default()).unwrap();
    let mut context = ValidationContext::new([manifest], PLUGIN, "0.0.0");
    validation.validate(&mut context).unwrap();

    let report = context.report();
    assert_eq!(report.status(), Some(ValidationStatus::Failure));
    let names: Vec<_> = report.violations().iter().map(|v| v.resource_name()).collect();
    assert_eq!(
        names,
        vec!["chart-deployment1-c8e9ae2b", "chart-deployment2-c8a4e3e7"]
    );
}

#[test]
fn test_valid_app_reports_success() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = fixture(dir.path(), "valid-app");

    let logger = Arc::new(MemoryLogger::new());
    let validation = ManifestValidation::new(Configuration::default()).unwrap();
    let mut context =
        ValidationContext::new([manifest.clone()], PLUGIN, "0.0.0").with_logger(logger.clone());
    validation.validate(&mut context).unwrap();

    assert_eq!(context.report().status(), Some(ValidationStatus::Success));
    assert!(context.report().violations().is_empty());
    assert_eq!(
        logger.lines(),
        vec![format!("validating manifest: {}", manifest.display())]
    );
}

#[test]
fn test_message_prefix_is_added_to_violations() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = fixture(dir.path(), "invalid-app");

    let config = Configuration::from_yaml_str("messagePrefix: custom-prefix\n").unwrap();
    let validation = ManifestValidation::new(config).unwrap();
    let mut context = ValidationContext::new([manifest], PLUGIN, "0.0.0");
    validation.validate(&mut context).unwrap();

    let report = context.into_report().to_json().unwrap();
    let violations = report["violations"].as_array().unwrap();
    assert!(!violations.is_empty());
    for violation in violations {
        assert!(violation["message"]
            .as_str()
            .unwrap()
            .starts_with("custom-prefix"));
    }
}

#[test]
fn test_one_violating_manifest_out_of_two() {
    let dir = tempfile::tempdir().unwrap();
    let valid = fixture(dir.path(), "valid-app");
    let violating = dir.path().join("single.k8s.yaml");
    std::fs::write(
        &violating,
        "apiVersion: apps/v1\nkind: Deployment\nmetadata:\n  name: offender\n\
         spec:\n  template:\n    spec:\n      restartPolicy: OnFailure\n",
    )
    .unwrap();

    let validation = ManifestValidation::new(Configuration::default()).unwrap();
    let mut context = ValidationContext::new([valid, violating.clone()], PLUGIN, "0.0.0");
    validation.validate(&mut context).unwrap();

    let report = context.report();
    assert_eq!(report.status(), Some(ValidationStatus::Failure));
    assert_eq!(report.violations().len(), 1);
    let violation = &report.violations()[0];
    assert_eq!(violation.resource_name(), "offender");
    assert_eq!(
        violation.manifest_path().as_str(),
        violating.display().to_string()
    );
    assert_eq!(
        violation.violating_field_paths(),
        ["spec.template.spec.restartPolicy".to_string()]
    );
}

#[test]
fn test_ignored_kind_passes() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = fixture(dir.path(), "invalid-app");

    let config = Configuration::from_yaml_str("ignoreKinds: [Deployment]\n").unwrap();
    let validation = ManifestValidation::new(config).unwrap();
    let mut context = ValidationContext::new([manifest], PLUGIN, "0.0.0");
    validation.validate(&mut context).unwrap();

    assert_eq!(context.report().status(), Some(ValidationStatus::Success));
    assert!(context.report().violations().is_empty());
}

#[test]
fn test_warning_rules_do_not_fail_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = fixture(dir.path(), "invalid-app");

    let config = Configuration::from_yaml_str(
        "rules:\n  RestartPolicyAlways:\n    severity: warning\n",
    )
    .unwrap();
    let validation = ManifestValidation::new(config)
        .unwrap()
        .with_status_policy(FailOnSeverity(Severity::Error));
    let mut context = ValidationContext::new([manifest], PLUGIN, "0.0.0");
    validation.validate(&mut context).unwrap();

    let report = context.report();
    assert_eq!(report.status(), Some(ValidationStatus::Success));
    assert_eq!(report.violations().len(), 2);
    assert!(report
        .violations()
        .iter()
        .all(|v| v.severity() == Severity::Warning));
}

#[test]
fn test_parallel_run_matches_sequential() {
    let dir = tempfile::tempdir().unwrap();
    let manifests = vec![
        fixture(dir.path(), "invalid-app"),
        fixture(dir.path(), "valid-app"),
    ];

    let sequential = ManifestValidation::new(Configuration::default()).unwrap();
    let mut first = ValidationContext::new(manifests.clone(), PLUGIN, "0.0.0");
    sequential.validate(&mut first).unwrap();

    let parallel = ManifestValidation::new(Configuration::default().with_parallelism(0)).unwrap();
    let mut second = ValidationContext::new(manifests, PLUGIN, "0.0.0");
    parallel.validate(&mut second).unwrap();

    assert_eq!(first.report(), second.report());
}

#[test]
fn test_invalid_rule_options_are_rejected() {
    let config =
        Configuration::from_yaml_str("rules:\n  RestartPolicyAlways:\n    kinds: 12\n").unwrap();
    assert!(ManifestValidation::new(config).is_err());
}
