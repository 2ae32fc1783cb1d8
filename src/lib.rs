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

//! Kubernetes manifest validation plugins in Rust
//!
//! This crate provides a pluggable engine for validating synthesized
//! Kubernetes manifests, together with a RestartPolicyAlways rule. A host
//! framework builds a [`ValidationContext`] listing the manifests of a run and
//! calls [`Validation::validate`]; the plugin logs through the context's
//! logger, records violations, and submits exactly one status to the report.
//!
//! ```no_run
//! use k8s_manifest_validation::{Configuration, ManifestValidation, Validation, ValidationContext};
//!
//! let config = Configuration::from_yaml_str("messagePrefix: '[policy] '")?;
//! let validation = ManifestValidation::new(config)?;
//! let mut context = ValidationContext::new(["dist/chart.k8s.yaml"], "restart-policy", "0.1.0");
//! validation.validate(&mut context)?;
//! println!("{:?}", context.report().status());
//! # Ok::<(), k8s_manifest_validation::ValidationError>(())
//! ```

pub mod api;
pub mod plugins;
pub mod validation;

// Re-export commonly used types
pub use api::{FieldLookup, FieldPath, ManifestPath, ResourceRecord};
pub use validation::{
    Configuration, ManifestValidation, ReportSink, Rule, RuleViolation, Severity, Validation,
    ValidationContext, ValidationError, ValidationReport, ValidationResult, ValidationStatus,
};
