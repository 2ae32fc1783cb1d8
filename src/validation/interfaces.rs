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

//! Core validation interfaces.

use super::config::Configuration;
use super::context::ValidationContext;
use super::errors::ValidationResult;
use super::violation::RuleViolation;
use crate::api::ResourceRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// ValidationStatus is the terminal outcome of a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Success,
    Failure,
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationStatus::Success => write!(f, "success"),
            ValidationStatus::Failure => write!(f, "failure"),
        }
    }
}

/// Severity of a violation. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    #[serde(alias = "warn")]
    Warning,
    Error,
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Rule is a named, pluggable check over a single resource.
pub trait Rule: Send + Sync {
    /// Name the rule is registered and reported under.
    fn name(&self) -> &str;

    /// Returns true if the rule applies to resources of this kind.
    fn handles(&self, kind: &str) -> bool;

    /// Check one resource. Must not panic on missing or oddly typed fields.
    fn check(&self, resource: &ResourceRecord, config: &Configuration) -> Vec<RuleViolation>;
}

/// Evaluate `rule` against `resource`, honoring `ignoreKinds` and the rule's
/// kind filter before the rule body runs.
pub fn evaluate(
    rule: &dyn Rule,
    resource: &ResourceRecord,
    config: &Configuration,
) -> Vec<RuleViolation> {
    let Some(kind) = resource.kind() else {
        return Vec::new();
    };
    if config.is_ignored(kind) || !rule.handles(kind) {
        return Vec::new();
    }
    rule.check(resource, config)
}

/// Validation is the entry point a host framework calls once per run.
pub trait Validation: Send + Sync {
    /// Validate every manifest in the context and submit the report exactly once.
    fn validate(&self, context: &mut ValidationContext) -> ValidationResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(ValidationStatus::Success.to_string(), "success");
        assert_eq!(ValidationStatus::Failure.to_string(), "failure");
    }

    #[test]
    fn test_severity_decoding() {
        let decode = |s: &str| serde_yaml::from_str::<Severity>(s).ok();
        assert_eq!(decode("error"), Some(Severity::Error));
        assert_eq!(decode("warning"), Some(Severity::Warning));
        assert_eq!(decode("warn"), Some(Severity::Warning));
        assert_eq!(decode("info"), Some(Severity::Info));
        assert_eq!(decode("fatal"), None);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert_eq!(Severity::default(), Severity::Error);
    }

    struct AnyKind;

    impl Rule for AnyKind {
        fn name(&self) -> &str {
            "AnyKind"
        }

        fn handles(&self, _kind: &str) -> bool {
            true
        }

        fn check(&self, resource: &ResourceRecord, _config: &Configuration) -> Vec<RuleViolation> {
            vec![RuleViolation::builder(self.name(), resource, "always fires").build()]
        }
    }

    #[test]
    fn test_evaluate_honors_ignore_kinds() {
        let rule = AnyKind;
        let resource = ResourceRecord::from_yaml("m.yaml", "kind: ConfigMap").unwrap();

        let config = Configuration::default();
        assert_eq!(evaluate(&rule, &resource, &config).len(), 1);

        let config = Configuration::default().with_ignore_kinds(["ConfigMap"]);
        assert!(evaluate(&rule, &resource, &config).is_empty());
    }

    #[test]
    fn test_evaluate_skips_kindless_resources() {
        let resource = ResourceRecord::from_yaml("m.yaml", "metadata: {name: x}").unwrap();
        assert!(evaluate(&AnyKind, &resource, &Configuration::default()).is_empty());
    }
}
