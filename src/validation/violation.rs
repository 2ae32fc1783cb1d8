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

//! Rule violations.

use super::errors::FieldError;
use super::interfaces::Severity;
use crate::api::{ManifestPath, ResourcePosition, ResourceRecord};
use serde::Serialize;
use std::fmt;

/// RuleViolation describes one rule failure on one resource.
///
/// Violations are immutable once built; use [`RuleViolation::builder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleViolation {
    rule_name: String,
    resource_name: String,
    manifest_path: ManifestPath,
    violating_field_paths: Vec<String>,
    message: String,
    recommendation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fix: Option<String>,
    severity: Severity,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    details: Vec<FieldError>,
    #[serde(skip)]
    position: ResourcePosition,
}

impl RuleViolation {
    /// Start building a violation of `rule_name` on `resource`.
    pub fn builder(
        rule_name: &str,
        resource: &ResourceRecord,
        recommendation: impl Into<String>,
    ) -> RuleViolationBuilder {
        RuleViolationBuilder {
            rule_name: rule_name.to_string(),
            resource_name: resource.display_name(),
            manifest_path: resource.manifest().clone(),
            position: resource.position(),
            recommendation: recommendation.into(),
            message_prefix: String::new(),
            fields: Vec::new(),
            fix: None,
            severity: Severity::default(),
        }
    }

    pub fn rule_name(&self) -> &str {
        &self.rule_name
    }

    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    pub fn manifest_path(&self) -> &ManifestPath {
        &self.manifest_path
    }

    pub fn violating_field_paths(&self) -> &[String] {
        &self.violating_field_paths
    }

    /// Human-readable message: the configured prefix followed by the recommendation.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn recommendation(&self) -> &str {
        &self.recommendation
    }

    /// Optional pointer to documentation describing the fix.
    pub fn fix(&self) -> Option<&str> {
        self.fix.as_deref()
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn details(&self) -> &[FieldError] {
        &self.details
    }

    pub fn position(&self) -> ResourcePosition {
        self.position
    }
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} ({})",
            self.rule_name, self.resource_name, self.message, self.manifest_path
        )?;
        for detail in &self.details {
            write!(f, "; {}", detail)?;
        }
        Ok(())
    }
}

/// Builder for [`RuleViolation`].
#[derive(Debug, Clone)]
pub struct RuleViolationBuilder {
    rule_name: String,
    resource_name: String,
    manifest_path: ManifestPath,
    position: ResourcePosition,
    recommendation: String,
    message_prefix: String,
    fields: Vec<FieldError>,
    fix: Option<String>,
    severity: Severity,
}

impl RuleViolationBuilder {
    /// Record a violating field.
    pub fn field(mut self, error: FieldError) -> Self {
        self.fields.push(error);
        self
    }

    pub fn message_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.message_prefix = prefix.into();
        self
    }

    pub fn fix(mut self, fix: impl Into<String>) -> Self {
        self.fix = Some(fix.into());
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn build(self) -> RuleViolation {
        RuleViolation {
            message: format!("{}{}", self.message_prefix, self.recommendation),
            violating_field_paths: self.fields.iter().map(|f| f.field.clone()).collect(),
            rule_name: self.rule_name,
            resource_name: self.resource_name,
            manifest_path: self.manifest_path,
            recommendation: self.recommendation,
            fix: self.fix,
            severity: self.severity,
            details: self.fields,
            position: self.position,
        }
    }
}
