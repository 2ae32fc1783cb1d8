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

//! Validation reports.

use super::errors::{ValidationError, ValidationResult};
use super::interfaces::ValidationStatus;
use super::violation::RuleViolation;
use serde::Serialize;

/// ReportSink is the boundary back to the host framework.
///
/// `add_violation` may be called any number of times, then `submit` exactly
/// once as the final act of a run. After either call returns an error the
/// violations a sink holds are unspecified; only the submitted status counts.
pub trait ReportSink: Send {
    fn add_violation(&mut self, violation: RuleViolation) -> ValidationResult<()>;

    fn submit(&mut self, status: ValidationStatus) -> ValidationResult<()>;
}

/// ValidationReport is the report a host reads after a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    plugin_name: String,
    plugin_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<ValidationStatus>,
    violations: Vec<RuleViolation>,
}

impl ValidationReport {
    pub fn new(plugin_name: impl Into<String>, plugin_version: impl Into<String>) -> Self {
        Self {
            plugin_name: plugin_name.into(),
            plugin_version: plugin_version.into(),
            status: None,
            violations: Vec::new(),
        }
    }

    pub fn plugin_name(&self) -> &str {
        &self.plugin_name
    }

    pub fn plugin_version(&self) -> &str {
        &self.plugin_version
    }

    /// Submitted status, or `None` while the run is in progress.
    pub fn status(&self) -> Option<ValidationStatus> {
        self.status
    }

    pub fn is_submitted(&self) -> bool {
        self.status.is_some()
    }

    pub fn violations(&self) -> &[RuleViolation] {
        &self.violations
    }

    /// Render the report as a JSON document.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    fn ensure_open(&self) -> ValidationResult<()> {
        if self.is_submitted() {
            return Err(ValidationError::AlreadySubmitted {
                plugin: self.plugin_name.clone(),
            });
        }
        Ok(())
    }
}

impl ReportSink for ValidationReport {
    fn add_violation(&mut self, violation: RuleViolation) -> ValidationResult<()> {
        self.ensure_open()?;
        self.violations.push(violation);
        Ok(())
    }

    fn submit(&mut self, status: ValidationStatus) -> ValidationResult<()> {
        self.ensure_open()?;
        self.status = Some(status);
        Ok(())
    }
}
