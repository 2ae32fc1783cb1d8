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

//! RestartPolicyAlways validation rule.
//!
//! This rule checks that every Deployment sets the restart policy of its pod
//! template to Always. Pods managed by a Deployment controller are expected to
//! be restarted in place; any other policy leaves the ReplicaSet fighting the
//! kubelet over terminated containers.
//!
//! The targeted kinds, the severity of the violation and the treatment of
//! resources that do not set the field at all can be configured:
//!
//! ```yaml
//! rules:
//!   RestartPolicyAlways:
//!     kinds: [Deployment, StatefulSet]
//!     severity: warning
//!     onMissingField: ignore
//! ```

use crate::api::{render_value, FieldLookup, FieldPath, ResourceRecord};
use crate::validation::{
    errors::{field_not_supported, field_required},
    Configuration, KindHandler, Plugins, Rule, RuleViolation, Severity, ValidationError,
    ValidationResult,
};
use serde::Deserialize;
use std::sync::Arc;

/// Plugin name for the RestartPolicyAlways rule.
pub const PLUGIN_NAME: &str = "RestartPolicyAlways";

/// Path of the monitored field.
pub const RESTART_POLICY_PATH: &str = "spec.template.spec.restartPolicy";

/// The only accepted value.
pub const REQUIRED_VALUE: &str = "Always";

const FIX_REFERENCE: &str =
    "https://kubernetes.io/docs/concepts/workloads/pods/pod-lifecycle/#restart-policy";

/// Register the RestartPolicyAlways rule with the rule registry.
pub fn register(plugins: &Plugins) {
    plugins.register(PLUGIN_NAME, |options: Option<&serde_yaml::Value>| {
        Ok(Arc::new(RestartPolicyAlways::from_options(options)?) as Arc<dyn Rule>)
    });
}

/// What to do with a targeted resource that does not set the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingFieldPolicy {
    /// Report a "Required value" violation naming the first missing segment.
    #[default]
    Violation,
    /// Treat the resource as compliant.
    Ignore,
}

/// Options accepted under `rules.RestartPolicyAlways`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RestartPolicyOptions {
    pub kinds: Vec<String>,
    pub severity: Severity,
    pub on_missing_field: MissingFieldPolicy,
}

impl Default for RestartPolicyOptions {
    fn default() -> Self {
        Self {
            kinds: vec!["Deployment".to_string()],
            severity: Severity::Error,
            on_missing_field: MissingFieldPolicy::Violation,
        }
    }
}

/// RestartPolicyAlways rejects workloads whose pod template restart policy is not Always.
pub struct RestartPolicyAlways {
    handler: KindHandler,
    path: FieldPath,
    options: RestartPolicyOptions,
}

impl RestartPolicyAlways {
    /// Create the rule with default options: Deployments only, error severity.
    pub fn new() -> Self {
        Self::with_options(RestartPolicyOptions::default())
    }

    pub fn with_options(options: RestartPolicyOptions) -> Self {
        Self {
            handler: KindHandler::new(&options.kinds),
            path: FieldPath::parse(RESTART_POLICY_PATH),
            options,
        }
    }

    /// Create the rule from its configuration section.
    pub fn from_options(options: Option<&serde_yaml::Value>) -> ValidationResult<Self> {
        let options = match options {
            Some(value) => serde_yaml::from_value(value.clone()).map_err(|e| {
                ValidationError::invalid_config(format!("rule {}: {}", PLUGIN_NAME, e))
            })?,
            None => RestartPolicyOptions::default(),
        };
        Ok(Self::with_options(options))
    }

    pub fn options(&self) -> &RestartPolicyOptions {
        &self.options
    }

    /// Evaluate one resource.
    pub fn evaluate(
        &self,
        resource: &ResourceRecord,
        config: &Configuration,
    ) -> Option<RuleViolation> {
        if resource.kind().is_some_and(|kind| config.is_ignored(kind)) {
            return None;
        }

        let detail = match resource.lookup(&self.handler, &self.path) {
            FieldLookup::NotApplicable { .. } => return None,
            FieldLookup::Found(value) if value.as_str() == Some(REQUIRED_VALUE) => return None,
            FieldLookup::Found(value) => field_not_supported(
                RESTART_POLICY_PATH,
                &render_value(value),
                &[REQUIRED_VALUE],
            ),
            FieldLookup::Absent { missing } => match self.options.on_missing_field {
                MissingFieldPolicy::Ignore => return None,
                MissingFieldPolicy::Violation => field_required(&missing),
            },
        };

        let kind = resource.kind().unwrap_or("resource");
        Some(
            RuleViolation::builder(PLUGIN_NAME, resource, recommendation(kind))
                .message_prefix(config.message_prefix())
                .field(detail)
                .fix(FIX_REFERENCE)
                .severity(self.options.severity)
                .build(),
        )
    }
}

fn recommendation(kind: &str) -> String {
    format!("{}s should set the restartPolicy to '{}'", kind, REQUIRED_VALUE)
}

impl Default for RestartPolicyAlways {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for RestartPolicyAlways {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn handles(&self, kind: &str) -> bool {
        self.handler.handles(kind)
    }

    fn check(&self, resource: &ResourceRecord, config: &Configuration) -> Vec<RuleViolation> {
        self.evaluate(resource, config).into_iter().collect()
    }
}
