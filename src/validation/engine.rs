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

//! Validation engine.
//!
//! Manifests are parsed and evaluated one at a time (or split across scoped
//! worker threads when the configuration asks for parallelism). Every rule
//! collects into its own accumulator; the accumulators are merged in
//! discovery order before anything reaches the report, so the report never
//! sees a partial run.

use super::accumulator::{merge, ViolationAccumulator};
use super::config::Configuration;
use super::context::{CancellationFlag, ValidationContext};
use super::errors::{ValidationError, ValidationResult};
use super::interfaces::{evaluate, Rule, Validation, ValidationStatus};
use super::logger::Logger;
use super::plugins::Plugins;
use super::policy::{FailOnAny, StatusPolicy};
use super::report::ReportSink;
use super::violation::RuleViolation;
use crate::api::{load_manifest, ResourceRecord};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Per-rule accumulators for one manifest, in rule registration order.
type ManifestOutcome = Vec<ViolationAccumulator>;

/// ManifestValidation runs a fixed set of rules over the manifests of a context.
pub struct ManifestValidation {
    config: Configuration,
    rules: Vec<Arc<dyn Rule>>,
    policy: Arc<dyn StatusPolicy>,
}

impl ManifestValidation {
    /// Create a validation with every built-in rule.
    pub fn new(config: Configuration) -> ValidationResult<Self> {
        let plugins = Plugins::new();
        crate::plugins::register_all_rules(&plugins);
        Self::from_plugins(&plugins, config)
    }

    /// Create a validation with every rule registered in `plugins`.
    pub fn from_plugins(plugins: &Plugins, config: Configuration) -> ValidationResult<Self> {
        let rules = plugins.instantiate_all(&config)?;
        Ok(Self::with_rules(config, rules))
    }

    /// Create a validation with an explicit rule list. Rule order is the
    /// tie-break order for violations on the same resource.
    pub fn with_rules(config: Configuration, rules: Vec<Arc<dyn Rule>>) -> Self {
        Self {
            config,
            rules,
            policy: Arc::new(FailOnAny),
        }
    }

    /// Replace the policy deriving the run status from its violations.
    pub fn with_status_policy(mut self, policy: impl StatusPolicy + 'static) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Evaluate every manifest and return the merged violations without
    /// touching any report.
    pub fn evaluate_manifests(
        &self,
        manifests: &[PathBuf],
        logger: &dyn Logger,
        cancellation: &CancellationFlag,
    ) -> ValidationResult<Vec<RuleViolation>> {
        let workers = self.config.worker_count();
        let outcomes = if workers <= 1 || manifests.len() <= 1 {
            manifests
                .iter()
                .enumerate()
                .map(|(index, path)| self.evaluate_manifest(index, path, logger, cancellation))
                .collect::<ValidationResult<Vec<_>>>()?
        } else {
            self.evaluate_parallel(manifests, workers, logger, cancellation)?
        };

        let mut per_rule = vec![ViolationAccumulator::new(); self.rules.len()];
        for outcome in outcomes {
            for (acc, found) in per_rule.iter_mut().zip(outcome) {
                acc.append(found);
            }
        }
        Ok(merge(per_rule))
    }

    /// Evaluate every rule against already parsed resources.
    pub fn evaluate_resources(&self, resources: &[ResourceRecord]) -> Vec<ViolationAccumulator> {
        let mut per_rule = vec![ViolationAccumulator::new(); self.rules.len()];
        for resource in resources {
            for (rule, acc) in self.rules.iter().zip(per_rule.iter_mut()) {
                acc.extend(evaluate(rule.as_ref(), resource, &self.config));
            }
        }
        per_rule
    }

    /// Run the whole validation and submit the outcome to `sink`.
    ///
    /// This is the single terminal path of a run: on success the merged
    /// violations are added and the policy's status submitted. When reading
    /// input or publishing to the sink fails, `failure` is submitted instead
    /// and the original error returned; the violations already handed to the
    /// sink are then unspecified. A cancelled run submits nothing.
    pub fn run(
        &self,
        manifests: &[PathBuf],
        logger: &dyn Logger,
        cancellation: &CancellationFlag,
        sink: &mut dyn ReportSink,
    ) -> ValidationResult<ValidationStatus> {
        let outcome = self
            .evaluate_manifests(manifests, logger, cancellation)
            .and_then(|violations| self.publish(violations, sink));

        match outcome {
            Ok(status) => {
                tracing::debug!(manifests = manifests.len(), %status, "validation run complete");
                Ok(status)
            }
            Err(ValidationError::Cancelled) => {
                tracing::warn!("validation run cancelled, no report submitted");
                Err(ValidationError::Cancelled)
            }
            Err(err) => {
                tracing::warn!(error = %err, "validation run aborted");
                if let Err(submit_err) = sink.submit(ValidationStatus::Failure) {
                    tracing::warn!(error = %submit_err, "failed to submit failure status");
                }
                Err(err)
            }
        }
    }

    fn publish(
        &self,
        violations: Vec<RuleViolation>,
        sink: &mut dyn ReportSink,
    ) -> ValidationResult<ValidationStatus> {
        let status = self.policy.status(&violations);
        let count = violations.len();
        for violation in violations {
            sink.add_violation(violation)?;
        }
        sink.submit(status)?;
        tracing::debug!(violations = count, %status, "report submitted");
        Ok(status)
    }

    fn evaluate_manifest(
        &self,
        index: usize,
        path: &Path,
        logger: &dyn Logger,
        cancellation: &CancellationFlag,
    ) -> ValidationResult<ManifestOutcome> {
        if cancellation.is_cancelled() {
            return Err(ValidationError::Cancelled);
        }

        logger.log(&format!("validating manifest: {}", path.display()));
        let resources = load_manifest(path, index)?;
        Ok(self.evaluate_resources(&resources))
    }

    fn evaluate_parallel(
        &self,
        manifests: &[PathBuf],
        workers: usize,
        logger: &dyn Logger,
        cancellation: &CancellationFlag,
    ) -> ValidationResult<Vec<ManifestOutcome>> {
        let chunk_size = manifests.len().div_ceil(workers);

        std::thread::scope(|scope| {
            let handles: Vec<_> = manifests
                .chunks(chunk_size)
                .enumerate()
                .map(|(chunk, paths)| {
                    scope.spawn(move || {
                        paths
                            .iter()
                            .enumerate()
                            .map(|(i, path)| {
                                self.evaluate_manifest(
                                    chunk * chunk_size + i,
                                    path,
                                    logger,
                                    cancellation,
                                )
                            })
                            .collect::<ValidationResult<Vec<_>>>()
                    })
                })
                .collect();

            let mut outcomes = Vec::with_capacity(manifests.len());
            for handle in handles {
                let part = handle
                    .join()
                    .map_err(|_| ValidationError::internal_error("manifest worker panicked"))??;
                outcomes.extend(part);
            }
            Ok(outcomes)
        })
    }
}

impl Validation for ManifestValidation {
    fn validate(&self, context: &mut ValidationContext) -> ValidationResult<()> {
        let (manifests, logger, cancellation, report) = context.parts_mut();
        self.run(manifests, logger, cancellation, report).map(|_| ())
    }
}
