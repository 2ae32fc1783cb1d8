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

//! The context a host hands to a validation run.

use super::logger::{Logger, TracingLogger};
use super::report::ValidationReport;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// CancellationFlag lets the host abandon a run from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// ValidationContext carries the manifests of one run together with the
/// logger and report the host provides.
pub struct ValidationContext {
    manifests: Vec<PathBuf>,
    logger: Arc<dyn Logger>,
    report: ValidationReport,
    cancellation: CancellationFlag,
}

impl ValidationContext {
    /// Create a context for the given manifests. Lines are logged through
    /// `tracing` unless another logger is supplied.
    pub fn new<P: Into<PathBuf>>(
        manifests: impl IntoIterator<Item = P>,
        plugin_name: &str,
        plugin_version: &str,
    ) -> Self {
        Self {
            manifests: manifests.into_iter().map(Into::into).collect(),
            logger: Arc::new(TracingLogger::new(plugin_name)),
            report: ValidationReport::new(plugin_name, plugin_version),
            cancellation: CancellationFlag::new(),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_cancellation(mut self, cancellation: CancellationFlag) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub fn manifests(&self) -> &[PathBuf] {
        &self.manifests
    }

    pub fn logger(&self) -> &dyn Logger {
        self.logger.as_ref()
    }

    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    pub fn report_mut(&mut self) -> &mut ValidationReport {
        &mut self.report
    }

    pub fn cancellation(&self) -> &CancellationFlag {
        &self.cancellation
    }

    /// Borrow everything a run needs at once: the manifests, logger and
    /// cancellation flag shared, the report exclusively.
    pub fn parts_mut(
        &mut self,
    ) -> (&[PathBuf], &dyn Logger, &CancellationFlag, &mut ValidationReport) {
        (
            &self.manifests,
            self.logger.as_ref(),
            &self.cancellation,
            &mut self.report,
        )
    }

    /// Consume the context, returning the report.
    pub fn into_report(self) -> ValidationReport {
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::logger::MemoryLogger;

    #[test]
    fn test_context_new() {
        let ctx = ValidationContext::new(["a.yaml", "b.yaml"], "plugin", "0.0.0");
        assert_eq!(ctx.manifests().len(), 2);
        assert_eq!(ctx.report().plugin_name(), "plugin");
        assert_eq!(ctx.report().plugin_version(), "0.0.0");
        assert!(!ctx.report().is_submitted());
        assert!(!ctx.cancellation().is_cancelled());
    }

    #[test]
    fn test_context_with_logger() {
        let logger = Arc::new(MemoryLogger::new());
        let ctx = ValidationContext::new(Vec::<PathBuf>::new(), "plugin", "0.0.0")
            .with_logger(logger.clone());
        ctx.logger().log("hello");
        assert_eq!(logger.lines(), vec!["hello"]);
    }

    #[test]
    fn test_cancellation_is_shared() {
        let flag = CancellationFlag::new();
        let ctx = ValidationContext::new(["a.yaml"], "plugin", "0.0.0")
            .with_cancellation(flag.clone());
        flag.cancel();
        assert!(ctx.cancellation().is_cancelled());
    }
}
