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

//! Status policies decide whether a set of violations fails the run.

use super::interfaces::{Severity, ValidationStatus};
use super::violation::RuleViolation;

/// StatusPolicy maps the violations of a completed run to its status.
pub trait StatusPolicy: Send + Sync {
    fn status(&self, violations: &[RuleViolation]) -> ValidationStatus;
}

impl<F> StatusPolicy for F
where
    F: Fn(&[RuleViolation]) -> ValidationStatus + Send + Sync,
{
    fn status(&self, violations: &[RuleViolation]) -> ValidationStatus {
        self(violations)
    }
}

/// Any violation fails the run.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailOnAny;

impl StatusPolicy for FailOnAny {
    fn status(&self, violations: &[RuleViolation]) -> ValidationStatus {
        if violations.is_empty() {
            ValidationStatus::Success
        } else {
            ValidationStatus::Failure
        }
    }
}

/// Only violations at or above the threshold fail the run; the rest are warnings.
#[derive(Debug, Clone, Copy)]
pub struct FailOnSeverity(pub Severity);

impl StatusPolicy for FailOnSeverity {
    fn status(&self, violations: &[RuleViolation]) -> ValidationStatus {
        if violations.iter().any(|v| v.severity() >= self.0) {
            ValidationStatus::Failure
        } else {
            ValidationStatus::Success
        }
    }
}
