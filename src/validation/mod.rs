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

//! Validation interfaces and types.
//!
//! This module provides the core types and traits for writing manifest
//! validation rules and running them: the rule registry, the per-run
//! context, violation collection, and the report handed back to the host.

pub mod accumulator;
pub mod config;
pub mod context;
pub mod engine;
pub mod errors;
mod handler;
mod interfaces;
pub mod logger;
mod plugins;
pub mod policy;
pub mod report;
mod violation;

pub use accumulator::ViolationAccumulator;
pub use config::Configuration;
pub use context::{CancellationFlag, ValidationContext};
pub use engine::ManifestValidation;
pub use errors::{FieldError, FieldErrorType, ValidationError, ValidationResult};
pub use handler::KindHandler;
pub use interfaces::{evaluate, Rule, Severity, Validation, ValidationStatus};
pub use logger::{Logger, MemoryLogger, TracingLogger};
pub use plugins::{Factory, Plugins};
pub use policy::{FailOnAny, FailOnSeverity, StatusPolicy};
pub use report::{ReportSink, ValidationReport};
pub use violation::{RuleViolation, RuleViolationBuilder};
