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

//! Validation error types.
//!
//! Run-level failures are [`ValidationError`]s. Field-level problems found on a
//! resource are never errors; they are described by a [`FieldError`] carried on
//! a violation.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// ValidationError represents errors that abort a validation run.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The manifest could not be read.
    #[error("failed to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The manifest is not valid YAML.
    #[error("malformed manifest {path}: {source}")]
    MalformedManifest {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// A document in the manifest, or an element of a top-level sequence
    /// document, is not a resource mapping.
    #[error(
        "malformed manifest {path}: {} is not a resource mapping",
        describe_location(.document, .element)
    )]
    NotAResource {
        path: PathBuf,
        document: usize,
        element: Option<usize>,
    },

    /// The plugin or rule configuration could not be decoded.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// No rule is registered under the requested name.
    #[error("unknown validation rule: {0}")]
    UnknownRule(String),

    /// The report was already submitted for this run.
    #[error("report for {plugin} was already submitted")]
    AlreadySubmitted { plugin: String },

    /// The run was abandoned before completion.
    #[error("validation run cancelled")]
    Cancelled,

    /// Internal represents an internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ValidationError {
    /// Create an Io error for the given manifest.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ValidationError::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a MalformedManifest error for the given manifest.
    pub fn malformed(path: impl Into<PathBuf>, source: serde_yaml::Error) -> Self {
        ValidationError::MalformedManifest {
            path: path.into(),
            source,
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(msg: impl fmt::Display) -> Self {
        ValidationError::InvalidConfig(msg.to_string())
    }

    /// Create an Internal error.
    pub fn internal_error(msg: impl Into<String>) -> Self {
        ValidationError::Internal(msg.into())
    }
}

fn describe_location(document: &usize, element: &Option<usize>) -> String {
    match element {
        Some(element) => format!("element {} of document {}", element, document),
        None => format!("document {}", document),
    }
}

/// FieldError describes what is wrong with a single field of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field: String,
    pub error_type: FieldErrorType,
    pub value: String,
    pub supported_values: Vec<String>,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_type {
            FieldErrorType::NotSupported => {
                write!(
                    f,
                    "{}: Unsupported value: \"{}\": supported values: {}",
                    self.field,
                    self.value,
                    self.supported_values
                        .iter()
                        .map(|s| format!("\"{}\"", s))
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            }
            FieldErrorType::Required => {
                write!(f, "{}: Required value", self.field)
            }
        }
    }
}

/// FieldErrorType represents the type of field error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldErrorType {
    /// NotSupported indicates the value is not in the list of supported values.
    NotSupported,
    /// Required indicates a required field is missing.
    Required,
}

/// Helper function to create a "not supported" field error.
pub fn field_not_supported(field: &str, value: &str, supported: &[&str]) -> FieldError {
    FieldError {
        field: field.to_string(),
        error_type: FieldErrorType::NotSupported,
        value: value.to_string(),
        supported_values: supported.iter().map(|s| s.to_string()).collect(),
    }
}

/// Helper function to create a "required" field error.
pub fn field_required(field: &str) -> FieldError {
    FieldError {
        field: field.to_string(),
        error_type: FieldErrorType::Required,
        value: String::new(),
        supported_values: Vec::new(),
    }
}
