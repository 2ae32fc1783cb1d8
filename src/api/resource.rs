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

//! Dynamically shaped resource records and typed field access.

use crate::validation::KindHandler;
use serde::Serialize;
use serde_yaml::Value;
use std::fmt;
use std::path::Path;

/// ManifestPath names the manifest a resource was read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ManifestPath(String);

impl ManifestPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&Path> for ManifestPath {
    fn from(path: &Path) -> Self {
        Self(path.display().to_string())
    }
}

impl From<&str> for ManifestPath {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}

impl fmt::Display for ManifestPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ResourcePosition is the discovery-order location of a resource in a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourcePosition {
    /// Index of the manifest in the run's manifest list.
    pub manifest: usize,
    /// Index of the resource within its manifest.
    pub document: usize,
}

impl ResourcePosition {
    pub fn new(manifest: usize, document: usize) -> Self {
        Self { manifest, document }
    }
}

/// FieldPath is a dotted path into a resource, such as `spec.template.spec.restartPolicy`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Parse a dotted path. Empty segments are dropped.
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path
                .split('.')
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The dotted prefix ending at (and including) the segment at `index`.
    fn prefix(&self, index: usize) -> String {
        self.segments[..=index].join(".")
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

/// FieldLookup is the outcome of reading a field path from a resource.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldLookup<'a> {
    /// The field exists.
    Found(&'a Value),
    /// The resource is targeted but the path stops at `missing`.
    Absent { missing: String },
    /// The resource kind is not targeted by the caller.
    NotApplicable { kind: Option<String> },
}

/// ResourceRecord is one Kubernetes-style object parsed from a manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRecord {
    manifest: ManifestPath,
    position: ResourcePosition,
    document: Value,
}

impl ResourceRecord {
    pub fn new(manifest: ManifestPath, position: ResourcePosition, document: Value) -> Self {
        Self {
            manifest,
            position,
            document,
        }
    }

    /// Build a record from YAML text. Intended for tests and ad-hoc use.
    pub fn from_yaml(manifest: &str, yaml: &str) -> Result<Self, serde_yaml::Error> {
        let document: Value = serde_yaml::from_str(yaml)?;
        Ok(Self::new(
            ManifestPath::from(manifest),
            ResourcePosition::default(),
            document,
        ))
    }

    pub fn manifest(&self) -> &ManifestPath {
        &self.manifest
    }

    pub fn position(&self) -> ResourcePosition {
        self.position
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Returns the `kind` of the resource, if it has one.
    pub fn kind(&self) -> Option<&str> {
        self.document.get("kind").and_then(Value::as_str)
    }

    /// Returns the `apiVersion` of the resource, if it has one.
    pub fn api_version(&self) -> Option<&str> {
        self.document.get("apiVersion").and_then(Value::as_str)
    }

    /// Returns `metadata.name`.
    pub fn name(&self) -> Option<&str> {
        self.document
            .get("metadata")
            .and_then(|m| m.get("name"))
            .and_then(Value::as_str)
    }

    /// Returns `metadata.namespace`.
    pub fn namespace(&self) -> Option<&str> {
        self.document
            .get("metadata")
            .and_then(|m| m.get("namespace"))
            .and_then(Value::as_str)
    }

    /// Name used to attribute violations. Falls back to the kind and the
    /// document index when `metadata.name` is missing.
    pub fn display_name(&self) -> String {
        match self.name() {
            Some(name) => name.to_string(),
            None => format!(
                "<unnamed {} #{}>",
                self.kind().unwrap_or("resource"),
                self.position.document
            ),
        }
    }

    /// Read a field without a kind check.
    pub fn field(&self, path: &FieldPath) -> Result<&Value, String> {
        let mut current = &self.document;
        for (i, segment) in path.segments().iter().enumerate() {
            match current.get(segment.as_str()) {
                Some(Value::Null) | None => return Err(path.prefix(i)),
                Some(next) => current = next,
            }
        }
        Ok(current)
    }

    /// Read a field from a resource targeted by `handler`.
    pub fn lookup(&self, handler: &KindHandler, path: &FieldPath) -> FieldLookup<'_> {
        match self.kind() {
            Some(kind) if handler.handles(kind) => {}
            kind => {
                return FieldLookup::NotApplicable {
                    kind: kind.map(String::from),
                }
            }
        }

        match self.field(path) {
            Ok(value) => FieldLookup::Found(value),
            Err(missing) => FieldLookup::Absent { missing },
        }
    }
}

/// Render a YAML value for use in a human-readable message.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Sequence(_) => "<sequence>".to_string(),
        Value::Mapping(_) => "<mapping>".to_string(),
        Value::Tagged(tagged) => format!("{} {}", tagged.tag, render_value(&tagged.value)),
    }
}
