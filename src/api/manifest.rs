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

//! Manifest loading.
//!
//! A manifest is a YAML stream of one or more `---` separated documents. A
//! document whose top level is a sequence contributes each element as its own
//! resource. Empty documents are skipped.

use super::resource::{ManifestPath, ResourcePosition, ResourceRecord};
use crate::validation::{ValidationError, ValidationResult};
use serde::Deserialize;
use serde_yaml::Value;
use std::path::Path;

/// Read and parse the manifest at `path`.
///
/// `manifest_index` is the position of the manifest in the run and is stamped
/// onto every returned record.
pub fn load_manifest(path: &Path, manifest_index: usize) -> ValidationResult<Vec<ResourceRecord>> {
    let content = std::fs::read_to_string(path).map_err(|e| ValidationError::io(path, e))?;
    parse_manifest(path, &content, manifest_index)
}

/// Parse manifest text into resource records, preserving document order.
pub fn parse_manifest(
    path: &Path,
    content: &str,
    manifest_index: usize,
) -> ValidationResult<Vec<ResourceRecord>> {
    let manifest = ManifestPath::from(path);
    let mut records = Vec::new();

    for (document_index, document) in serde_yaml::Deserializer::from_str(content).enumerate() {
        let value = Value::deserialize(document).map_err(|e| ValidationError::malformed(path, e))?;
        let candidates: Vec<(Option<usize>, Value)> = match value {
            Value::Null => continue,
            Value::Sequence(items) => items
                .into_iter()
                .enumerate()
                .map(|(element, item)| (Some(element), item))
                .collect(),
            other => vec![(None, other)],
        };

        for (element, candidate) in candidates {
            if !candidate.is_mapping() {
                return Err(ValidationError::NotAResource {
                    path: path.to_path_buf(),
                    document: document_index,
                    element,
                });
            }
            let position = ResourcePosition::new(manifest_index, records.len());
            records.push(ResourceRecord::new(manifest.clone(), position, candidate));
        }
    }

    tracing::debug!(
        manifest = %manifest,
        resources = records.len(),
        "parsed manifest"
    );

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_multi_document_stream() {
        let content = r#"
kind: Deployment
metadata:
  name: a
---
kind: Service
metadata:
  name: b
---
"#;
        let records = parse_manifest(Path::new("m.yaml"), content, 3).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name(), Some("a"));
        assert_eq!(records[1].kind(), Some("Service"));
        assert_eq!(records[1].position(), ResourcePosition::new(3, 1));
        assert_eq!(records[0].manifest().as_str(), "m.yaml");
    }

    #[test]
    fn test_parse_top_level_sequence() {
        let content = r#"
- kind: Deployment
  metadata: {name: a}
- kind: Deployment
  metadata: {name: b}
"#;
        let records = parse_manifest(Path::new("m.yaml"), content, 0).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.name().unwrap()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(records[1].position().document, 1);
    }

    #[test]
    fn test_parse_empty_manifest() {
        let records = parse_manifest(Path::new("m.yaml"), "", 0).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_malformed_yaml() {
        let err = parse_manifest(Path::new("bad.yaml"), "kind: [unterminated", 0).unwrap_err();
        assert!(matches!(err, ValidationError::MalformedManifest { .. }));
        assert!(err.to_string().contains("bad.yaml"));
    }

    #[test]
    fn test_parse_scalar_document_is_not_a_resource() {
        let err = parse_manifest(Path::new("m.yaml"), "kind: Service\n---\njust a string\n", 0)
            .unwrap_err();
        match err {
            ValidationError::NotAResource {
                document, element, ..
            } => {
                assert_eq!(document, 1);
                assert_eq!(element, None);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_scalar_sequence_element_is_located() {
        let content = "kind: A\n---\n- kind: B\n- 5\n";
        let err = parse_manifest(Path::new("m.yaml"), content, 0).unwrap_err();
        match err {
            ValidationError::NotAResource {
                document, element, ..
            } => {
                assert_eq!(document, 1);
                assert_eq!(element, Some(1));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_empty_documents_do_not_shift_positions() {
        let content = "---\n---\nkind: A\n---\n- kind: B\n- kind: C\n";
        let records = parse_manifest(Path::new("m.yaml"), content, 2).unwrap();
        let positions: Vec<_> = records.iter().map(|r| r.position()).collect();
        assert_eq!(
            positions,
            vec![
                ResourcePosition::new(2, 0),
                ResourcePosition::new(2, 1),
                ResourcePosition::new(2, 2),
            ]
        );
    }

    #[test]
    fn test_load_manifest_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "kind: Deployment\nmetadata:\n  name: web").unwrap();

        let records = load_manifest(file.path(), 0).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name(), Some("web"));
    }

    #[test]
    fn test_load_missing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_manifest(&dir.path().join("missing.yaml"), 0).unwrap_err();
        assert!(matches!(err, ValidationError::Io { .. }));
    }
}
