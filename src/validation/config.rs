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

//! Plugin configuration.
//!
//! The host passes one options record when it constructs the plugin, for
//! example the `properties` block of a plugin entry:
//!
//! ```yaml
//! messagePrefix: "[team-policy] "
//! ignoreKinds: [Job]
//! parallelism: 4
//! rules:
//!   RestartPolicyAlways:
//!     severity: warning
//! ```
//!
//! Unrecognized keys are ignored.

use super::errors::{ValidationError, ValidationResult};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::num::NonZeroUsize;

/// Configuration is the immutable options record of a validation plugin.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Configuration {
    message_prefix: String,
    ignore_kinds: BTreeSet<String>,
    parallelism: usize,
    rules: BTreeMap<String, serde_yaml::Value>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            message_prefix: String::new(),
            ignore_kinds: BTreeSet::new(),
            parallelism: 1,
            rules: BTreeMap::new(),
        }
    }
}

impl Configuration {
    /// Decode a configuration from YAML (or JSON) text. Empty text and an
    /// explicit null record yield the defaults.
    pub fn from_yaml_str(text: &str) -> ValidationResult<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Option<Self> =
            serde_yaml::from_str(text).map_err(ValidationError::invalid_config)?;
        Ok(config.unwrap_or_default())
    }

    /// Decode a configuration from a reader.
    pub fn from_reader(reader: &mut dyn Read) -> ValidationResult<Self> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(ValidationError::invalid_config)?;
        Self::from_yaml_str(&text)
    }

    pub fn with_message_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.message_prefix = prefix.into();
        self
    }

    pub fn with_ignore_kinds<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_kinds = kinds.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn with_rule_options(mut self, rule: &str, options: serde_yaml::Value) -> Self {
        self.rules.insert(rule.to_string(), options);
        self
    }

    /// Prefix added verbatim to every violation message.
    pub fn message_prefix(&self) -> &str {
        &self.message_prefix
    }

    /// Returns true if resources of this kind are exempt from every rule.
    pub fn is_ignored(&self, kind: &str) -> bool {
        self.ignore_kinds.contains(kind)
    }

    pub fn ignore_kinds(&self) -> impl Iterator<Item = &str> {
        self.ignore_kinds.iter().map(String::as_str)
    }

    /// Options section for the named rule, if any.
    pub fn rule_options(&self, rule: &str) -> Option<&serde_yaml::Value> {
        self.rules.get(rule)
    }

    /// Number of threads to evaluate manifests on. `0` resolves to the
    /// available parallelism of the host.
    pub fn worker_count(&self) -> usize {
        match self.parallelism {
            0 => std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
            n => n,
        }
    }
}
