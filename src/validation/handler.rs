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

//! Base kind handler for validation rules.

use std::collections::BTreeSet;

/// KindHandler is a base struct for rules.
/// It decides which resource kinds a rule applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindHandler {
    kinds: BTreeSet<String>,
}

impl KindHandler {
    /// Create a new KindHandler that handles the given kinds.
    pub fn new<S: AsRef<str>>(kinds: &[S]) -> Self {
        Self {
            kinds: kinds.iter().map(|k| k.as_ref().to_string()).collect(),
        }
    }

    /// Returns true if the rule applies to resources of this kind.
    pub fn handles(&self, kind: &str) -> bool {
        self.kinds.contains(kind)
    }
}
