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

//! Append-only violation collection.

use super::violation::RuleViolation;

/// ViolationAccumulator collects the violations of a single rule during one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViolationAccumulator {
    violations: Vec<RuleViolation>,
}

impl ViolationAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a violation. Identical violations are all kept.
    pub fn record(&mut self, violation: RuleViolation) {
        self.violations.push(violation);
    }

    /// Violations in the order they were recorded.
    pub fn all(&self) -> &[RuleViolation] {
        &self.violations
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Move every violation of `other` to the end of this accumulator.
    pub fn append(&mut self, other: ViolationAccumulator) {
        self.violations.extend(other.violations);
    }

    pub fn into_violations(self) -> Vec<RuleViolation> {
        self.violations
    }
}

impl Extend<RuleViolation> for ViolationAccumulator {
    fn extend<T: IntoIterator<Item = RuleViolation>>(&mut self, iter: T) {
        self.violations.extend(iter);
    }
}

/// Merge per-rule accumulators into one list in resource discovery order.
///
/// Accumulators must be given in rule registration order; that order breaks
/// ties between violations on the same resource.
pub fn merge(accumulators: Vec<ViolationAccumulator>) -> Vec<RuleViolation> {
    let mut merged: Vec<RuleViolation> = accumulators
        .into_iter()
        .flat_map(ViolationAccumulator::into_violations)
        .collect();
    // Stable, so rule order and in-rule order survive for equal positions.
    merged.sort_by_key(RuleViolation::position);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ManifestPath, ResourcePosition, ResourceRecord};

    fn violation(rule: &str, name: &str, manifest: usize, document: usize) -> RuleViolation {
        let resource = ResourceRecord::new(
            ManifestPath::from("m.yaml"),
            ResourcePosition::new(manifest, document),
            serde_yaml::from_str(&format!("kind: Deployment\nmetadata: {{name: {}}}", name))
                .unwrap(),
        );
        RuleViolation::builder(rule, &resource, "fix it").build()
    }

    #[test]
    fn test_record_keeps_duplicates() {
        let mut acc = ViolationAccumulator::new();
        assert!(acc.is_empty());
        acc.record(violation("R", "a", 0, 0));
        acc.record(violation("R", "a", 0, 0));
        assert_eq!(acc.len(), 2);
        assert_eq!(acc.all()[0], acc.all()[1]);
    }

    #[test]
    fn test_append_preserves_order() {
        let mut first = ViolationAccumulator::new();
        first.record(violation("R", "a", 0, 0));
        let mut second = ViolationAccumulator::new();
        second.record(violation("R", "b", 1, 0));

        first.append(second);
        let names: Vec<_> = first.all().iter().map(|v| v.resource_name()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_merge_orders_by_position_then_rule() {
        let mut rule_a = ViolationAccumulator::new();
        rule_a.record(violation("A", "x", 0, 1));
        rule_a.record(violation("A", "z", 1, 0));

        let mut rule_b = ViolationAccumulator::new();
        rule_b.record(violation("B", "w", 0, 0));
        rule_b.record(violation("B", "x", 0, 1));

        let merged = merge(vec![rule_a, rule_b]);
        let order: Vec<_> = merged
            .iter()
            .map(|v| (v.rule_name(), v.resource_name()))
            .collect();
        assert_eq!(order, vec![("B", "w"), ("A", "x"), ("B", "x"), ("A", "z")]);
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge(Vec::new()).is_empty());
        assert!(merge(vec![ViolationAccumulator::new()]).is_empty());
    }
}
