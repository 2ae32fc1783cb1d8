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

//! Validation rules module.

pub mod restartpolicy;

use crate::validation::Plugins;

/// All rules in evaluation order. Violations on the same resource are
/// reported in this order.
pub const ALL_ORDERED_RULES: &[&str] = &[
    restartpolicy::PLUGIN_NAME, // RestartPolicyAlways
];

/// Register all validation rules.
/// Registration order must follow ALL_ORDERED_RULES.
pub fn register_all_rules(plugins: &Plugins) {
    restartpolicy::register(plugins);
}
