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

//! Rule registry.

use super::config::Configuration;
use super::errors::{ValidationError, ValidationResult};
use super::interfaces::Rule;
use std::sync::{Arc, PoisonError, RwLock};

/// Factory creates a rule from its options section, if one was configured.
pub type Factory = fn(options: Option<&serde_yaml::Value>) -> ValidationResult<Arc<dyn Rule>>;

/// Plugins is a registry of validation rules, kept in registration order.
#[derive(Default)]
pub struct Plugins {
    registry: RwLock<Vec<(String, Factory)>>,
}

impl Plugins {
    /// Create a new empty rule registry.
    pub fn new() -> Self {
        Self {
            registry: RwLock::new(Vec::new()),
        }
    }

    /// Register a rule with the given name and factory. Registering a name
    /// twice replaces the factory but keeps the original position.
    pub fn register(&self, name: &str, factory: Factory) {
        let mut registry = self.registry.write().unwrap_or_else(PoisonError::into_inner);
        match registry.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = factory,
            None => registry.push((name.to_string(), factory)),
        }
    }

    /// Get a factory for the given rule name.
    pub fn get_factory(&self, name: &str) -> Option<Factory> {
        let registry = self.registry.read().unwrap_or_else(PoisonError::into_inner);
        registry.iter().find(|(n, _)| n == name).map(|(_, f)| *f)
    }

    /// Get all registered rule names in registration order.
    pub fn registered_names(&self) -> Vec<String> {
        let registry = self.registry.read().unwrap_or_else(PoisonError::into_inner);
        registry.iter().map(|(n, _)| n.clone()).collect()
    }

    /// Check if a rule is registered.
    pub fn is_registered(&self, name: &str) -> bool {
        self.get_factory(name).is_some()
    }

    /// Create a new instance of the named rule with its options from `config`.
    pub fn new_from_plugins(
        &self,
        name: &str,
        config: &Configuration,
    ) -> ValidationResult<Arc<dyn Rule>> {
        let factory = self
            .get_factory(name)
            .ok_or_else(|| ValidationError::UnknownRule(name.to_string()))?;
        factory(config.rule_options(name))
    }

    /// Instantiate every registered rule, in registration order.
    pub fn instantiate_all(&self, config: &Configuration) -> ValidationResult<Vec<Arc<dyn Rule>>> {
        self.registered_names()
            .iter()
            .map(|name| self.new_from_plugins(name, config))
            .collect()
    }
}
