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

//! Logger capability handed to validations by the host.
//!
//! Validations never print. User-facing lines go through the [`Logger`] in the
//! context so the host controls where and when they appear.

use std::sync::{Mutex, PoisonError};

/// Logger receives user-facing progress lines from a validation.
pub trait Logger: Send + Sync {
    fn log(&self, message: &str);
}

/// TracingLogger forwards every line to `tracing` at info level.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    plugin: String,
}

impl TracingLogger {
    pub fn new(plugin: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
        }
    }
}

impl Logger for TracingLogger {
    fn log(&self, message: &str) {
        tracing::info!(plugin = %self.plugin, "{}", message);
    }
}

/// MemoryLogger keeps every line in memory, in order.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    lines: Mutex<Vec<String>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines logged so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, message: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_logger_keeps_order() {
        let logger = MemoryLogger::new();
        logger.log("first");
        logger.log("second");
        assert_eq!(logger.lines(), vec!["first", "second"]);
    }

    #[test]
    fn test_tracing_logger_does_not_panic_without_subscriber() {
        TracingLogger::new("test").log("hello");
    }
}
