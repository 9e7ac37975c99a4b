// Copyright 2024 The ActiveMQ Manager Authors
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

//! CLI input validators
//!
//! Provides validation for command-line arguments

use activemq_error::ActiveMQError;
use activemq_error::ActiveMQResult;

/// Characters with a meaning inside MBean object names or their search patterns
const OBJECT_NAME_RESERVED: &[char] = &['*', '?', ',', '=', ':', '"'];

/// Validate a queue name before it is embedded into an object name
pub fn validate_queue_name(name: &str) -> ActiveMQResult<()> {
    if name.trim().is_empty() {
        return Err(ActiveMQError::IllegalArgument("Queue name cannot be empty".to_string()));
    }

    if let Some(ch) = name.chars().find(|c| OBJECT_NAME_RESERVED.contains(c)) {
        return Err(ActiveMQError::IllegalArgument(format!(
            "Queue name '{name}' contains reserved character '{ch}'"
        )));
    }

    Ok(())
}

/// Validate a JMS selector
pub fn validate_selector(selector: &str) -> ActiveMQResult<()> {
    match selector.trim() {
        "" => Err(ActiveMQError::IllegalArgument("Selector cannot be empty".to_string())),
        _ => Ok(()),
    }
}

/// Validate the fan-out worker count
pub fn validate_workers(workers: usize) -> ActiveMQResult<()> {
    match workers {
        0 => Err(ActiveMQError::IllegalArgument("workers must be at least 1".to_string())),
        n if n > 256 => Err(ActiveMQError::IllegalArgument(format!(
            "workers exceeds maximum value of 256, got {n}"
        ))),
        _ => Ok(()),
    }
}
