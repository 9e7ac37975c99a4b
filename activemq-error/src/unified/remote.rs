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

//! Broker-reported operation failures

use thiserror::Error;

/// Classification the broker uses when an MBean does not exist
pub const INSTANCE_NOT_FOUND: &str = "javax.management.InstanceNotFoundException";

/// The broker accepted the request but reported a failure for the logical operation.
#[derive(Debug, Error)]
#[error("Remote {operation} on '{mbean}' failed: status={status}, type={error_type}, error={error}")]
pub struct RemoteOperationError {
    /// Operation kind (`read`, `search`, `exec`)
    pub operation: String,
    /// Resource path the operation targeted
    pub mbean: String,
    /// Status code reported in the reply body
    pub status: u16,
    /// Broker error classification string
    pub error_type: String,
    /// Broker error message
    pub error: String,
}

impl RemoteOperationError {
    pub fn new(
        operation: impl Into<String>,
        mbean: impl Into<String>,
        status: u16,
        error_type: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            operation: operation.into(),
            mbean: mbean.into(),
            status,
            error_type: error_type.into(),
            error: error.into(),
        }
    }

    /// Whether the broker classified the failure as a missing MBean
    pub fn is_instance_not_found(&self) -> bool {
        self.error_type == INSTANCE_NOT_FOUND
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_display_carries_context() {
        let err = RemoteOperationError::new(
            "exec",
            "org.apache.activemq:type=Broker,brokerName=localhost",
            500,
            "java.lang.IllegalArgumentException",
            "bad argument",
        );
        let text = err.to_string();
        assert!(text.contains("exec"));
        assert!(text.contains("brokerName=localhost"));
        assert!(text.contains("java.lang.IllegalArgumentException"));
        assert!(!err.is_instance_not_found());
    }
}
