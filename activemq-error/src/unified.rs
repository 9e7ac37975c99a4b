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

//! Unified error system for the ActiveMQ manager
//!
//! All failures are grouped by where they happened: on the wire, inside the broker, or
//! while decoding what the broker sent back. Domain conditions derived from those
//! (not found, aggregate timeout) live directly on [`ActiveMQError`].

mod decode;
mod remote;
mod transport;

pub use decode::DecodeError;
pub use remote::RemoteOperationError;
pub use remote::INSTANCE_NOT_FOUND;
use thiserror::Error;
pub use transport::TransportError;

/// Main error type for all ActiveMQ manager operations
#[derive(Debug, Error)]
pub enum ActiveMQError {
    // ============================================================================
    // Transport Errors
    // ============================================================================
    /// Network or HTTP level failure
    #[error(transparent)]
    Transport(#[from] TransportError),

    // ============================================================================
    // Remote Operation Errors
    // ============================================================================
    /// The broker reported a failure for the logical operation
    #[error(transparent)]
    RemoteOperation(#[from] RemoteOperationError),

    // ============================================================================
    // Decode Errors
    // ============================================================================
    /// Reply or page shape violated the expected contract
    #[error(transparent)]
    Decode(#[from] DecodeError),

    // ============================================================================
    // Domain Errors
    // ============================================================================
    /// A named resource does not exist on the broker
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    /// An aggregate deadline expired
    #[error("Operation '{operation}' timed out after {timeout_ms}ms")]
    Timeout { operation: &'static str, timeout_ms: u64 },

    /// Work was abandoned because the caller cancelled it
    #[error("Operation '{operation}' was cancelled")]
    Cancelled { operation: &'static str },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    /// Configuration source could not be read or deserialized
    #[error("Configuration parse error: {reason}")]
    ConfigParseFailed { reason: String },

    /// Configuration value rejected by validation
    #[error("Invalid configuration for '{key}': {reason}")]
    ConfigInvalid { key: &'static str, reason: String },

    // ============================================================================
    // System Errors
    // ============================================================================
    /// Illegal argument
    #[error("Illegal argument: {0}")]
    IllegalArgument(String),

    /// Internal error (should be rare)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result alias used across all ActiveMQ manager crates
pub type ActiveMQResult<T> = std::result::Result<T, ActiveMQError>;

// ============================================================================
// Convenience Constructors
// ============================================================================

impl ActiveMQError {
    /// Create a not found error for a resource kind
    #[inline]
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound { kind, name: name.into() }
    }

    /// Create an aggregate timeout error
    #[inline]
    pub fn timeout(operation: &'static str, timeout_ms: u64) -> Self {
        Self::Timeout { operation, timeout_ms }
    }

    /// Create a cancellation error
    #[inline]
    pub fn cancelled(operation: &'static str) -> Self {
        Self::Cancelled { operation }
    }

    /// Create a configuration validation error
    #[inline]
    pub fn config_invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            key,
            reason: reason.into(),
        }
    }

    /// Create a configuration parse error
    #[inline]
    pub fn config_parse_failed(reason: impl Into<String>) -> Self {
        Self::ConfigParseFailed { reason: reason.into() }
    }

    /// Create an internal error
    #[inline]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Whether this error means the requested resource does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether this error is a remote "instance not found" classification
    pub fn is_instance_not_found(&self) -> bool {
        matches!(self, Self::RemoteOperation(e) if e.is_instance_not_found())
    }

    /// Whether this error was produced by an expired deadline
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
            || matches!(self, Self::Transport(TransportError::RequestTimeout { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = ActiveMQError::not_found("queue", "pytest.queue1");
        assert_eq!(err.to_string(), "queue not found: pytest.queue1");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_timeout_display() {
        let err = ActiveMQError::timeout("fan-out", 250);
        assert_eq!(err.to_string(), "Operation 'fan-out' timed out after 250ms");
        assert!(err.is_timeout());
    }

    #[test]
    fn test_transport_timeout_is_timeout() {
        let err: ActiveMQError = TransportError::request_timeout("http://localhost:8161/api/jolokia", 30000).into();
        assert!(err.is_timeout());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_remote_instance_not_found() {
        let err: ActiveMQError = RemoteOperationError::new(
            "read",
            "org.apache.activemq:type=Broker,brokerName=localhost,destinationType=Queue,destinationName=q1",
            404,
            INSTANCE_NOT_FOUND,
            "No MBean found",
        )
        .into();
        assert!(err.is_instance_not_found());
        assert!(err.to_string().contains("destinationName=q1"));
    }

    #[test]
    fn test_config_errors() {
        let err = ActiveMQError::config_invalid("workers", "must be at least 1");
        assert_eq!(err.to_string(), "Invalid configuration for 'workers': must be at least 1");

        let err = ActiveMQError::config_parse_failed("missing file");
        assert_eq!(err.to_string(), "Configuration parse error: missing file");
    }

    #[test]
    fn test_cancelled_display() {
        let err = ActiveMQError::cancelled("fan-out");
        assert_eq!(err.to_string(), "Operation 'fan-out' was cancelled");
    }
}
