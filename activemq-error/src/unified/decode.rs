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

//! Errors raised when a reply or page does not match the expected contract

use thiserror::Error;

/// Reply, object name, or console page shape violations
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Payload had the wrong JSON type
    #[error("Unexpected payload for {context}: {expected} was expected")]
    UnexpectedShape { context: String, expected: &'static str },

    /// A required field was absent
    #[error("Missing field '{field}' in {context}")]
    MissingField { field: String, context: String },

    /// Payload could not be deserialized into the typed record
    #[error("Invalid payload for {context}: {reason}")]
    InvalidPayload { context: String, reason: String },

    /// Object name could not be split into key/value properties
    #[error("Invalid object name '{name}': {reason}")]
    InvalidObjectName { name: String, reason: String },

    /// Console timestamp in an unknown format
    #[error("Invalid timestamp '{value}': {reason}")]
    InvalidTimestamp { value: String, reason: String },

    /// Byte array structure is malformed
    #[error("Invalid byte array: {reason}")]
    InvalidByteArray { reason: String },

    /// Console action link did not point at the expected action
    #[error("href does not start with \"{expected_prefix}\": {href}")]
    UnexpectedHref { expected_prefix: &'static str, href: String },

    /// Console page did not contain exactly one table with the id
    #[error("Expected exactly one table with id '{id}', found {found}")]
    MissingTable { id: String, found: usize },

    /// A console table row did not have the expected cells
    #[error("Invalid row in table '{table}': {reason}")]
    InvalidRow { table: String, reason: String },
}

impl DecodeError {
    /// Create an unexpected shape error
    #[inline]
    pub fn unexpected_shape(context: impl Into<String>, expected: &'static str) -> Self {
        Self::UnexpectedShape {
            context: context.into(),
            expected,
        }
    }

    /// Create a missing field error
    #[inline]
    pub fn missing_field(field: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
            context: context.into(),
        }
    }

    /// Create an invalid payload error
    #[inline]
    pub fn invalid_payload(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPayload {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid byte array error
    #[inline]
    pub fn invalid_byte_array(reason: impl Into<String>) -> Self {
        Self::InvalidByteArray { reason: reason.into() }
    }

    /// Create an invalid row error
    #[inline]
    pub fn invalid_row(table: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRow {
            table: table.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_shape_display() {
        let err = DecodeError::unexpected_shape("search org.apache.activemq:*", "list");
        assert_eq!(
            err.to_string(),
            "Unexpected payload for search org.apache.activemq:*: list was expected"
        );
    }

    #[test]
    fn test_unexpected_href_display() {
        let err = DecodeError::UnexpectedHref {
            expected_prefix: "deleteMessage.action",
            href: "message.jsp?id=1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "href does not start with \"deleteMessage.action\": message.jsp?id=1"
        );
    }

    #[test]
    fn test_missing_table_display() {
        let err = DecodeError::MissingTable {
            id: "Jobs".to_string(),
            found: 0,
        };
        assert_eq!(err.to_string(), "Expected exactly one table with id 'Jobs', found 0");
    }
}
