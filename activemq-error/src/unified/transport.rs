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

//! Transport-level errors for management HTTP calls

use thiserror::Error;

/// HTTP round trip failures. None of these are retried by the manager.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection to the endpoint failed
    #[error("Connection failed to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    /// The request did not complete in time
    #[error("Request timeout to {url} after {timeout_ms}ms")]
    RequestTimeout { url: String, timeout_ms: u64 },

    /// Non-2xx status without a structured body
    #[error("Unexpected HTTP status {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    /// Any other failure while sending or reading the response
    #[error("Request to {url} failed: {reason}")]
    RequestFailed { url: String, reason: String },

    /// The endpoint could not be turned into a request URL
    #[error("Invalid endpoint url: {url}")]
    InvalidUrl { url: String },
}

impl TransportError {
    /// Create a connection failed error
    #[inline]
    pub fn connection_failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConnectionFailed {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a request timeout error
    #[inline]
    pub fn request_timeout(url: impl Into<String>, timeout_ms: u64) -> Self {
        Self::RequestTimeout {
            url: url.into(),
            timeout_ms,
        }
    }

    /// Create an HTTP status error
    #[inline]
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus { url: url.into(), status }
    }

    /// Create a generic request failure
    #[inline]
    pub fn request_failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::RequestFailed {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Get the URL the failed request targeted
    pub fn url(&self) -> &str {
        match self {
            Self::ConnectionFailed { url, .. }
            | Self::RequestTimeout { url, .. }
            | Self::HttpStatus { url, .. }
            | Self::RequestFailed { url, .. }
            | Self::InvalidUrl { url } => url,
        }
    }
}
