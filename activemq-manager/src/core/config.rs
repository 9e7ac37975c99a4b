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

//! Manager configuration
//!
//! Loaded from an optional TOML/YAML/JSON file with `ACTIVEMQ_*` environment overrides, e.g.
//!
//! ```toml
//! endpoint = "http://broker-1:8161"
//! broker_name = "amq-1"
//! username = "admin"
//! password = "admin"
//! workers = 16
//! failure_policy = "best_effort"
//! ```

use std::path::Path;
use std::time::Duration;

use activemq_common::ParseConfigFile;
use activemq_error::ActiveMQError;
use activemq_error::ActiveMQResult;
use serde::Deserialize;
use serde::Serialize;
use url::Url;

use crate::core::concurrent::FailurePolicy;
use crate::core::concurrent::FanOutConfig;
use crate::core::concurrent::DEFAULT_WORKERS;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8161";
pub const DEFAULT_ORIGIN: &str = "http://localhost:80";
pub const DEFAULT_JOLOKIA_PATH: &str = "/api/jolokia";
pub const DEFAULT_CONSOLE_PATH: &str = "/admin";
pub const DEFAULT_BROKER_NAME: &str = "localhost";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Base URL of the broker web console, without a trailing path
    pub endpoint: String,
    /// Value of the `Origin` header Jolokia checks against its CORS policy
    pub origin: String,
    pub jolokia_path: String,
    pub console_path: String,
    pub broker_name: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub request_timeout_ms: u64,
    pub workers: usize,
    pub failure_policy: FailurePolicy,
    pub fan_out_deadline_ms: Option<u64>,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            jolokia_path: DEFAULT_JOLOKIA_PATH.to_string(),
            console_path: DEFAULT_CONSOLE_PATH.to_string(),
            broker_name: DEFAULT_BROKER_NAME.to_string(),
            username: None,
            password: None,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            workers: DEFAULT_WORKERS,
            failure_policy: FailurePolicy::FailFast,
            fan_out_deadline_ms: None,
        }
    }
}

impl ManagerConfig {
    /// Load from `path` (if any) layered under `ACTIVEMQ_*` environment variables, then validate.
    pub fn load(path: Option<&Path>) -> ActiveMQResult<Self> {
        let config: ManagerConfig = ParseConfigFile::parse_config(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ActiveMQResult<()> {
        if self.workers == 0 {
            return Err(ActiveMQError::config_invalid("workers", "must be at least 1"));
        }
        let endpoint = Url::parse(&self.endpoint)
            .map_err(|e| ActiveMQError::config_invalid("endpoint", format!("{}: {e}", self.endpoint)))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ActiveMQError::config_invalid(
                "endpoint",
                format!("unsupported scheme '{}'", endpoint.scheme()),
            ));
        }
        if self.broker_name.trim().is_empty() {
            return Err(ActiveMQError::config_invalid("broker_name", "must not be empty"));
        }
        if self.request_timeout_ms == 0 {
            return Err(ActiveMQError::config_invalid("request_timeout_ms", "must be positive"));
        }
        if self.password.is_some() && self.username.is_none() {
            return Err(ActiveMQError::config_invalid("password", "set without a username"));
        }
        Ok(())
    }

    pub fn jolokia_url(&self) -> String {
        join_url(&self.endpoint, &self.jolokia_path)
    }

    pub fn console_url(&self) -> String {
        join_url(&self.endpoint, &self.console_path)
    }

    pub fn fan_out_config(&self) -> FanOutConfig {
        FanOutConfig {
            workers: self.workers,
            policy: self.failure_policy,
            deadline: self.fan_out_deadline_ms.map(Duration::from_millis),
        }
    }
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{path}")
    }
}
