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

//! Client builder and facade
//!
//! - [`ClientBuilder`] - Fluent builder over [`ManagerConfig`]
//! - [`Client`] - Owns the transport and hands out [`Broker`] and [`Console`] views over it
//!
//! The transport is opened when the client is built and released when the last client,
//! broker, resource object, or console referencing it is dropped.

use std::path::Path;
use std::sync::Arc;

use activemq_error::ActiveMQResult;

use crate::console::Console;
use crate::core::broker::Broker;
use crate::core::concurrent::FailurePolicy;
use crate::core::concurrent::FanOutStream;
use crate::core::config::ManagerConfig;
use crate::core::gateway::Gateway;
use crate::core::resource::Resource;
use crate::core::resource::ResourceKind;
use crate::core::transport::HttpOptions;
use crate::core::transport::HttpTransport;
use crate::core::transport::Transport;

/// Builder for creating and configuring clients
///
/// # Examples
///
/// ```rust,ignore
/// use activemq_manager::core::admin::ClientBuilder;
///
/// let client = ClientBuilder::new()
///     .endpoint("http://broker-1:8161")
///     .credentials("admin", "admin")
///     .workers(16)
///     .build()?;
///
/// let queues = client.broker().queues().await?.collect_all().await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    config: Option<ManagerConfig>,
    endpoint: Option<String>,
    origin: Option<String>,
    jolokia_path: Option<String>,
    console_path: Option<String>,
    broker_name: Option<String>,
    username: Option<String>,
    password: Option<String>,
    request_timeout_ms: Option<u64>,
    workers: Option<usize>,
    failure_policy: Option<FailurePolicy>,
    fan_out_deadline_ms: Option<u64>,
}

impl ClientBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a loaded configuration; setters called afterwards override its values.
    #[inline]
    pub fn from_config(config: ManagerConfig) -> Self {
        Self {
            config: Some(config),
            ..Self::default()
        }
    }

    /// Load the configuration from `path` and the `ACTIVEMQ_*` environment.
    pub fn from_file(path: Option<&Path>) -> ActiveMQResult<Self> {
        Ok(Self::from_config(ManagerConfig::load(path)?))
    }

    /// Base URL of the web console, e.g. `http://localhost:8161`
    #[inline]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    #[inline]
    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    #[inline]
    pub fn jolokia_path(mut self, path: impl Into<String>) -> Self {
        self.jolokia_path = Some(path.into());
        self
    }

    #[inline]
    pub fn console_path(mut self, path: impl Into<String>) -> Self {
        self.console_path = Some(path.into());
        self
    }

    #[inline]
    pub fn broker_name(mut self, name: impl Into<String>) -> Self {
        self.broker_name = Some(name.into());
        self
    }

    /// Basic auth credentials
    #[inline]
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Per-request timeout in milliseconds
    #[inline]
    pub fn request_timeout_ms(mut self, timeout: u64) -> Self {
        self.request_timeout_ms = Some(timeout);
        self
    }

    /// Maximum number of concurrent fetches per listing
    #[inline]
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    #[inline]
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = Some(policy);
        self
    }

    /// Abort any listing still running after `deadline` milliseconds
    #[inline]
    pub fn fan_out_deadline_ms(mut self, deadline: u64) -> Self {
        self.fan_out_deadline_ms = Some(deadline);
        self
    }

    /// Merge the overrides into the base configuration and validate the result.
    pub fn config(self) -> ActiveMQResult<ManagerConfig> {
        let mut config = self.config.unwrap_or_default();
        if let Some(endpoint) = self.endpoint {
            config.endpoint = endpoint;
        }
        if let Some(origin) = self.origin {
            config.origin = origin;
        }
        if let Some(path) = self.jolokia_path {
            config.jolokia_path = path;
        }
        if let Some(path) = self.console_path {
            config.console_path = path;
        }
        if let Some(name) = self.broker_name {
            config.broker_name = name;
        }
        if self.username.is_some() {
            config.username = self.username;
            config.password = self.password;
        }
        if let Some(timeout) = self.request_timeout_ms {
            config.request_timeout_ms = timeout;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(policy) = self.failure_policy {
            config.failure_policy = policy;
        }
        if self.fan_out_deadline_ms.is_some() {
            config.fan_out_deadline_ms = self.fan_out_deadline_ms;
        }
        config.validate()?;
        Ok(config)
    }

    /// Build a client over a reqwest transport.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - A configuration value is invalid
    /// - The HTTP client cannot be created
    pub fn build(self) -> ActiveMQResult<Client> {
        let config = self.config()?;
        let transport = HttpTransport::new(HttpOptions {
            origin: Some(config.origin.clone()),
            username: config.username.clone(),
            password: config.password.clone(),
            timeout_millis: config.request_timeout_ms,
        })?;
        Ok(Client::new(config, transport))
    }

    /// Build a client over a caller-supplied transport.
    pub fn build_with_transport<T>(self, transport: T) -> ActiveMQResult<Client<T>> {
        Ok(Client::new(self.config()?, transport))
    }
}

/// Entry point of the library. Cloning shares the transport.
pub struct Client<T = HttpTransport> {
    config: Arc<ManagerConfig>,
    transport: Arc<T>,
    gateway: Arc<Gateway<T>>,
}

impl<T> Clone for Client<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            transport: self.transport.clone(),
            gateway: self.gateway.clone(),
        }
    }
}

impl<T> Client<T> {
    fn new(config: ManagerConfig, transport: T) -> Self {
        let transport = Arc::new(transport);
        let gateway = Arc::new(Gateway::new(transport.clone(), config.jolokia_url()));
        Self {
            config: Arc::new(config),
            transport,
            gateway,
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// The configured broker.
    pub fn broker(&self) -> Broker<T> {
        self.broker_named(&self.config.broker_name)
    }

    /// Another broker reachable through the same Jolokia endpoint.
    pub fn broker_named(&self, name: &str) -> Broker<T> {
        Broker::new(self.gateway.clone(), name, self.config.fan_out_config())
    }

    /// The HTML admin console of the same endpoint.
    pub fn console(&self) -> Console<T> {
        Console::new(self.transport.clone(), self.config.console_url())
    }
}

impl<T> Client<T>
where
    T: Transport + Sync + 'static,
{
    pub async fn list_resources(&self, kind: ResourceKind) -> ActiveMQResult<Vec<String>> {
        self.broker().list_resources(kind).await
    }

    pub async fn fetch_all(&self, kind: ResourceKind) -> ActiveMQResult<FanOutStream<Resource<T>>> {
        self.broker().fetch_all(kind).await
    }

    pub async fn get(&self, kind: ResourceKind, name: &str) -> ActiveMQResult<Resource<T>> {
        self.broker().get(kind, name).await
    }
}

impl<T> std::fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").field("config", &self.config).finish()
    }
}
