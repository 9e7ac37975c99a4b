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

//! Broker facade
//!
//! Composes the resolver, the fan-out engine and the resource objects into the public
//! listing and lookup operations. Listing is always one resolving call followed by a
//! bounded fan-out of per-resource reads.

use std::sync::Arc;

use activemq_common::ObjectName;
use activemq_common::TimeUtils;
use activemq_error::ActiveMQError;
use activemq_error::ActiveMQResult;
use activemq_error::DecodeError;
use activemq_error::RemoteOperationError;
use chrono::Local;
use chrono::NaiveDateTime;
use chrono::TimeDelta;
use serde_json::Map;
use serde_json::Value;

use crate::core::concurrent::FanOut;
use crate::core::concurrent::FanOutConfig;
use crate::core::concurrent::FanOutStream;
use crate::core::connection::Connection;
use crate::core::connection::ConnectionId;
use crate::core::gateway::Gateway;
use crate::core::gateway::Request;
use crate::core::job::JobRecord;
use crate::core::job::ScheduledJob;
use crate::core::queue::Queue;
use crate::core::resolver;
use crate::core::resolver::connection_object_name;
use crate::core::resolver::job_scheduler_object_name;
use crate::core::resolver::queue_object_name;
use crate::core::resolver::CONNECTION_NAME;
use crate::core::resolver::DESTINATION_NAME;
use crate::core::resource::Resource;
use crate::core::resource::ResourceKind;
use crate::core::transport::HttpTransport;
use crate::core::transport::Transport;

/// Classification used when a lookup by name matches more than one resource
pub const AMBIGUOUS_MATCH: &str = "AmbiguousResourceMatch";

pub const TRANSPORT_CONNECTORS: &str = "TransportConnectors";

const JOB_WINDOW_WEEKS: i64 = 52;

/// One broker behind a Jolokia endpoint. Cheap to clone; clones share the gateway.
pub struct Broker<T = HttpTransport> {
    gateway: Arc<Gateway<T>>,
    name: String,
    object_name: ObjectName,
    fan_out: FanOut,
}

impl<T> Clone for Broker<T> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            name: self.name.clone(),
            object_name: self.object_name.clone(),
            fan_out: self.fan_out,
        }
    }
}

impl<T> Broker<T> {
    pub fn new(gateway: Arc<Gateway<T>>, name: impl Into<String>, fan_out: FanOutConfig) -> Self {
        let name = name.into();
        Self {
            gateway,
            object_name: ObjectName::broker(name.as_str()),
            name,
            fan_out: FanOut::new(fan_out),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn object_name(&self) -> &ObjectName {
        &self.object_name
    }

    pub fn gateway(&self) -> &Gateway<T> {
        &self.gateway
    }

    pub fn fan_out_config(&self) -> &FanOutConfig {
        self.fan_out.config()
    }

    /// Same broker with a different fan-out configuration, e.g. another worker count.
    pub fn with_fan_out(mut self, config: FanOutConfig) -> Self {
        self.fan_out = FanOut::new(config);
        self
    }
}

impl<T> Broker<T>
where
    T: Transport + Sync + 'static,
{
    pub async fn attributes(&self) -> ActiveMQResult<Map<String, Value>> {
        self.gateway.call_map(&Request::read(&self.object_name)).await
    }

    pub async fn attribute(&self, attribute: &str) -> ActiveMQResult<Value> {
        self.gateway
            .call(&Request::read_attribute(&self.object_name, attribute))
            .await
    }

    // ============================================================================
    // Queues
    // ============================================================================

    pub async fn queue_names(&self) -> ActiveMQResult<Vec<String>> {
        resolver::resolve(&self.gateway, &queue_object_name(&self.name, "*"), DESTINATION_NAME).await
    }

    /// Every queue with its counters, fetched concurrently.
    pub async fn queues(&self) -> ActiveMQResult<FanOutStream<Queue<T>>> {
        let names = self.queue_names().await?;
        let broker = self.clone();
        Ok(self.fan_out.run(names, move |name| Queue::fetch(broker.clone(), name)))
    }

    /// Look a queue up by exact name.
    ///
    /// No match is `NotFound`. More than one match means the broker reported inconsistent
    /// data and is surfaced as a remote error instead of picking one.
    pub async fn queue(&self, name: &str) -> ActiveMQResult<Queue<T>> {
        let pattern = queue_object_name(&self.name, name);
        let matches = resolver::resolve(&self.gateway, &pattern, DESTINATION_NAME)
            .await?
            .into_iter()
            .filter(|found| found == name)
            .count();
        match matches {
            0 => Err(ActiveMQError::not_found("queue", name)),
            1 => Queue::fetch(self.clone(), name.to_string()).await,
            n => Err(ambiguous(&pattern, "queues", name, n)),
        }
    }

    // ============================================================================
    // Connections
    // ============================================================================

    /// Names of the client connectors (`openwire`, `stomp`, ...) the broker exposes.
    pub async fn connector_names(&self) -> ActiveMQResult<Vec<String>> {
        match self.attribute(TRANSPORT_CONNECTORS).await? {
            Value::Object(connectors) => Ok(connectors.into_iter().map(|(name, _)| name).collect()),
            _ => Err(DecodeError::unexpected_shape(format!("{TRANSPORT_CONNECTORS} of {}", self.object_name), "object").into()),
        }
    }

    /// One search per connector.
    pub async fn connection_ids(&self) -> ActiveMQResult<Vec<ConnectionId>> {
        let mut ids = Vec::new();
        for connector in self.connector_names().await? {
            let pattern = connection_object_name(&self.name, &connector, "*");
            for name in resolver::resolve(&self.gateway, &pattern, CONNECTION_NAME).await? {
                ids.push(ConnectionId::new(connector.as_str(), name));
            }
        }
        Ok(ids)
    }

    pub async fn connection_count(&self) -> ActiveMQResult<usize> {
        Ok(self.connection_ids().await?.len())
    }

    pub async fn connections(&self) -> ActiveMQResult<FanOutStream<Connection<T>>> {
        let ids = self.connection_ids().await?;
        let broker = self.clone();
        Ok(self.fan_out.run(ids, move |id| Connection::fetch(broker.clone(), id)))
    }

    pub async fn connection(&self, id: &ConnectionId) -> ActiveMQResult<Connection<T>> {
        Connection::fetch(self.clone(), id.clone()).await
    }

    // ============================================================================
    // Scheduled jobs
    // ============================================================================

    /// Jobs due between `start` (default: now) and `end` (default: `start` plus 52 weeks).
    pub async fn jobs(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> ActiveMQResult<Vec<ScheduledJob<T>>> {
        let start = start.unwrap_or_else(|| Local::now().naive_local());
        let end = end.unwrap_or(start + TimeDelta::weeks(JOB_WINDOW_WEEKS));
        let jobs = self
            .gateway
            .call_map(&Request::exec(
                job_scheduler_object_name(&self.name),
                "getAllJobs(java.lang.String,java.lang.String)",
                vec![
                    Value::from(TimeUtils::format_job_window(&start)),
                    Value::from(TimeUtils::format_job_window(&end)),
                ],
            ))
            .await?;

        jobs.into_iter()
            .map(|(_, value)| Ok(ScheduledJob::new(self.clone(), JobRecord::decode(value)?)))
            .collect()
    }

    pub async fn job_count(&self, start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> ActiveMQResult<usize> {
        Ok(self.jobs(start, end).await?.len())
    }

    pub async fn job(&self, id: &str) -> ActiveMQResult<ScheduledJob<T>> {
        self.jobs(None, None)
            .await?
            .into_iter()
            .find(|job| job.id() == id)
            .ok_or_else(|| ActiveMQError::not_found("job", id))
    }

    // ============================================================================
    // Generic facade
    // ============================================================================

    /// Identifiers of every resource of `kind`.
    pub async fn list_resources(&self, kind: ResourceKind) -> ActiveMQResult<Vec<String>> {
        match kind {
            ResourceKind::Queue => self.queue_names().await,
            ResourceKind::Connection => Ok(self.connection_ids().await?.into_iter().map(|id| id.name).collect()),
            ResourceKind::Job => Ok(self
                .jobs(None, None)
                .await?
                .iter()
                .map(|job| job.id().to_string())
                .collect()),
        }
    }

    /// Every resource of `kind`, fetched through the fan-out engine.
    pub async fn fetch_all(&self, kind: ResourceKind) -> ActiveMQResult<FanOutStream<Resource<T>>> {
        let broker = self.clone();
        let stream = match kind {
            ResourceKind::Queue => {
                let names = self.queue_names().await?;
                self.fan_out.run(names, move |name| {
                    let broker = broker.clone();
                    async move { Queue::fetch(broker, name).await.map(Resource::Queue) }
                })
            }
            ResourceKind::Connection => {
                let ids = self.connection_ids().await?;
                self.fan_out.run(ids, move |id| {
                    let broker = broker.clone();
                    async move { Connection::fetch(broker, id).await.map(Resource::Connection) }
                })
            }
            // A single call already returns every job in full.
            ResourceKind::Job => {
                let jobs = self.jobs(None, None).await?;
                self.fan_out
                    .run(jobs, |job| futures::future::ready(Ok(Resource::Job(job))))
            }
        };
        Ok(stream)
    }

    pub async fn get(&self, kind: ResourceKind, name: &str) -> ActiveMQResult<Resource<T>> {
        match kind {
            ResourceKind::Queue => self.queue(name).await.map(Resource::Queue),
            ResourceKind::Connection => {
                let mut matches: Vec<ConnectionId> = self
                    .connection_ids()
                    .await?
                    .into_iter()
                    .filter(|id| id.name == name)
                    .collect();
                match matches.len() {
                    0 => Err(ActiveMQError::not_found("connection", name)),
                    1 => {
                        let id = matches.remove(0);
                        self.connection(&id).await.map(Resource::Connection)
                    }
                    n => Err(ambiguous(
                        &connection_object_name(&self.name, "*", name),
                        "connections",
                        name,
                        n,
                    )),
                }
            }
            ResourceKind::Job => self.job(name).await.map(Resource::Job),
        }
    }
}

impl<T> std::fmt::Debug for Broker<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broker")
            .field("name", &self.name)
            .field("fan_out", self.fan_out.config())
            .finish()
    }
}

fn ambiguous(pattern: &ObjectName, what: &str, name: &str, count: usize) -> ActiveMQError {
    RemoteOperationError::new(
        "search",
        pattern.to_string(),
        200,
        AMBIGUOUS_MATCH,
        format!("{count} {what} match '{name}'"),
    )
    .into()
}
