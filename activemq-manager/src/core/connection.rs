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

use std::fmt;

use activemq_common::ObjectName;
use activemq_error::ActiveMQError;
use activemq_error::ActiveMQResult;
use serde::Deserialize;
use serde::Serialize;

use crate::core::broker::Broker;
use crate::core::gateway::Request;
use crate::core::resolver::connection_object_name;
use crate::core::transport::HttpTransport;
use crate::core::transport::Transport;

// `Consumers` and `Producers` are left out; they can be very large.
pub const CONNECTION_ATTRIBUTES: &[&str] = &[
    "Active",
    "ActiveTransactionCount",
    "Blocked",
    "ClientId",
    "Connected",
    "DispatchQueueSize",
    "OldestActiveTransactionDuration",
    "RemoteAddress",
    "Slow",
    "UserName",
];

/// A client connection is identified by its connector and its remote address name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId {
    pub connector: String,
    pub name: String,
}

impl ConnectionId {
    pub fn new(connector: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            connector: connector.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.connector, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionAttributes {
    #[serde(rename = "Active")]
    pub active: bool,
    #[serde(rename = "ActiveTransactionCount")]
    pub active_transaction_count: i64,
    #[serde(rename = "Blocked")]
    pub blocked: bool,
    #[serde(rename = "ClientId")]
    pub client_id: Option<String>,
    #[serde(rename = "Connected")]
    pub connected: bool,
    #[serde(rename = "DispatchQueueSize")]
    pub dispatch_queue_size: i64,
    #[serde(rename = "OldestActiveTransactionDuration")]
    pub oldest_active_transaction_duration: Option<i64>,
    #[serde(rename = "RemoteAddress")]
    pub remote_address: String,
    #[serde(rename = "Slow")]
    pub slow: bool,
    #[serde(rename = "UserName")]
    pub user_name: Option<String>,
}

pub struct Connection<T = HttpTransport> {
    broker: Broker<T>,
    id: ConnectionId,
    object_name: ObjectName,
    attributes: ConnectionAttributes,
}

impl<T> Connection<T> {
    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.id.name
    }

    pub fn connector(&self) -> &str {
        &self.id.connector
    }

    pub fn attributes(&self) -> &ConnectionAttributes {
        &self.attributes
    }

    pub fn client_id(&self) -> Option<&str> {
        self.attributes.client_id.as_deref()
    }

    pub fn remote_address(&self) -> &str {
        &self.attributes.remote_address
    }

    pub fn active(&self) -> bool {
        self.attributes.active
    }

    pub fn slow(&self) -> bool {
        self.attributes.slow
    }

    pub fn blocked(&self) -> bool {
        self.attributes.blocked
    }

    pub fn connected(&self) -> bool {
        self.attributes.connected
    }

    pub fn user_name(&self) -> Option<&str> {
        self.attributes.user_name.as_deref()
    }
}

impl<T> Connection<T>
where
    T: Transport + Sync + 'static,
{
    pub(crate) async fn fetch(broker: Broker<T>, id: ConnectionId) -> ActiveMQResult<Self> {
        let object_name = connection_object_name(broker.name(), &id.connector, &id.name);
        let attributes = read_attributes(&broker, &object_name, &id).await?;
        Ok(Self {
            broker,
            id,
            object_name,
            attributes,
        })
    }

    pub async fn refresh(&mut self) -> ActiveMQResult<()> {
        self.attributes = read_attributes(&self.broker, &self.object_name, &self.id).await?;
        Ok(())
    }
}

impl<T> fmt::Debug for Connection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("attributes", &self.attributes)
            .finish()
    }
}

async fn read_attributes<T>(
    broker: &Broker<T>,
    object_name: &ObjectName,
    id: &ConnectionId,
) -> ActiveMQResult<ConnectionAttributes>
where
    T: Transport + Sync + 'static,
{
    broker
        .gateway()
        .call_as(&Request::read_attributes(object_name, CONNECTION_ATTRIBUTES))
        .await
        .map_err(|e| {
            if e.is_instance_not_found() {
                ActiveMQError::not_found("connection", id.to_string())
            } else {
                e
            }
        })
}
