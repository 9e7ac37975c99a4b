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

use activemq_common::ObjectName;
use activemq_error::ActiveMQError;
use activemq_error::ActiveMQResult;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use tracing::info;
use tracing::warn;

use crate::core::broker::Broker;
use crate::core::gateway::Request;
use crate::core::message::Message;
use crate::core::message::MessageAttributes;
use crate::core::resolver::queue_object_name;
use crate::core::transport::HttpTransport;
use crate::core::transport::Transport;

pub const QUEUE_ATTRIBUTES: &[&str] = &[
    "QueueSize",
    "EnqueueCount",
    "DequeueCount",
    "ConsumerCount",
    "ProducerCount",
];

/// Snapshot of the queue counters, replaced wholesale on every refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueAttributes {
    #[serde(rename = "QueueSize")]
    pub queue_size: u64,
    #[serde(rename = "EnqueueCount")]
    pub enqueue_count: u64,
    #[serde(rename = "DequeueCount")]
    pub dequeue_count: u64,
    #[serde(rename = "ConsumerCount")]
    pub consumer_count: u64,
    #[serde(rename = "ProducerCount")]
    pub producer_count: u64,
}

/// A queue of one broker with its last fetched counters
pub struct Queue<T = HttpTransport> {
    broker: Broker<T>,
    name: String,
    object_name: ObjectName,
    attributes: QueueAttributes,
}

impl<T> Queue<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn object_name(&self) -> &ObjectName {
        &self.object_name
    }

    pub fn attributes(&self) -> &QueueAttributes {
        &self.attributes
    }

    /// Messages currently pending
    pub fn size(&self) -> u64 {
        self.attributes.queue_size
    }

    pub fn enqueue_count(&self) -> u64 {
        self.attributes.enqueue_count
    }

    pub fn dequeue_count(&self) -> u64 {
        self.attributes.dequeue_count
    }

    pub fn consumer_count(&self) -> u64 {
        self.attributes.consumer_count
    }

    pub fn producer_count(&self) -> u64 {
        self.attributes.producer_count
    }
}

impl<T> Queue<T>
where
    T: Transport + Sync + 'static,
{
    /// Read the counters of `name`. A queue the broker does not know is `NotFound`.
    pub(crate) async fn fetch(broker: Broker<T>, name: String) -> ActiveMQResult<Self> {
        let object_name = queue_object_name(broker.name(), &name);
        let attributes = read_attributes(&broker, &object_name, &name).await?;
        Ok(Self {
            broker,
            name,
            object_name,
            attributes,
        })
    }

    pub async fn refresh(&mut self) -> ActiveMQResult<()> {
        self.attributes = read_attributes(&self.broker, &self.object_name, &self.name).await?;
        Ok(())
    }

    /// Remove every pending message. The cached counters are left untouched.
    pub async fn purge(&self) -> ActiveMQResult<()> {
        info!("purge queue {}", self.name);
        self.broker
            .gateway()
            .call(&Request::exec(&self.object_name, "purge", Vec::new()))
            .await?;
        Ok(())
    }

    pub async fn delete(&self) -> ActiveMQResult<()> {
        info!("delete queue {}", self.name);
        self.broker
            .gateway()
            .call(&Request::exec(
                self.broker.object_name(),
                "removeQueue(java.lang.String)",
                vec![Value::from(self.name.as_str())],
            ))
            .await?;
        Ok(())
    }

    /// Browse the queue, optionally narrowed by a JMS selector.
    ///
    /// The broker caps how many messages one browse returns, so the queue is refreshed
    /// afterwards. An unfiltered browse that returned fewer messages than the queue holds
    /// logs a warning.
    pub async fn messages(&mut self, selector: Option<&str>) -> ActiveMQResult<Vec<Message<T>>> {
        let request = match selector {
            Some(selector) => Request::exec(
                &self.object_name,
                "browseAsTable(java.lang.String)",
                vec![Value::from(selector)],
            ),
            None => Request::exec(&self.object_name, "browseAsTable()", Vec::new()),
        };
        let table: Map<String, Value> = self.broker.gateway().call_map(&request).await?;

        let messages = table
            .into_iter()
            .map(|(id, value)| {
                let attributes = MessageAttributes::decode(&id, value)?;
                Ok(Message::new(self.broker.clone(), self.name.clone(), attributes))
            })
            .collect::<ActiveMQResult<Vec<_>>>()?;

        self.refresh().await?;
        if browse_truncated(selector, self.size(), messages.len()) {
            warn!(
                "queue size is greater than the returned number of messages [queue={}, size={}, messages={}]; use a \
                 selector to reduce the total number of messages",
                self.name,
                self.size(),
                messages.len()
            );
        }
        Ok(messages)
    }

    /// Browse a single message by its `JMSMessageID`.
    pub async fn message(&mut self, id: &str) -> ActiveMQResult<Message<T>> {
        let selector = format!("JMSMessageID = '{id}'");
        self.messages(Some(&selector))
            .await?
            .into_iter()
            .find(|message| message.id() == id)
            .ok_or_else(|| ActiveMQError::not_found("message", id))
    }

    /// Move every message of a dead letter queue back to its original destination.
    pub async fn retry_messages(&self) -> ActiveMQResult<u64> {
        info!("retry messages of queue {}", self.name);
        self.broker
            .gateway()
            .call_count(&Request::exec(&self.object_name, "retryMessages()", Vec::new()))
            .await
    }

    /// Move messages matching `selector` to `target`, returning how many moved.
    pub async fn move_matching(&self, selector: &str, target: &str) -> ActiveMQResult<u64> {
        info!("move messages matching [{selector}] from {} to {target}", self.name);
        self.broker
            .gateway()
            .call_count(&Request::exec(
                &self.object_name,
                "moveMatchingMessagesTo(java.lang.String,java.lang.String)",
                vec![Value::from(selector), Value::from(target)],
            ))
            .await
    }
}

impl<T> std::fmt::Debug for Queue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Queue")
            .field("name", &self.name)
            .field("attributes", &self.attributes)
            .finish()
    }
}

async fn read_attributes<T>(broker: &Broker<T>, object_name: &ObjectName, name: &str) -> ActiveMQResult<QueueAttributes>
where
    T: Transport + Sync + 'static,
{
    broker
        .gateway()
        .call_as(&Request::read_attributes(object_name, QUEUE_ATTRIBUTES))
        .await
        .map_err(|e| {
            if e.is_instance_not_found() {
                ActiveMQError::not_found("queue", name)
            } else {
                e
            }
        })
}

/// A selector narrows the result on purpose; only a full browse can come back short.
fn browse_truncated(selector: Option<&str>, queue_size: u64, returned: usize) -> bool {
    selector.is_none() && queue_size > returned as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_only_for_full_browse() {
        assert!(browse_truncated(None, 500, 400));
        assert!(!browse_truncated(None, 400, 400));
        assert!(!browse_truncated(Some("JMSMessageID = 'ID:1'"), 500, 1));
    }

    #[test]
    fn decode_counters() {
        let attributes: QueueAttributes = serde_json::from_value(serde_json::json!({
            "QueueSize": 3,
            "EnqueueCount": 13,
            "DequeueCount": 10,
            "ConsumerCount": 1,
            "ProducerCount": 0,
        }))
        .unwrap();
        assert_eq!(attributes.queue_size, 3);
        assert_eq!(attributes.enqueue_count, 13);
    }
}
