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

use std::collections::BTreeMap;

use activemq_common::ByteArray;
use activemq_common::TimeUtils;
use activemq_error::ActiveMQResult;
use activemq_error::DecodeError;
use activemq_error::RemoteOperationError;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use tracing::info;

use crate::core::broker::Broker;
use crate::core::gateway::Request;
use crate::core::resolver::queue_object_name;
use crate::core::transport::HttpTransport;
use crate::core::transport::Transport;

/// Classification used when a message id selector does not match exactly one message
pub const UNEXPECTED_MESSAGE_COUNT: &str = "UnexpectedMessageCount";

const PERSISTENT: &str = "PERSISTENT";

/// `JMSTimestamp` as rendered by Jolokia: an ISO-8601 string, or epoch millis on some brokers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JmsTimestamp {
    Millis(i64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAttributes {
    #[serde(rename = "JMSMessageID")]
    pub message_id: String,
    #[serde(rename = "JMSTimestamp", default)]
    pub timestamp: Option<JmsTimestamp>,
    #[serde(rename = "JMSDeliveryMode", default)]
    pub delivery_mode: Option<String>,
    #[serde(rename = "JMSPriority", default)]
    pub priority: Option<i32>,
    #[serde(rename = "JMSRedelivered", default)]
    pub redelivered: bool,
    #[serde(rename = "StringProperties", default)]
    pub string_properties: BTreeMap<String, String>,
}

impl MessageAttributes {
    /// Decode one row of a `browseAsTable` reply keyed by `id`.
    pub(crate) fn decode(id: &str, value: Value) -> Result<Self, DecodeError> {
        serde_json::from_value(value).map_err(|e| DecodeError::invalid_payload(format!("message {id}"), e.to_string()))
    }
}

/// A message browsed from a queue
pub struct Message<T = HttpTransport> {
    broker: Broker<T>,
    queue: String,
    attributes: MessageAttributes,
}

impl<T> Message<T> {
    pub(crate) fn new(broker: Broker<T>, queue: String, attributes: MessageAttributes) -> Self {
        Self {
            broker,
            queue,
            attributes,
        }
    }

    pub fn id(&self) -> &str {
        &self.attributes.message_id
    }

    pub fn queue_name(&self) -> &str {
        &self.queue
    }

    pub fn attributes(&self) -> &MessageAttributes {
        &self.attributes
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        match self.attributes.timestamp.as_ref()? {
            JmsTimestamp::Millis(millis) => DateTime::from_timestamp_millis(*millis),
            JmsTimestamp::Text(text) => TimeUtils::parse_rfc3339(text).map(|ts| ts.with_timezone(&Utc)),
        }
    }

    pub fn persistent(&self) -> bool {
        self.attributes.delivery_mode.as_deref() == Some(PERSISTENT)
    }

    pub fn priority(&self) -> Option<i32> {
        self.attributes.priority
    }

    pub fn redelivered(&self) -> bool {
        self.attributes.redelivered
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.attributes.string_properties
    }
}

impl<T> Message<T>
where
    T: Transport + Sync + 'static,
{
    fn selector(&self) -> String {
        format!("JMSMessageID = '{}'", self.id())
    }

    /// Full message as returned by `browseMessages`, including its body.
    pub async fn data(&self) -> ActiveMQResult<Map<String, Value>> {
        let object_name = queue_object_name(self.broker.name(), &self.queue);
        let mut found = self
            .broker
            .gateway()
            .call_list(&Request::exec(
                &object_name,
                "browseMessages(java.lang.String)",
                vec![Value::from(self.selector())],
            ))
            .await?;

        if found.len() != 1 {
            return Err(RemoteOperationError::new(
                "exec",
                object_name.to_string(),
                200,
                UNEXPECTED_MESSAGE_COUNT,
                format!("only one message should have been returned for {} [count={}]", self.id(), found.len()),
            )
            .into());
        }
        match found.pop() {
            Some(Value::Object(data)) => Ok(data),
            _ => Err(DecodeError::unexpected_shape(format!("message {}", self.id()), "object").into()),
        }
    }

    /// Text body, taken from `text` for text messages or decoded from the `content` bytes.
    pub async fn text(&self) -> ActiveMQResult<String> {
        let data = self.data().await?;
        if let Some(text) = data.get("text").and_then(Value::as_str) {
            return Ok(text.to_string());
        }
        match data.get("content") {
            Some(content) => Ok(ByteArray::from_value(content)?.decode_text()),
            None => Err(DecodeError::missing_field("text", format!("message {}", self.id())).into()),
        }
    }

    pub async fn delete(&self) -> ActiveMQResult<()> {
        info!("delete message from {}: {}", self.queue, self.id());
        self.exec("removeMessage(java.lang.String)", vec![Value::from(self.id())])
            .await
    }

    /// Send a dead-lettered message back to its original destination.
    pub async fn retry(&self) -> ActiveMQResult<()> {
        info!("retrying message from {}: {}", self.queue, self.id());
        self.exec("retryMessage(java.lang.String)", vec![Value::from(self.id())])
            .await
    }

    pub async fn move_to(&self, target: &str) -> ActiveMQResult<()> {
        info!("moving message from {} to {target}: {}", self.queue, self.id());
        self.exec(
            "moveMessageTo(java.lang.String,java.lang.String)",
            vec![Value::from(self.id()), Value::from(target)],
        )
        .await
    }

    async fn exec(&self, signature: &str, arguments: Vec<Value>) -> ActiveMQResult<()> {
        let object_name = queue_object_name(self.broker.name(), &self.queue);
        self.broker
            .gateway()
            .call(&Request::exec(&object_name, signature, arguments))
            .await?;
        Ok(())
    }
}

impl<T> std::fmt::Debug for Message<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Message")
            .field("queue", &self.queue)
            .field("id", &self.attributes.message_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decode_browse_row() {
        let attributes = MessageAttributes::decode(
            "ID:host-1:1:1:1",
            json!({
                "JMSMessageID": "ID:host-1:1:1:1",
                "JMSTimestamp": "2019-03-15T10:43:06+02:00",
                "JMSDeliveryMode": "PERSISTENT",
                "JMSPriority": 4,
                "JMSRedelivered": false,
                "StringProperties": {"origin": "pytest"},
                "JMSType": "",
            }),
        )
        .unwrap();
        assert_eq!(attributes.message_id, "ID:host-1:1:1:1");
        assert_eq!(attributes.priority, Some(4));
        assert_eq!(attributes.string_properties["origin"], "pytest");
        assert_eq!(
            attributes.timestamp,
            Some(JmsTimestamp::Text("2019-03-15T10:43:06+02:00".to_string()))
        );
    }

    #[test]
    fn decode_rejects_missing_id() {
        let err = MessageAttributes::decode("x", json!({"JMSPriority": 4})).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidPayload { .. }));
    }

    #[test]
    fn millis_timestamp() {
        let attributes = MessageAttributes::decode(
            "x",
            json!({"JMSMessageID": "x", "JMSTimestamp": 1_552_639_386_000i64}),
        )
        .unwrap();
        assert_eq!(attributes.timestamp, Some(JmsTimestamp::Millis(1_552_639_386_000)));
        assert!(attributes.string_properties.is_empty());
    }
}
