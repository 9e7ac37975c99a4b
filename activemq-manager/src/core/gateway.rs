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

//! Remote call gateway
//!
//! Turns one logical management call (`read`, `search` or `exec`) into one Jolokia POST and
//! classifies the reply:
//!
//! - `{"status": 200, "value": ..}` is a success and yields `value`
//! - any other structured status becomes a [`RemoteOperationError`]
//! - a non-2xx HTTP reply without a structured body becomes a [`TransportError`]
//! - a body that cannot be decoded at all becomes a [`DecodeError`]
//!
//! Nothing is retried here.

use std::fmt;
use std::sync::Arc;

use activemq_error::ActiveMQResult;
use activemq_error::DecodeError;
use activemq_error::RemoteOperationError;
use activemq_error::TransportError;
use serde::de::DeserializeOwned;
use serde_json::json;
use serde_json::Map;
use serde_json::Value;
use tracing::debug;

use crate::core::transport::HttpTransport;
use crate::core::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Read,
    Search,
    Exec,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Read => "read",
            Operation::Search => "search",
            Operation::Exec => "exec",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One management call
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    operation: Operation,
    mbean: String,
    attribute: Option<Value>,
    signature: Option<String>,
    arguments: Vec<Value>,
}

impl Request {
    /// Read every attribute of an MBean.
    pub fn read(mbean: impl ToString) -> Self {
        Self::new(Operation::Read, mbean)
    }

    pub fn read_attribute(mbean: impl ToString, attribute: &str) -> Self {
        let mut request = Self::new(Operation::Read, mbean);
        request.attribute = Some(Value::from(attribute));
        request
    }

    /// Read a fixed set of attributes; the reply value is an object keyed by attribute name.
    pub fn read_attributes(mbean: impl ToString, attributes: &[&str]) -> Self {
        let mut request = Self::new(Operation::Read, mbean);
        request.attribute = Some(Value::from(attributes.to_vec()));
        request
    }

    /// Search object names matching a pattern such as `org.apache.activemq:type=Broker,*`.
    pub fn search(pattern: impl ToString) -> Self {
        Self::new(Operation::Search, pattern)
    }

    /// Invoke an operation. `signature` is either a bare name or a full Java signature like
    /// `removeQueue(java.lang.String)`.
    pub fn exec(mbean: impl ToString, signature: &str, arguments: Vec<Value>) -> Self {
        let mut request = Self::new(Operation::Exec, mbean);
        request.signature = Some(signature.to_string());
        request.arguments = arguments;
        request
    }

    fn new(operation: Operation, mbean: impl ToString) -> Self {
        Self {
            operation,
            mbean: mbean.to_string(),
            attribute: None,
            signature: None,
            arguments: Vec::new(),
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn mbean(&self) -> &str {
        &self.mbean
    }

    /// Jolokia request body
    pub fn to_body(&self) -> Value {
        let mut body = json!({
            "type": self.operation.as_str(),
            "mbean": self.mbean,
        });
        if let Some(attribute) = &self.attribute {
            body["attribute"] = attribute.clone();
        }
        if let Some(signature) = &self.signature {
            body["operation"] = Value::from(signature.as_str());
            body["arguments"] = Value::from(self.arguments.clone());
        }
        body
    }

    fn context(&self) -> String {
        format!("{} {}", self.operation, self.mbean)
    }
}

/// Issues [`Request`]s against one Jolokia endpoint through a shared transport.
#[derive(Debug)]
pub struct Gateway<T = HttpTransport> {
    transport: Arc<T>,
    url: String,
}

impl<T> Gateway<T> {
    pub fn new(transport: Arc<T>, url: impl Into<String>) -> Self {
        Self {
            transport,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }
}

impl<T> Gateway<T>
where
    T: Transport + Sync,
{
    /// Perform the call and return the raw `value` of a successful reply.
    pub async fn call(&self, request: &Request) -> ActiveMQResult<Value> {
        let body = request.to_body();
        debug!("jolokia request to {}: {}", self.url, body);
        let reply = self.transport.post_json(&self.url, &body).await?;

        let mut object = match serde_json::from_str::<Value>(&reply.content) {
            Ok(Value::Object(object)) if object.contains_key("status") => object,
            _ if !reply.is_success() => {
                return Err(TransportError::http_status(&self.url, reply.code).into());
            }
            Ok(_) => {
                return Err(
                    DecodeError::unexpected_shape(format!("reply to {}", request.context()), "object with status").into(),
                );
            }
            Err(e) => {
                return Err(DecodeError::invalid_payload(format!("reply to {}", request.context()), e.to_string()).into());
            }
        };

        let Some(status) = object.get("status").and_then(Value::as_u64) else {
            return Err(
                DecodeError::unexpected_shape(format!("reply to {}", request.context()), "integer status").into(),
            );
        };
        if status == 200 {
            return Ok(object.remove("value").unwrap_or(Value::Null));
        }

        let text = |key: &str| {
            object
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string()
        };
        Err(RemoteOperationError::new(
            request.operation.as_str(),
            request.mbean.as_str(),
            u16::try_from(status).unwrap_or(u16::MAX),
            text("error_type"),
            text("error"),
        )
        .into())
    }

    /// Like [`call`](Self::call) but the value must be a JSON object.
    pub async fn call_map(&self, request: &Request) -> ActiveMQResult<Map<String, Value>> {
        match self.call(request).await? {
            Value::Object(map) => Ok(map),
            _ => Err(DecodeError::unexpected_shape(request.context(), "object").into()),
        }
    }

    /// Like [`call`](Self::call) but the value must be a JSON array.
    pub async fn call_list(&self, request: &Request) -> ActiveMQResult<Vec<Value>> {
        match self.call(request).await? {
            Value::Array(list) => Ok(list),
            _ => Err(DecodeError::unexpected_shape(request.context(), "list").into()),
        }
    }

    /// Like [`call`](Self::call) but the value must be a non-negative integer, such as the
    /// count returned by a bulk operation.
    pub async fn call_count(&self, request: &Request) -> ActiveMQResult<u64> {
        let value = self.call(request).await?;
        value
            .as_u64()
            .ok_or_else(|| DecodeError::unexpected_shape(request.context(), "integer").into())
    }

    /// Decode the value into a typed record.
    pub async fn call_as<R>(&self, request: &Request) -> ActiveMQResult<R>
    where
        R: DeserializeOwned,
    {
        let value = self.call(request).await?;
        serde_json::from_value(value)
            .map_err(|e| DecodeError::invalid_payload(request.context(), e.to_string()).into())
    }
}
