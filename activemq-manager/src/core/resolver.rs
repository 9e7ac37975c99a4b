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

//! Resource name resolution
//!
//! One SEARCH call expands a broker scoped pattern into the identifiers it matches. Each
//! returned object name is split into its properties and the identifying one is extracted.

use activemq_common::ObjectName;
use activemq_error::ActiveMQResult;
use activemq_error::DecodeError;
use serde_json::Value;

use crate::core::gateway::Gateway;
use crate::core::gateway::Request;
use crate::core::transport::Transport;

pub const DESTINATION_NAME: &str = "destinationName";
pub const CONNECTION_NAME: &str = "connectionName";

/// `...,destinationType=Queue,destinationName=<name>`; `name` may be `*`.
pub fn queue_object_name(broker_name: &str, name: &str) -> ObjectName {
    ObjectName::broker(broker_name)
        .with("destinationType", "Queue")
        .with(DESTINATION_NAME, name)
}

/// Client connection view keyed by remote address; `name` may be `*`.
pub fn connection_object_name(broker_name: &str, connector: &str, name: &str) -> ObjectName {
    ObjectName::broker(broker_name)
        .with("connector", "clientConnectors")
        .with("connectorName", connector)
        .with("connectionViewType", "remoteAddress")
        .with(CONNECTION_NAME, name)
}

pub fn job_scheduler_object_name(broker_name: &str) -> ObjectName {
    ObjectName::broker(broker_name)
        .with("service", "JobScheduler")
        .with("name", "JMS")
}

/// Search `pattern` and return every matching object name, in the broker's order.
pub async fn resolve_object_names<T>(gateway: &Gateway<T>, pattern: &ObjectName) -> ActiveMQResult<Vec<ObjectName>>
where
    T: Transport + Sync,
{
    let found = gateway.call_list(&Request::search(pattern)).await?;
    found
        .iter()
        .map(|value| match value {
            Value::String(name) => ObjectName::parse(name).map_err(Into::into),
            _ => Err(DecodeError::unexpected_shape(format!("search {pattern}"), "object name string").into()),
        })
        .collect()
}

/// Search `pattern` and extract the `key` property of every match.
pub async fn resolve<T>(gateway: &Gateway<T>, pattern: &ObjectName, key: &str) -> ActiveMQResult<Vec<String>>
where
    T: Transport + Sync,
{
    resolve_object_names(gateway, pattern)
        .await?
        .iter()
        .map(|name| name.require(key).map(str::to_string).map_err(Into::into))
        .collect()
}

#[cfg(test)]
mod tests {
    use activemq_error::ActiveMQError;
    use serde_json::json;

    use super::*;
    use crate::core::transport::HttpResult;

    struct SearchReply(Value);

    impl Transport for SearchReply {
        async fn post_json(&self, _url: &str, _body: &Value) -> ActiveMQResult<HttpResult> {
            Ok(HttpResult::new(200, json!({"status": 200, "value": self.0}).to_string()))
        }

        async fn get(&self, _url: &str) -> ActiveMQResult<HttpResult> {
            Ok(HttpResult::new(404, ""))
        }
    }

    fn gateway(value: Value) -> Gateway<SearchReply> {
        Gateway::new(std::sync::Arc::new(SearchReply(value)), "http://localhost:8161/api/jolokia")
    }

    #[test]
    fn object_name_patterns() {
        assert_eq!(
            queue_object_name("localhost", "*").to_string(),
            "org.apache.activemq:type=Broker,brokerName=localhost,destinationType=Queue,destinationName=*"
        );
        assert_eq!(
            connection_object_name("localhost", "openwire", "*").to_string(),
            "org.apache.activemq:type=Broker,brokerName=localhost,connector=clientConnectors,connectorName=openwire,\
             connectionViewType=remoteAddress,connectionName=*"
        );
        assert_eq!(
            job_scheduler_object_name("amq").to_string(),
            "org.apache.activemq:type=Broker,brokerName=amq,service=JobScheduler,name=JMS"
        );
    }

    #[tokio::test]
    async fn extracts_identifying_field() {
        let gateway = gateway(json!([
            "brokerName=x,type=Broker,destinationName=q1",
            "org.apache.activemq:type=Broker,brokerName=x,destinationType=Queue,destinationName=q2",
            "org.apache.activemq:type=Broker,brokerName=x,destinationType=Queue,destinationName=orders.dlq",
        ]));
        let names = resolve(&gateway, &queue_object_name("x", "*"), DESTINATION_NAME).await.unwrap();
        assert_eq!(names, vec!["q1", "q2", "orders.dlq"]);
    }

    #[tokio::test]
    async fn empty_search_is_not_an_error() {
        let names = resolve(&gateway(json!([])), &queue_object_name("x", "*"), DESTINATION_NAME)
            .await
            .unwrap();
        assert!(names.is_empty());
    }

    #[tokio::test]
    async fn missing_key_is_decode_error() {
        let gateway = gateway(json!(["org.apache.activemq:type=Broker,brokerName=x"]));
        let err = resolve(&gateway, &connection_object_name("x", "openwire", "*"), CONNECTION_NAME)
            .await
            .unwrap_err();
        assert!(matches!(err, ActiveMQError::Decode(DecodeError::MissingField { .. })));
    }

    #[tokio::test]
    async fn non_string_entry_is_decode_error() {
        let err = resolve(&gateway(json!([42])), &queue_object_name("x", "*"), DESTINATION_NAME)
            .await
            .unwrap_err();
        assert!(matches!(err, ActiveMQError::Decode(DecodeError::UnexpectedShape { .. })));
    }
}
