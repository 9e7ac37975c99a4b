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

//! In-memory broker answering Jolokia calls
//!
//! Shared by the integration tests. Queue, connection and job state lives behind a mutex;
//! every call can be slowed down so concurrency bounds become observable.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use activemq_common::ObjectName;
use activemq_manager::core::admin::Client;
use activemq_manager::core::admin::ClientBuilder;
use activemq_manager::core::transport::HttpResult;
use activemq_manager::core::transport::Transport;
use activemq_manager::core::ActiveMQResult;
use serde_json::json;
use serde_json::Map;
use serde_json::Value;

pub const BROKER_NAME: &str = "localhost";
pub const INSTANCE_NOT_FOUND: &str = "javax.management.InstanceNotFoundException";

#[derive(Debug, Default)]
struct State {
    queues: BTreeMap<String, u64>,
    messages: BTreeMap<String, Vec<(String, String)>>,
    connectors: Vec<String>,
    connections: Vec<(String, String)>,
    jobs: Vec<Value>,
    /// Queue names a search reports twice
    duplicated: BTreeSet<String>,
    /// Queue names whose reads fail with a broker error
    failing: BTreeSet<String>,
    /// Bulk operations reply with a string instead of a count
    garbage_counts: bool,
}

#[derive(Debug, Default)]
pub struct FakeBroker {
    state: Mutex<State>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl FakeBroker {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                connectors: vec!["openwire".to_string()],
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_queue(self, name: &str, size: u64) -> Self {
        self.state.lock().unwrap().queues.insert(name.to_string(), size);
        self
    }

    pub fn with_message(self, queue: &str, id: &str, text: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            *state.queues.entry(queue.to_string()).or_default() += 1;
            state
                .messages
                .entry(queue.to_string())
                .or_default()
                .push((id.to_string(), text.to_string()));
        }
        self
    }

    pub fn with_connector(self, connector: &str) -> Self {
        self.state.lock().unwrap().connectors.push(connector.to_string());
        self
    }

    pub fn with_connection(self, connector: &str, name: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .connections
            .push((connector.to_string(), name.to_string()));
        self
    }

    pub fn with_job(self, id: &str, next: &str) -> Self {
        self.state.lock().unwrap().jobs.push(json!({
            "jobId": id,
            "cronEntry": "",
            "start": "2024-01-02 03:04:05",
            "next": next,
            "delay": 60000,
            "period": 0,
            "repeat": 0,
        }));
        self
    }

    pub fn duplicated(self, queue: &str) -> Self {
        self.state.lock().unwrap().duplicated.insert(queue.to_string());
        self
    }

    pub fn failing(self, queue: &str) -> Self {
        self.state.lock().unwrap().failing.insert(queue.to_string());
        self
    }

    pub fn garbage_counts(self) -> Self {
        self.state.lock().unwrap().garbage_counts = true;
        self
    }

    pub fn queue_size(&self, name: &str) -> Option<u64> {
        self.state.lock().unwrap().queues.get(name).copied()
    }

    pub fn job_ids(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .jobs
            .iter()
            .filter_map(|job| job["jobId"].as_str().map(str::to_string))
            .collect()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of calls that were in progress at the same time
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    fn respond(&self, body: &Value) -> Value {
        let mbean = body["mbean"].as_str().unwrap_or_default();
        let name = match ObjectName::parse(mbean) {
            Ok(name) => name,
            Err(e) => return failure(400, "java.lang.IllegalArgumentException", &e.to_string()),
        };
        let mut state = self.state.lock().unwrap();
        match body["type"].as_str() {
            Some("search") => search(&state, &name),
            Some("read") => read(&state, &name, body.get("attribute")),
            Some("exec") => exec(&mut state, &name, body["operation"].as_str().unwrap_or_default(), &body["arguments"]),
            _ => failure(400, "java.lang.IllegalArgumentException", "unknown request type"),
        }
    }
}

impl Transport for FakeBroker {
    async fn post_json(&self, _url: &str, body: &Value) -> ActiveMQResult<HttpResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let reply = self.respond(body);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(HttpResult::new(200, reply.to_string()))
    }

    async fn get(&self, _url: &str) -> ActiveMQResult<HttpResult> {
        Ok(HttpResult::new(404, "Not Found"))
    }
}

/// Client over `broker` with ten workers; the broker stays reachable through the returned `Arc`.
pub fn client(broker: FakeBroker) -> (Client<SharedBroker>, Arc<FakeBroker>) {
    client_with(ClientBuilder::new().workers(10), broker)
}

pub fn client_with(builder: ClientBuilder, broker: FakeBroker) -> (Client<SharedBroker>, Arc<FakeBroker>) {
    let broker = Arc::new(broker);
    let client = builder
        .broker_name(BROKER_NAME)
        .build_with_transport(SharedBroker(broker.clone()))
        .unwrap();
    (client, broker)
}

/// Lets a test keep a handle on the broker it handed to the client.
#[derive(Debug, Clone)]
pub struct SharedBroker(pub Arc<FakeBroker>);

impl Transport for SharedBroker {
    async fn post_json(&self, url: &str, body: &Value) -> ActiveMQResult<HttpResult> {
        self.0.post_json(url, body).await
    }

    async fn get(&self, url: &str) -> ActiveMQResult<HttpResult> {
        self.0.get(url).await
    }
}

fn success(value: Value) -> Value {
    json!({"status": 200, "value": value})
}

fn failure(status: u16, error_type: &str, error: &str) -> Value {
    json!({"status": status, "error_type": error_type, "error": format!("{error_type} : {error}")})
}

fn not_found(mbean: &ObjectName) -> Value {
    failure(404, INSTANCE_NOT_FOUND, &mbean.to_string())
}

fn queue_name(name: &str) -> String {
    ObjectName::broker(BROKER_NAME)
        .with("destinationType", "Queue")
        .with("destinationName", name)
        .to_string()
}

fn connection_name(connector: &str, name: &str) -> String {
    ObjectName::broker(BROKER_NAME)
        .with("connector", "clientConnectors")
        .with("connectorName", connector)
        .with("connectionViewType", "remoteAddress")
        .with("connectionName", name)
        .to_string()
}

fn search(state: &State, pattern: &ObjectName) -> Value {
    let matches = |wanted: &str, actual: &str| wanted == "*" || wanted == actual;

    if let Some(wanted) = pattern.get("destinationName") {
        let mut found = Vec::new();
        for name in state.queues.keys().filter(|name| matches(wanted, name)) {
            found.push(queue_name(name));
            if state.duplicated.contains(name) {
                found.push(queue_name(name));
            }
        }
        return success(json!(found));
    }

    if let Some(wanted) = pattern.get("connectionName") {
        let connector = pattern.get("connectorName").unwrap_or("*");
        let found: Vec<String> = state
            .connections
            .iter()
            .filter(|(c, n)| matches(connector, c) && matches(wanted, n))
            .map(|(c, n)| connection_name(c, n))
            .collect();
        return success(json!(found));
    }

    success(json!([]))
}

fn read(state: &State, mbean: &ObjectName, attribute: Option<&Value>) -> Value {
    if let Some(queue) = mbean.get("destinationName") {
        if state.failing.contains(queue) {
            return failure(500, "java.lang.RuntimeException", "broker is shutting down");
        }
        return match state.queues.get(queue) {
            Some(size) => success(json!({
                "QueueSize": size,
                "EnqueueCount": size + 10,
                "DequeueCount": 10,
                "ConsumerCount": 1,
                "ProducerCount": 0,
            })),
            None => not_found(mbean),
        };
    }

    if let Some(connection) = mbean.get("connectionName") {
        let connector = mbean.get("connectorName").unwrap_or_default();
        let known = state
            .connections
            .iter()
            .any(|(c, n)| c == connector && n == connection);
        return if known {
            success(json!({
                "Active": true,
                "ActiveTransactionCount": 0,
                "Blocked": false,
                "ClientId": format!("client-{connection}"),
                "Connected": true,
                "DispatchQueueSize": 0,
                "OldestActiveTransactionDuration": null,
                "RemoteAddress": format!("tcp://{connection}"),
                "Slow": false,
                "UserName": "admin",
            }))
        } else {
            not_found(mbean)
        };
    }

    let mut broker = Map::new();
    broker.insert("BrokerName".to_string(), json!(BROKER_NAME));
    broker.insert("TotalMessageCount".to_string(), json!(state.queues.values().sum::<u64>()));
    let connectors: Map<String, Value> = state
        .connectors
        .iter()
        .map(|c| (c.clone(), json!(format!("{c}://0.0.0.0:61616"))))
        .collect();
    broker.insert("TransportConnectors".to_string(), Value::Object(connectors));

    match attribute.and_then(Value::as_str) {
        Some(attribute) => match broker.remove(attribute) {
            Some(value) => success(value),
            None => failure(404, "javax.management.AttributeNotFoundException", attribute),
        },
        None => success(Value::Object(broker)),
    }
}

fn exec(state: &mut State, mbean: &ObjectName, operation: &str, arguments: &Value) -> Value {
    let argument = |i: usize| arguments.get(i).and_then(Value::as_str).unwrap_or_default().to_string();

    if mbean.get("service") == Some("JobScheduler") {
        return match operation {
            "getAllJobs(java.lang.String,java.lang.String)" => {
                let jobs: Map<String, Value> = state
                    .jobs
                    .iter()
                    .map(|job| (job["jobId"].as_str().unwrap_or_default().to_string(), job.clone()))
                    .collect();
                success(Value::Object(jobs))
            }
            "removeJob(java.lang.String)" => {
                let id = argument(0);
                state.jobs.retain(|job| job["jobId"] != id.as_str());
                success(Value::Null)
            }
            _ => failure(400, "java.lang.NoSuchMethodException", operation),
        };
    }

    if let Some(queue) = mbean.get("destinationName") {
        if !state.queues.contains_key(queue) {
            return not_found(mbean);
        }
        let queue = queue.to_string();
        return match operation {
            "purge" => {
                state.queues.insert(queue.clone(), 0);
                state.messages.remove(&queue);
                success(Value::Null)
            }
            "browseAsTable()" | "browseAsTable(java.lang.String)" => {
                let selected = selected_id(&argument(0));
                let rows: Map<String, Value> = state
                    .messages
                    .get(&queue)
                    .into_iter()
                    .flatten()
                    .filter(|(id, _)| selected.as_deref().is_none_or(|s| s == id))
                    .map(|(id, _)| {
                        (
                            id.clone(),
                            json!({
                                "JMSMessageID": id,
                                "JMSTimestamp": "2019-03-15T10:43:06+02:00",
                                "JMSDeliveryMode": "PERSISTENT",
                                "JMSPriority": 4,
                                "JMSRedelivered": false,
                                "StringProperties": {},
                            }),
                        )
                    })
                    .collect();
                success(Value::Object(rows))
            }
            "browseMessages(java.lang.String)" => {
                let selected = selected_id(&argument(0));
                let found: Vec<Value> = state
                    .messages
                    .get(&queue)
                    .into_iter()
                    .flatten()
                    .filter(|(id, _)| selected.as_deref() == Some(id.as_str()))
                    .map(|(id, text)| json!({"JMSMessageID": id, "text": text}))
                    .collect();
                success(json!(found))
            }
            "retryMessages()" | "moveMatchingMessagesTo(java.lang.String,java.lang.String)" => {
                if state.garbage_counts {
                    return success(json!("garbage"));
                }
                let selected = selected_id(&argument(0));
                let count = state
                    .messages
                    .get(&queue)
                    .into_iter()
                    .flatten()
                    .filter(|(id, _)| selected.as_deref().is_none_or(|s| s == id))
                    .count();
                success(json!(count))
            }
            "removeMessage(java.lang.String)" => {
                let id = argument(0);
                let messages = state.messages.entry(queue.clone()).or_default();
                let before = messages.len();
                messages.retain(|(m, _)| *m != id);
                let removed = before != messages.len();
                if removed {
                    if let Some(size) = state.queues.get_mut(&queue) {
                        *size = size.saturating_sub(1);
                    }
                }
                success(json!(removed))
            }
            _ => failure(400, "java.lang.NoSuchMethodException", operation),
        };
    }

    match operation {
        "removeQueue(java.lang.String)" => {
            let queue = argument(0);
            state.queues.remove(&queue);
            state.messages.remove(&queue);
            success(Value::Null)
        }
        _ => failure(400, "java.lang.NoSuchMethodException", operation),
    }
}

fn selected_id(selector: &str) -> Option<String> {
    let (_, rest) = selector.split_once('\'')?;
    let (id, _) = rest.split_once('\'')?;
    Some(id.to_string())
}
