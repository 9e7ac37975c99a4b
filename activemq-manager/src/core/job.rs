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

use activemq_common::TimeUtils;
use activemq_error::ActiveMQResult;
use activemq_error::DecodeError;
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::core::broker::Broker;
use crate::core::gateway::Request;
use crate::core::resolver::job_scheduler_object_name;
use crate::core::transport::HttpTransport;
use crate::core::transport::Transport;

/// One entry of the broker's job scheduler, as returned by `getAllJobs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub job_id: String,
    #[serde(default)]
    pub cron_entry: Option<String>,
    pub start: String,
    pub next: String,
    pub delay: i64,
    #[serde(default)]
    pub period: i64,
    #[serde(default)]
    pub repeat: i64,
}

impl JobRecord {
    pub(crate) fn decode(value: Value) -> Result<Self, DecodeError> {
        serde_json::from_value(value).map_err(|e| DecodeError::invalid_payload("scheduled job", e.to_string()))
    }
}

/// A scheduled (delayed or repeating) message
pub struct ScheduledJob<T = HttpTransport> {
    broker: Broker<T>,
    record: JobRecord,
}

impl<T> ScheduledJob<T> {
    pub(crate) fn new(broker: Broker<T>, record: JobRecord) -> Self {
        Self { broker, record }
    }

    pub fn id(&self) -> &str {
        &self.record.job_id
    }

    pub fn record(&self) -> &JobRecord {
        &self.record
    }

    pub fn start(&self) -> Result<NaiveDateTime, DecodeError> {
        TimeUtils::parse_activemq_timestamp(&self.record.start)
    }

    pub fn next(&self) -> Result<NaiveDateTime, DecodeError> {
        TimeUtils::parse_activemq_timestamp(&self.record.next)
    }

    pub fn delay(&self) -> i64 {
        self.record.delay
    }

    pub fn period(&self) -> i64 {
        self.record.period
    }

    pub fn repeat(&self) -> i64 {
        self.record.repeat
    }

    pub fn cron_entry(&self) -> Option<&str> {
        self.record.cron_entry.as_deref().filter(|entry| !entry.is_empty())
    }
}

impl<T> ScheduledJob<T>
where
    T: Transport + Sync + 'static,
{
    pub async fn delete(&self) -> ActiveMQResult<()> {
        info!("delete scheduled message: {} [start={}]", self.id(), self.record.start);
        self.broker
            .gateway()
            .call(&Request::exec(
                job_scheduler_object_name(self.broker.name()),
                "removeJob(java.lang.String)",
                vec![Value::from(self.id())],
            ))
            .await?;
        Ok(())
    }
}

impl<T> std::fmt::Debug for ScheduledJob<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledJob").field("record", &self.record).finish()
    }
}
