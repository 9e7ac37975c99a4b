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

//! Output rows and helpers shared by the subcommands

use activemq_common::TimeUtils::JOB_WINDOW_FORMAT;
use activemq_error::ActiveMQError;
use activemq_error::ActiveMQResult;
use chrono::NaiveDateTime;
use serde::Serialize;

use crate::cli::formatters::OutputFormat;
use crate::core::concurrent::FanOutSummary;
use crate::core::connection::Connection;
use crate::core::job::ScheduledJob;
use crate::core::message::Message;
use crate::core::queue::Queue;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueRow {
    pub name: String,
    pub size: u64,
    pub enqueued: u64,
    pub dequeued: u64,
    pub consumers: u64,
    pub producers: u64,
}

impl<T> From<&Queue<T>> for QueueRow {
    fn from(queue: &Queue<T>) -> Self {
        Self {
            name: queue.name().to_string(),
            size: queue.size(),
            enqueued: queue.enqueue_count(),
            dequeued: queue.dequeue_count(),
            consumers: queue.consumer_count(),
            producers: queue.producer_count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionRow {
    pub connector: String,
    pub name: String,
    pub client_id: Option<String>,
    pub remote_address: String,
    pub user_name: Option<String>,
    pub active: bool,
    pub slow: bool,
    pub blocked: bool,
}

impl<T> From<&Connection<T>> for ConnectionRow {
    fn from(connection: &Connection<T>) -> Self {
        Self {
            connector: connection.connector().to_string(),
            name: connection.name().to_string(),
            client_id: connection.client_id().map(str::to_string),
            remote_address: connection.remote_address().to_string(),
            user_name: connection.user_name().map(str::to_string),
            active: connection.active(),
            slow: connection.slow(),
            blocked: connection.blocked(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobRow {
    pub job_id: String,
    pub next: String,
    pub start: String,
    pub delay: i64,
    pub period: i64,
    pub repeat: i64,
    pub cron_entry: Option<String>,
}

impl<T> From<&ScheduledJob<T>> for JobRow {
    fn from(job: &ScheduledJob<T>) -> Self {
        Self {
            job_id: job.id().to_string(),
            next: job.record().next.clone(),
            start: job.record().start.clone(),
            delay: job.delay(),
            period: job.period(),
            repeat: job.repeat(),
            cron_entry: job.cron_entry().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageRow {
    pub id: String,
    pub timestamp: Option<String>,
    pub persistent: bool,
    pub priority: Option<i32>,
    pub redelivered: bool,
}

impl<T> From<&Message<T>> for MessageRow {
    fn from(message: &Message<T>) -> Self {
        Self {
            id: message.id().to_string(),
            timestamp: message.timestamp().map(|ts| ts.to_rfc3339()),
            persistent: message.persistent(),
            priority: message.priority(),
            redelivered: message.redelivered(),
        }
    }
}

/// Print `data` in the format named by `format` (`table`, `json`, `yaml`).
pub fn print_formatted<D: Serialize>(format: &str, data: &D) -> ActiveMQResult<()> {
    let format: OutputFormat = format.parse()?;
    println!("{}", format.render(data));
    Ok(())
}

/// Tell the user when a best-effort listing came back short.
pub fn report_shortfall(what: &str, summary: Option<FanOutSummary>) {
    if let Some(message) = shortfall_message(what, summary) {
        eprintln!("[WARNING] {message}");
    }
}

fn shortfall_message(what: &str, summary: Option<FanOutSummary>) -> Option<String> {
    summary
        .filter(|summary| summary.failed > 0)
        .map(|summary| format!("{} of {} {what} could not be fetched", summary.failed, summary.submitted))
}

/// Parse an optional job window bound, `%Y-%m-%d %H:%M:%S`.
pub fn parse_window(value: Option<&str>) -> ActiveMQResult<Option<NaiveDateTime>> {
    value
        .map(|value| {
            NaiveDateTime::parse_from_str(value.trim(), JOB_WINDOW_FORMAT).map_err(|e| {
                ActiveMQError::IllegalArgument(format!("invalid time '{value}', expected {JOB_WINDOW_FORMAT}: {e}"))
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_window() {
        assert!(parse_window(None).unwrap().is_none());
        assert!(parse_window(Some("2024-01-02 03:04:05")).unwrap().is_some());
        assert!(parse_window(Some("2024-01-02")).is_err());
    }

    #[test]
    fn test_shortfall_message() {
        assert_eq!(shortfall_message("queues", None), None);
        assert_eq!(
            shortfall_message(
                "queues",
                Some(FanOutSummary {
                    submitted: 3,
                    succeeded: 3,
                    failed: 0,
                }),
            ),
            None
        );
        assert_eq!(
            shortfall_message(
                "connections",
                Some(FanOutSummary {
                    submitted: 5,
                    succeeded: 3,
                    failed: 2,
                }),
            )
            .as_deref(),
            Some("2 of 5 connections could not be fetched")
        );
    }
}
