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

//! Rows of the admin console tables
//!
//! Cells are addressed by position. Every action link is checked against the action it is
//! expected to trigger so that console markup changes fail loudly instead of following the
//! wrong link.

use activemq_common::TimeUtils;
use activemq_error::DecodeError;
use chrono::NaiveDateTime;
use serde::Serialize;

use crate::console::decoder::Cell;

pub const PURGE_DESTINATION_ACTION: &str = "purgeDestination.action";
pub const DELETE_DESTINATION_ACTION: &str = "deleteDestination.action";
pub const DELETE_MESSAGE_ACTION: &str = "deleteMessage.action";
pub const DELETE_JOB_ACTION: &str = "deleteJob.action";

/// A row of `queues.jsp`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsoleQueue {
    pub name: String,
    pub pending: u64,
    pub consumers: u64,
    pub enqueued: u64,
    pub dequeued: u64,
    pub href_purge: String,
    pub href_delete: String,
}

impl ConsoleQueue {
    pub const TABLE: &'static str = "queues";

    pub fn from_row(row: &[Cell]) -> Result<Self, DecodeError> {
        let operations = row
            .last()
            .ok_or_else(|| DecodeError::invalid_row(Self::TABLE, "empty row"))?;
        Ok(Self {
            name: cell(Self::TABLE, row, 0)?.text.clone(),
            pending: number(Self::TABLE, row, 1)?,
            consumers: number(Self::TABLE, row, 2)?,
            enqueued: number(Self::TABLE, row, 3)?,
            dequeued: number(Self::TABLE, row, 4)?,
            href_purge: named_action(Self::TABLE, operations, "Purge", PURGE_DESTINATION_ACTION)?,
            href_delete: named_action(Self::TABLE, operations, "Delete", DELETE_DESTINATION_ACTION)?,
        })
    }
}

/// A row of `browse.jsp`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsoleMessage {
    pub queue: String,
    pub message_id: String,
    pub persistent: bool,
    pub timestamp: NaiveDateTime,
    pub href_properties: String,
    pub href_delete: String,
}

impl ConsoleMessage {
    pub const TABLE: &'static str = "messages";

    pub fn from_row(queue: &str, row: &[Cell]) -> Result<Self, DecodeError> {
        let id = cell(Self::TABLE, row, 0)?;
        Ok(Self {
            queue: queue.to_string(),
            message_id: id.text.clone(),
            persistent: cell(Self::TABLE, row, 2)?.text == "Persistent",
            timestamp: TimeUtils::parse_activemq_timestamp(&cell(Self::TABLE, row, 6)?.text)?,
            href_properties: id
                .href()
                .ok_or_else(|| DecodeError::invalid_row(Self::TABLE, "message id without a link"))?
                .to_string(),
            href_delete: action(Self::TABLE, cell(Self::TABLE, row, 8)?, DELETE_MESSAGE_ACTION)?,
        })
    }
}

/// A row of `scheduled.jsp`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsoleJob {
    pub message_id: String,
    pub next_scheduled_time: NaiveDateTime,
    pub start: NaiveDateTime,
    pub delay: i64,
    pub href_delete: String,
}

impl ConsoleJob {
    pub const TABLE: &'static str = "Jobs";

    pub fn from_row(row: &[Cell]) -> Result<Self, DecodeError> {
        let delay = &cell(Self::TABLE, row, 4)?.text;
        Ok(Self {
            message_id: cell(Self::TABLE, row, 0)?.text.clone(),
            next_scheduled_time: TimeUtils::parse_activemq_timestamp(&cell(Self::TABLE, row, 2)?.text)?,
            start: TimeUtils::parse_activemq_timestamp(&cell(Self::TABLE, row, 3)?.text)?,
            delay: delay
                .parse()
                .map_err(|_| DecodeError::invalid_row(Self::TABLE, format!("delay is not a number: {delay}")))?,
            href_delete: action(Self::TABLE, cell(Self::TABLE, row, 7)?, DELETE_JOB_ACTION)?,
        })
    }
}

/// A row of `connections.jsp`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsoleConnection {
    pub id: String,
    pub id_href: String,
    pub remote_address: String,
    pub active: bool,
    pub slow: bool,
}

impl ConsoleConnection {
    pub const TABLE: &'static str = "connections";
    /// Name, remote address, active, slow
    pub const COLUMNS: usize = 4;

    pub fn from_row(row: &[Cell]) -> Result<Self, DecodeError> {
        let id = cell(Self::TABLE, row, 0)?;
        Ok(Self {
            id: id.text.clone(),
            id_href: id
                .href()
                .ok_or_else(|| DecodeError::invalid_row(Self::TABLE, "connection id without a link"))?
                .to_string(),
            remote_address: cell(Self::TABLE, row, 1)?.text.clone(),
            active: cell(Self::TABLE, row, 2)?.text == "true",
            slow: cell(Self::TABLE, row, 3)?.text == "true",
        })
    }
}

fn cell<'a>(table: &str, row: &'a [Cell], index: usize) -> Result<&'a Cell, DecodeError> {
    row.get(index)
        .ok_or_else(|| DecodeError::invalid_row(table, format!("expected at least {} cells, got {}", index + 1, row.len())))
}

fn number(table: &str, row: &[Cell], index: usize) -> Result<u64, DecodeError> {
    let text = &cell(table, row, index)?.text;
    text.parse()
        .map_err(|_| DecodeError::invalid_row(table, format!("cell {index} is not a number: {text}")))
}

fn action(table: &str, cell: &Cell, prefix: &'static str) -> Result<String, DecodeError> {
    let href = cell
        .href()
        .ok_or_else(|| DecodeError::invalid_row(table, format!("no link to {prefix}")))?;
    checked(href, prefix)
}

fn named_action(table: &str, cell: &Cell, text: &str, prefix: &'static str) -> Result<String, DecodeError> {
    let anchor = cell
        .anchor(text)
        .ok_or_else(|| DecodeError::invalid_row(table, format!("no '{text}' link")))?;
    checked(&anchor.href, prefix)
}

fn checked(href: &str, prefix: &'static str) -> Result<String, DecodeError> {
    if href.starts_with(prefix) {
        Ok(href.to_string())
    } else {
        Err(DecodeError::UnexpectedHref {
            expected_prefix: prefix,
            href: href.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Timelike;

    use super::*;
    use crate::console::decoder::Anchor;

    fn operations(purge: &str, delete: &str) -> Cell {
        Cell {
            text: "Send To Purge Delete".to_string(),
            anchors: vec![
                Anchor {
                    text: "Send To".to_string(),
                    href: "send.jsp?JMSDestination=orders".to_string(),
                },
                Anchor {
                    text: "Purge".to_string(),
                    href: purge.to_string(),
                },
                Anchor {
                    text: "Delete".to_string(),
                    href: delete.to_string(),
                },
            ],
        }
    }

    fn queue_row(purge: &str) -> Vec<Cell> {
        vec![
            Cell::link("orders", "browse.jsp?JMSDestination=orders"),
            Cell::text("3"),
            Cell::text("1"),
            Cell::text("10"),
            Cell::text("7"),
            Cell::text("Browse Active Consumers"),
            operations(purge, "deleteDestination.action?JMSDestination=orders&secret=s"),
        ]
    }

    #[test]
    fn queue_row_decodes() {
        let queue = ConsoleQueue::from_row(&queue_row("purgeDestination.action?JMSDestination=orders&secret=s")).unwrap();
        assert_eq!(queue.name, "orders");
        assert_eq!((queue.pending, queue.consumers, queue.enqueued, queue.dequeued), (3, 1, 10, 7));
        assert!(queue.href_delete.starts_with(DELETE_DESTINATION_ACTION));
    }

    #[test]
    fn queue_row_rejects_foreign_href() {
        let err = ConsoleQueue::from_row(&queue_row("http://evil/purge")).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::UnexpectedHref {
                expected_prefix: PURGE_DESTINATION_ACTION,
                ..
            }
        ));
    }

    #[test]
    fn message_row_decodes() {
        let row = vec![
            Cell::link("ID:host-1:1:1:1", "message.jsp?id=ID:host-1:1:1:1&JMSDestination=orders"),
            Cell::text(""),
            Cell::text("Persistent"),
            Cell::text("4"),
            Cell::text("false"),
            Cell::text("0"),
            Cell::text("2019-03-15 10:43:06:123 UTC"),
            Cell::text(""),
            Cell::link("Delete", "deleteMessage.action?JMSDestination=orders&messageId=ID:host-1:1:1:1"),
        ];
        let message = ConsoleMessage::from_row("orders", &row).unwrap();
        assert!(message.persistent);
        assert_eq!(message.timestamp.nanosecond(), 123_000_000);
        assert!(message.href_properties.starts_with("message.jsp"));
    }

    #[test]
    fn short_row_is_invalid() {
        let err = ConsoleMessage::from_row("orders", &[Cell::text("ID:x")]).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidRow { .. }));
    }

    #[test]
    fn job_row_decodes() {
        let row = vec![
            Cell::text("ID:job-1"),
            Cell::text("*/5 * * * *"),
            Cell::text("2024-01-02 03:09:05"),
            Cell::text("2024-01-02 03:04:05"),
            Cell::text("300000"),
            Cell::text("0"),
            Cell::text("0"),
            Cell::link("Delete", "deleteJob.action?jobId=ID:job-1&secret=s"),
        ];
        let job = ConsoleJob::from_row(&row).unwrap();
        assert_eq!(job.delay, 300_000);
        assert!(job.next_scheduled_time > job.start);
    }

    #[test]
    fn connection_row_decodes() {
        let row = vec![
            Cell::link("ID:client-1", "connection.jsp?connectionID=ID:client-1"),
            Cell::text("tcp://127.0.0.1:51234"),
            Cell::text("true"),
            Cell::text("false"),
        ];
        let connection = ConsoleConnection::from_row(&row).unwrap();
        assert!(connection.active);
        assert!(!connection.slow);
        assert_eq!(connection.remote_address, "tcp://127.0.0.1:51234");
    }
}
