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

//! Admin console client
//!
//! Reads the HTML pages of the broker web console (`queues.jsp`, `browse.jsp`,
//! `connections.jsp`, `scheduled.jsp`) and performs actions by following the action links
//! embedded in them, exactly as a browser would.

pub mod decoder;
pub mod records;

use std::collections::BTreeMap;
use std::sync::Arc;

use activemq_error::ActiveMQError;
use activemq_error::ActiveMQResult;
use activemq_error::DecodeError;
use activemq_error::TransportError;
use serde::Serialize;
use tracing::debug;
use tracing::error;
use tracing::info;
use url::form_urlencoded;

use crate::console::decoder::HtmlTable;
use crate::console::decoder::HtmlTableDecoder;
use crate::console::decoder::PageDecoder;
use crate::console::records::ConsoleConnection;
use crate::console::records::ConsoleJob;
use crate::console::records::ConsoleMessage;
use crate::console::records::ConsoleQueue;
use crate::core::transport::HttpResult;
use crate::core::transport::HttpTransport;
use crate::core::transport::Transport;

const QUEUES_PAGE: &str = "queues.jsp";
const BROWSE_PAGE: &str = "browse.jsp";
const CONNECTIONS_PAGE: &str = "connections.jsp";
const SCHEDULED_PAGE: &str = "scheduled.jsp";

const HTTP_FOUND: u16 = 302;
const HTTP_NOT_FOUND: u16 = 404;

/// Header and property tables of a message page. Either may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MessageDetails {
    pub header: Option<BTreeMap<String, String>>,
    pub properties: Option<BTreeMap<String, String>>,
}

pub struct Console<T = HttpTransport> {
    transport: Arc<T>,
    base_url: String,
    decoder: Arc<dyn PageDecoder>,
}

impl<T> Clone for Console<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            base_url: self.base_url.clone(),
            decoder: self.decoder.clone(),
        }
    }
}

impl<T> Console<T> {
    /// `base_url` is the console root, e.g. `http://localhost:8161/admin`.
    pub fn new(transport: Arc<T>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            decoder: Arc::new(HtmlTableDecoder),
        }
    }

    pub fn with_decoder(mut self, decoder: impl PageDecoder + 'static) -> Self {
        self.decoder = Arc::new(decoder);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    fn single_table(&self, html: &str, id: &str) -> ActiveMQResult<HtmlTable> {
        self.optional_table(html, id)?.ok_or_else(|| {
            DecodeError::MissingTable {
                id: id.to_string(),
                found: 0,
            }
            .into()
        })
    }

    fn optional_table(&self, html: &str, id: &str) -> ActiveMQResult<Option<HtmlTable>> {
        let mut tables = self.decoder.tables(html, id)?;
        match tables.len() {
            0 => Ok(None),
            1 => Ok(tables.pop()),
            found => Err(DecodeError::MissingTable {
                id: id.to_string(),
                found,
            }
            .into()),
        }
    }
}

impl<T> Console<T>
where
    T: Transport + Sync,
{
    async fn fetch(&self, path: &str) -> ActiveMQResult<HttpResult> {
        let url = self.url(path);
        debug!("console request: GET {url}");
        self.transport.get(&url).await
    }

    async fn page(&self, path: &str) -> ActiveMQResult<String> {
        let reply = self.fetch(path).await?;
        if !reply.is_success() {
            return Err(TransportError::http_status(self.url(path), reply.code).into());
        }
        Ok(reply.content)
    }

    /// Follow an action link. The console answers actions with a redirect.
    async fn follow(&self, href: &str) -> ActiveMQResult<()> {
        let reply = self.fetch(href).await?;
        if reply.is_success() || reply.code == HTTP_FOUND {
            if let Some(location) = &reply.location {
                debug!("{href} redirected to {location}");
            }
            Ok(())
        } else {
            Err(TransportError::http_status(self.url(href), reply.code).into())
        }
    }

    pub async fn queues(&self) -> ActiveMQResult<Vec<ConsoleQueue>> {
        let html = self.page(QUEUES_PAGE).await?;
        let table = self.single_table(&html, ConsoleQueue::TABLE)?;
        table
            .rows
            .iter()
            .map(|row| ConsoleQueue::from_row(row).map_err(Into::into))
            .collect()
    }

    pub async fn queue(&self, name: &str) -> ActiveMQResult<ConsoleQueue> {
        self.queues()
            .await?
            .into_iter()
            .find(|queue| queue.name == name)
            .ok_or_else(|| ActiveMQError::not_found("queue", name))
    }

    /// Messages shown on the browse page of `queue`; the console caps the page size.
    pub async fn messages(&self, queue: &str) -> ActiveMQResult<Vec<ConsoleMessage>> {
        let destination: String = form_urlencoded::byte_serialize(queue.as_bytes()).collect();
        let html = self.page(&format!("{BROWSE_PAGE}?JMSDestination={destination}")).await?;
        let table = self.single_table(&html, ConsoleMessage::TABLE)?;
        table
            .rows
            .iter()
            .map(|row| ConsoleMessage::from_row(queue, row).map_err(Into::into))
            .collect()
    }

    pub async fn message_details(&self, message: &ConsoleMessage) -> ActiveMQResult<MessageDetails> {
        let html = self.page(&message.href_properties).await?;
        let pairs = |table: Option<HtmlTable>| {
            table.map(|table| {
                table
                    .rows
                    .into_iter()
                    .filter_map(|mut row| {
                        if row.len() < 2 {
                            return None;
                        }
                        let value = row.swap_remove(1).text;
                        Some((row.swap_remove(0).text, value))
                    })
                    .collect::<BTreeMap<_, _>>()
            })
        };
        Ok(MessageDetails {
            header: pairs(self.optional_table(&html, "header")?),
            properties: pairs(self.optional_table(&html, "properties")?),
        })
    }

    /// Client connections. The page holds one `connections` table per connector; only the
    /// four column layout is understood and other tables are skipped.
    pub async fn connections(&self) -> ActiveMQResult<Vec<ConsoleConnection>> {
        let reply = self.fetch(CONNECTIONS_PAGE).await?;
        if reply.code == HTTP_NOT_FOUND {
            return Err(ActiveMQError::not_found("page", CONNECTIONS_PAGE));
        }
        if !reply.is_success() {
            return Err(TransportError::http_status(self.url(CONNECTIONS_PAGE), reply.code).into());
        }

        let mut connections = Vec::new();
        for table in self.decoder.tables(&reply.content, ConsoleConnection::TABLE)? {
            if table.headers.len() != ConsoleConnection::COLUMNS {
                continue;
            }
            for row in &table.rows {
                connections.push(ConsoleConnection::from_row(row)?);
            }
        }
        Ok(connections)
    }

    pub async fn scheduled_jobs(&self) -> ActiveMQResult<Vec<ConsoleJob>> {
        let reply = self.fetch(SCHEDULED_PAGE).await?;
        if reply.code == HTTP_NOT_FOUND {
            // Scheduler support is disabled on the broker
            return Err(ActiveMQError::not_found("scheduled messages", self.url(SCHEDULED_PAGE)));
        }
        if !reply.is_success() {
            return Err(TransportError::http_status(self.url(SCHEDULED_PAGE), reply.code).into());
        }
        let table = self.single_table(&reply.content, ConsoleJob::TABLE)?;
        table
            .rows
            .iter()
            .map(|row| ConsoleJob::from_row(row).map_err(Into::into))
            .collect()
    }

    pub async fn scheduled_job_count(&self) -> ActiveMQResult<usize> {
        Ok(self.scheduled_jobs().await?.len())
    }

    pub async fn purge_queue(&self, queue: &ConsoleQueue) -> ActiveMQResult<()> {
        info!("purge queue {} through the console", queue.name);
        self.follow(&queue.href_purge).await
    }

    pub async fn delete_queue(&self, queue: &ConsoleQueue) -> ActiveMQResult<()> {
        info!("delete queue {} through the console", queue.name);
        self.follow(&queue.href_delete).await
    }

    pub async fn delete_message(&self, message: &ConsoleMessage) -> ActiveMQResult<()> {
        info!("delete message from {}: {}", message.queue, message.message_id);
        self.follow(&message.href_delete).await
    }

    pub async fn delete_job(&self, job: &ConsoleJob) -> ActiveMQResult<()> {
        info!("delete scheduled message {}", job.message_id);
        self.follow(&job.href_delete).await
    }

    /// Delete every scheduled message. Replies other than a redirect are logged and skipped;
    /// returns how many deletions were acknowledged.
    pub async fn purge_scheduled_messages(&self) -> ActiveMQResult<usize> {
        let mut deleted = 0;
        for job in self.scheduled_jobs().await? {
            let reply = self.fetch(&job.href_delete).await?;
            if reply.code == HTTP_FOUND {
                deleted += 1;
            } else {
                error!("delete scheduled message {} failed: status_code={}", job.message_id, reply.code);
            }
        }
        Ok(deleted)
    }
}

impl<T> std::fmt::Debug for Console<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console").field("base_url", &self.base_url).finish()
    }
}
