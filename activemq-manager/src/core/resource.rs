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

//! Resource kinds handled by the generic facade operations

use std::fmt;
use std::str::FromStr;

use activemq_error::ActiveMQError;

use crate::core::connection::Connection;
use crate::core::job::ScheduledJob;
use crate::core::queue::Queue;
use crate::core::transport::HttpTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Queue,
    Connection,
    Job,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Queue => "queue",
            ResourceKind::Connection => "connection",
            ResourceKind::Job => "job",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = ActiveMQError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "queue" | "queues" => Ok(ResourceKind::Queue),
            "connection" | "connections" => Ok(ResourceKind::Connection),
            "job" | "jobs" => Ok(ResourceKind::Job),
            other => Err(ActiveMQError::IllegalArgument(format!("unknown resource kind: {other}"))),
        }
    }
}

/// Any populated resource object
pub enum Resource<T = HttpTransport> {
    Queue(Queue<T>),
    Connection(Connection<T>),
    Job(ScheduledJob<T>),
}

impl<T> Resource<T> {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::Queue(_) => ResourceKind::Queue,
            Resource::Connection(_) => ResourceKind::Connection,
            Resource::Job(_) => ResourceKind::Job,
        }
    }

    /// The identifier the resource was resolved by
    pub fn id(&self) -> &str {
        match self {
            Resource::Queue(queue) => queue.name(),
            Resource::Connection(connection) => connection.name(),
            Resource::Job(job) => job.id(),
        }
    }

    pub fn into_queue(self) -> Option<Queue<T>> {
        match self {
            Resource::Queue(queue) => Some(queue),
            _ => None,
        }
    }

    pub fn into_connection(self) -> Option<Connection<T>> {
        match self {
            Resource::Connection(connection) => Some(connection),
            _ => None,
        }
    }

    pub fn into_job(self) -> Option<ScheduledJob<T>> {
        match self {
            Resource::Job(job) => Some(job),
            _ => None,
        }
    }
}

impl<T> fmt::Debug for Resource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Queue(queue) => fmt::Debug::fmt(queue, f),
            Resource::Connection(connection) => fmt::Debug::fmt(connection, f),
            Resource::Job(job) => fmt::Debug::fmt(job, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parsing() {
        assert_eq!("Queues".parse::<ResourceKind>().unwrap(), ResourceKind::Queue);
        assert_eq!("connection".parse::<ResourceKind>().unwrap(), ResourceKind::Connection);
        assert_eq!(" job ".parse::<ResourceKind>().unwrap(), ResourceKind::Job);
        assert!("topic".parse::<ResourceKind>().is_err());
        assert_eq!(ResourceKind::Connection.to_string(), "connection");
    }
}
