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

//! ActiveMQ Manager - management client and admin CLI for Apache ActiveMQ
//!
//! This crate provides both:
//! - **Core**: Jolokia gateway, bounded concurrent fan-out, and typed resource objects
//! - **Console**: A client for the broker's HTML admin console
//! - **CLI**: Command-line interface with formatting and validation
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           CLI Layer (bin/)              │
//! │  - Command parsing (clap)               │
//! │  - Output formatting (formatters/)      │
//! │  - Input validation (validators/)       │
//! └─────────────────┬───────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────┐
//! │       Client / Broker facade (core/)    │
//! │  - Resolver: one SEARCH per listing     │
//! │  - Fan-out: N READs, W at a time        │
//! │  - Queue, Connection, Job, Message      │
//! └─────────────────┬───────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────┐
//! │     Gateway (Jolokia) / Console (HTML)  │
//! │  - Transport trait (reqwest)            │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Usage Examples
//!
//! ## As a Library
//!
//! ```rust,ignore
//! use activemq_manager::core::admin::ClientBuilder;
//! use activemq_manager::core::resource::ResourceKind;
//! use futures::StreamExt;
//!
//! let client = ClientBuilder::new().endpoint("http://localhost:8161").build()?;
//!
//! let mut queues = client.broker().queues().await?;
//! while let Some(queue) = queues.next().await {
//!     let queue = queue?;
//!     println!("{} {}", queue.name(), queue.size());
//! }
//!
//! if let Some(queue) = client.get(ResourceKind::Queue, "orders").await?.into_queue() {
//!     queue.purge().await?;
//! }
//! ```
//!
//! ## As a CLI Tool
//!
//! ```bash
//! activemq-admin-cli queue list -e http://localhost:8161 -f json
//! ```

// Core business logic - reusable across different interfaces
pub mod core {
    //! Core business logic module
    //!
    //! # Available Modules
    //!
    //! - [`admin`] - Client builder and facade
    //! - [`broker`] - Listing and lookup operations of one broker
    //! - [`concurrent`] - Bounded concurrent fan-out
    //! - [`gateway`] - Jolokia request/reply classification
    //! - [`resolver`] - Object name patterns and search expansion

    pub mod admin;
    pub mod broker;
    pub mod concurrent;
    pub mod config;
    pub mod connection;
    pub mod gateway;
    pub mod job;
    pub mod message;
    pub mod queue;
    pub mod resolver;
    pub mod resource;
    pub mod transport;

    pub use activemq_error::ActiveMQError;
    pub use activemq_error::ActiveMQResult;
}

// Admin console (HTML) client
pub mod console;

// CLI presentation layer
pub mod cli {
    //! CLI presentation layer
    //!
    //! - [`formatters`] - Output formatters (JSON, YAML, Table)
    //! - [`validators`] - Input validators

    pub mod formatters;
    pub mod validators;
}

// UI utilities for the CLI
pub mod ui {
    pub mod prompt;
}

pub(crate) mod commands;

// CLI entry point
pub mod activemq_cli;
