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

pub mod command_util;
mod broker_commands;
mod connection_commands;
mod job_commands;
mod message_commands;
mod queue_commands;

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use tabled::settings::Style;
use tabled::Table;
use tabled::Tabled;

use crate::cli::validators;
use crate::core::admin::Client;
use crate::core::admin::ClientBuilder;
use crate::core::concurrent::FailurePolicy;
use crate::core::ActiveMQResult;

/// A trait that defines the execution behavior for commands.
pub trait CommandExecute {
    /// Executes the command against the broker described by its arguments.
    async fn execute(&self) -> ActiveMQResult<()>;
}

#[derive(Debug, Parser, Clone)]
pub struct CommonArgs {
    /// Configuration file (toml, yaml, json); `ACTIVEMQ_*` variables override it
    #[arg(short = 'c', long = "config", required = false, help = "Configuration file path")]
    pub config: Option<PathBuf>,

    #[arg(
        short = 'e',
        long = "endpoint",
        required = false,
        help = "Web console base URL, eg: 'http://localhost:8161'"
    )]
    pub endpoint: Option<String>,

    #[arg(short = 'b', long = "brokerName", required = false, help = "Broker name, eg: 'localhost'")]
    pub broker_name: Option<String>,

    #[arg(short = 'u', long = "username", required = false, help = "Basic auth user")]
    pub username: Option<String>,

    #[arg(short = 'p', long = "password", required = false, help = "Basic auth password")]
    pub password: Option<String>,

    #[arg(short = 'w', long = "workers", required = false, help = "Concurrent fetches per listing")]
    pub workers: Option<usize>,

    /// Keep listing when single resources fail instead of aborting
    #[arg(long = "best-effort", help = "Report partial listings instead of failing on the first error")]
    pub best_effort: bool,

    /// Skip confirmation prompts (automatically answer 'yes')
    #[arg(
        short = 'y',
        long = "yes",
        help = "Skip confirmation prompts for dangerous operations"
    )]
    pub skip_confirm: bool,
}

impl CommonArgs {
    /// Build a client from the configuration file, the environment, and these flags.
    pub fn client(&self) -> ActiveMQResult<Client> {
        let mut builder = ClientBuilder::from_file(self.config.as_deref())?;
        if let Some(endpoint) = &self.endpoint {
            builder = builder.endpoint(endpoint.trim());
        }
        if let Some(broker_name) = &self.broker_name {
            builder = builder.broker_name(broker_name.trim());
        }
        if let Some(username) = &self.username {
            builder = builder.credentials(username, self.password.clone().unwrap_or_default());
        }
        if let Some(workers) = self.workers {
            validators::validate_workers(workers)?;
            builder = builder.workers(workers);
        }
        if self.best_effort {
            builder = builder.failure_policy(FailurePolicy::BestEffort);
        }
        builder.build()
    }
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(subcommand)]
    #[command(about = "Queue commands")]
    Queue(queue_commands::QueueCommands),

    #[command(subcommand)]
    #[command(about = "Message commands")]
    Message(message_commands::MessageCommands),

    #[command(subcommand)]
    #[command(about = "Connection commands")]
    Connection(connection_commands::ConnectionCommands),

    #[command(subcommand)]
    #[command(about = "Scheduled job commands")]
    Job(job_commands::JobCommands),

    #[command(subcommand)]
    #[command(about = "Broker commands")]
    Broker(broker_commands::BrokerCommands),

    #[command(about = "Category commands show")]
    Show(ClassificationTablePrint),
}

impl CommandExecute for Commands {
    async fn execute(&self) -> ActiveMQResult<()> {
        match self {
            Commands::Queue(value) => value.execute().await,
            Commands::Message(value) => value.execute().await,
            Commands::Connection(value) => value.execute().await,
            Commands::Job(value) => value.execute().await,
            Commands::Broker(value) => value.execute().await,
            Commands::Show(value) => value.execute().await,
        }
    }
}

// ================for commands table print================
#[derive(Tabled, Clone)]
struct Command {
    #[tabled(rename = "Category")]
    category: &'static str,

    #[tabled(rename = "Command")]
    command: &'static str,

    #[tabled(rename = "Remark")]
    remark: &'static str,
}

#[derive(Parser)]
pub(crate) struct ClassificationTablePrint;

impl CommandExecute for ClassificationTablePrint {
    async fn execute(&self) -> ActiveMQResult<()> {
        let commands: Vec<Command> = vec![
            Command {
                category: "Queue",
                command: "list",
                remark: "List queues with their counters.",
            },
            Command {
                category: "Queue",
                command: "show",
                remark: "Show one queue.",
            },
            Command {
                category: "Queue",
                command: "purge",
                remark: "Remove every pending message of a queue.",
            },
            Command {
                category: "Queue",
                command: "delete",
                remark: "Delete a queue.",
            },
            Command {
                category: "Queue",
                command: "messages",
                remark: "Browse the messages of a queue.",
            },
            Command {
                category: "Queue",
                command: "move-messages",
                remark: "Move messages matching a selector.",
            },
            Command {
                category: "Queue",
                command: "retry",
                remark: "Retry every message of a dead letter queue.",
            },
            Command {
                category: "Message",
                command: "delete",
                remark: "Delete one message.",
            },
            Command {
                category: "Message",
                command: "retry",
                remark: "Retry one dead-lettered message.",
            },
            Command {
                category: "Message",
                command: "move",
                remark: "Move one message to another queue.",
            },
            Command {
                category: "Message",
                command: "text",
                remark: "Print the body of one message.",
            },
            Command {
                category: "Connection",
                command: "list",
                remark: "List client connections.",
            },
            Command {
                category: "Job",
                command: "list",
                remark: "List scheduled jobs.",
            },
            Command {
                category: "Job",
                command: "count",
                remark: "Count scheduled jobs.",
            },
            Command {
                category: "Job",
                command: "delete",
                remark: "Delete a scheduled job.",
            },
            Command {
                category: "Broker",
                command: "attribute",
                remark: "Read broker attributes.",
            },
        ];
        let mut table = Table::new(commands);
        table.with(Style::extended());
        print!("{table}");
        Ok(())
    }
}
