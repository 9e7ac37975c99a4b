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

mod browse_queue_sub_command;
mod delete_queue_sub_command;
mod move_messages_sub_command;
mod purge_queue_sub_command;
mod queue_list_sub_command;
mod queue_show_sub_command;
mod retry_messages_sub_command;

use clap::Subcommand;

use crate::commands::CommandExecute;
use crate::core::ActiveMQResult;

#[derive(Subcommand)]
pub enum QueueCommands {
    #[command(
        name = "list",
        about = "List queues",
        long_about = r#"List every queue of the broker with its size and counters. Queues are fetched
concurrently; use --workers to bound the number of requests in flight."#
    )]
    List(queue_list_sub_command::QueueListSubCommand),

    #[command(name = "show", about = "Show one queue", long_about = None)]
    Show(queue_show_sub_command::QueueShowSubCommand),

    #[command(
        name = "purge",
        about = "Purge queue",
        long_about = r#"Remove every pending message of a queue. The queue itself is kept."#
    )]
    Purge(purge_queue_sub_command::PurgeQueueSubCommand),

    #[command(name = "delete", about = "Delete queue", long_about = r#"Delete a queue and all of its messages."#)]
    Delete(delete_queue_sub_command::DeleteQueueSubCommand),

    #[command(
        name = "messages",
        about = "Browse queue messages",
        long_about = r#"Browse the messages of a queue, optionally narrowed by a JMS selector. The broker
caps the number of browsed messages; a warning is logged when the queue holds more."#
    )]
    Messages(browse_queue_sub_command::BrowseQueueSubCommand),

    #[command(
        name = "move-messages",
        about = "Move messages matching a selector",
        long_about = r#"Move every message matching a JMS selector to another queue."#
    )]
    MoveMessages(move_messages_sub_command::MoveMessagesSubCommand),

    #[command(
        name = "retry",
        about = "Retry dead-lettered messages",
        long_about = r#"Send every message of a dead letter queue back to its original destination."#
    )]
    Retry(retry_messages_sub_command::RetryMessagesSubCommand),
}

impl CommandExecute for QueueCommands {
    async fn execute(&self) -> ActiveMQResult<()> {
        match self {
            QueueCommands::List(value) => value.execute().await,
            QueueCommands::Show(value) => value.execute().await,
            QueueCommands::Purge(value) => value.execute().await,
            QueueCommands::Delete(value) => value.execute().await,
            QueueCommands::Messages(value) => value.execute().await,
            QueueCommands::MoveMessages(value) => value.execute().await,
            QueueCommands::Retry(value) => value.execute().await,
        }
    }
}
