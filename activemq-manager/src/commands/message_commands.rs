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

mod delete_message_sub_command;
mod message_text_sub_command;
mod move_message_sub_command;
mod retry_message_sub_command;

use clap::Args;
use clap::Subcommand;

use crate::cli::validators;
use crate::commands::CommandExecute;
use crate::commands::CommonArgs;
use crate::core::message::Message;
use crate::core::ActiveMQResult;

#[derive(Subcommand)]
pub enum MessageCommands {
    #[command(name = "delete", about = "Delete message", long_about = r#"Remove one message from its queue."#)]
    Delete(delete_message_sub_command::DeleteMessageSubCommand),

    #[command(
        name = "retry",
        about = "Retry message",
        long_about = r#"Send one dead-lettered message back to its original destination."#
    )]
    Retry(retry_message_sub_command::RetryMessageSubCommand),

    #[command(name = "move", about = "Move message", long_about = r#"Move one message to another queue."#)]
    Move(move_message_sub_command::MoveMessageSubCommand),

    #[command(
        name = "text",
        about = "Print message body",
        long_about = r#"Print the body of one message. Text messages are printed as is; bytes messages are
decoded one character per byte."#
    )]
    Text(message_text_sub_command::MessageTextSubCommand),
}

impl CommandExecute for MessageCommands {
    async fn execute(&self) -> ActiveMQResult<()> {
        match self {
            MessageCommands::Delete(value) => value.execute().await,
            MessageCommands::Retry(value) => value.execute().await,
            MessageCommands::Move(value) => value.execute().await,
            MessageCommands::Text(value) => value.execute().await,
        }
    }
}

/// Queue and message id every message subcommand addresses
#[derive(Debug, Clone, Args)]
pub struct MessageArgs {
    #[arg(short = 'q', long = "queue", required = true, help = "Queue name")]
    pub queue: String,

    #[arg(short = 'm', long = "messageId", required = true, help = "JMSMessageID")]
    pub message_id: String,
}

impl MessageArgs {
    async fn resolve(&self, common_args: &CommonArgs) -> ActiveMQResult<Message> {
        validators::validate_queue_name(&self.queue)?;
        let client = common_args.client()?;
        let mut queue = client.broker().queue(self.queue.trim()).await?;
        queue.message(self.message_id.trim()).await
    }
}
