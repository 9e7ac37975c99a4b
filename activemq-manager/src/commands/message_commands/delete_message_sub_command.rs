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

use clap::Parser;

use crate::commands::message_commands::MessageArgs;
use crate::commands::CommandExecute;
use crate::commands::CommonArgs;
use crate::core::ActiveMQResult;
use crate::ui::prompt;

#[derive(Debug, Clone, Parser)]
pub struct DeleteMessageSubCommand {
    #[command(flatten)]
    common_args: CommonArgs,

    #[command(flatten)]
    message: MessageArgs,
}

impl CommandExecute for DeleteMessageSubCommand {
    async fn execute(&self) -> ActiveMQResult<()> {
        let target = format!("message '{}' of queue '{}'", self.message.message_id, self.message.queue);
        if !prompt::confirmed(self.common_args.skip_confirm, "delete", &target) {
            println!("Operation cancelled");
            return Ok(());
        }
        let message = self.message.resolve(&self.common_args).await?;
        message.delete().await?;
        println!("delete message {} success", message.id());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_parsing() {
        let cmd = DeleteMessageSubCommand::try_parse_from(["delete", "-q", "orders", "-m", "ID:host-1:1:1:1"]).unwrap();
        assert_eq!(cmd.message.queue, "orders");
        assert_eq!(cmd.message.message_id, "ID:host-1:1:1:1");
    }
}
