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

use crate::cli::validators;
use crate::commands::CommandExecute;
use crate::commands::CommonArgs;
use crate::core::ActiveMQResult;
use crate::ui::prompt;

#[derive(Debug, Clone, Parser)]
pub struct MoveMessagesSubCommand {
    #[command(flatten)]
    common_args: CommonArgs,

    #[arg(short = 'q', long = "queue", required = true, help = "Source queue")]
    queue: String,

    #[arg(short = 's', long = "selector", required = true, help = "JMS selector of the messages to move")]
    selector: String,

    #[arg(short = 't', long = "target", required = true, help = "Destination queue")]
    target: String,
}

impl CommandExecute for MoveMessagesSubCommand {
    async fn execute(&self) -> ActiveMQResult<()> {
        validators::validate_queue_name(&self.queue)?;
        validators::validate_queue_name(&self.target)?;
        validators::validate_selector(&self.selector)?;

        let target = format!("messages matching [{}] from '{}' to '{}'", self.selector, self.queue, self.target);
        if !prompt::confirmed(self.common_args.skip_confirm, "move", &target) {
            println!("Operation cancelled");
            return Ok(());
        }

        let client = self.common_args.client()?;
        let queue = client.broker().queue(self.queue.trim()).await?;
        let moved = queue.move_matching(&self.selector, self.target.trim()).await?;
        println!("moved {moved} messages from {} to {}", self.queue.trim(), self.target.trim());
        Ok(())
    }
}
