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
pub struct PurgeQueueSubCommand {
    #[command(flatten)]
    common_args: CommonArgs,

    #[arg(short = 'q', long = "queue", required = true, help = "Queue name")]
    queue: String,
}

impl CommandExecute for PurgeQueueSubCommand {
    async fn execute(&self) -> ActiveMQResult<()> {
        validators::validate_queue_name(&self.queue)?;
        let name = self.queue.trim();
        if !prompt::confirmed(self.common_args.skip_confirm, "purge", &format!("queue '{name}'")) {
            println!("Operation cancelled");
            return Ok(());
        }

        let client = self.common_args.client()?;
        let queue = client.broker().queue(name).await?;
        let pending = queue.size();
        queue.purge().await?;
        println!("purge queue {name} success, {pending} pending messages removed");
        Ok(())
    }
}
