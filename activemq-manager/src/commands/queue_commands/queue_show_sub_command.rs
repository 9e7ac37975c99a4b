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
use crate::commands::command_util::print_formatted;
use crate::commands::command_util::QueueRow;
use crate::commands::CommandExecute;
use crate::commands::CommonArgs;
use crate::core::ActiveMQResult;

#[derive(Debug, Clone, Parser)]
pub struct QueueShowSubCommand {
    #[command(flatten)]
    common_args: CommonArgs,

    #[arg(short = 'q', long = "queue", required = true, help = "Queue name")]
    queue: String,

    #[arg(
        short = 'f',
        long = "format",
        default_value = "table",
        help = "Output format: table, json, yaml"
    )]
    format: String,
}

impl CommandExecute for QueueShowSubCommand {
    async fn execute(&self) -> ActiveMQResult<()> {
        validators::validate_queue_name(&self.queue)?;
        let client = self.common_args.client()?;
        let queue = client.broker().queue(self.queue.trim()).await?;
        print_formatted(&self.format, &QueueRow::from(&queue))?;
        Ok(())
    }
}
