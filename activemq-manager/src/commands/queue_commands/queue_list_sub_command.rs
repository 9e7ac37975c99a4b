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
use futures::StreamExt;

use crate::commands::command_util::print_formatted;
use crate::commands::command_util::report_shortfall;
use crate::commands::command_util::QueueRow;
use crate::commands::CommandExecute;
use crate::commands::CommonArgs;
use crate::core::ActiveMQResult;

#[derive(Debug, Clone, Parser)]
pub struct QueueListSubCommand {
    #[command(flatten)]
    common_args: CommonArgs,

    #[arg(
        short = 'f',
        long = "format",
        default_value = "table",
        help = "Output format: table, json, yaml"
    )]
    format: String,
}

impl CommandExecute for QueueListSubCommand {
    async fn execute(&self) -> ActiveMQResult<()> {
        let client = self.common_args.client()?;
        let mut queues = client.broker().queues().await?;

        let mut rows = Vec::new();
        while let Some(queue) = queues.next().await {
            rows.push(QueueRow::from(&queue?));
        }
        report_shortfall("queues", queues.summary());

        rows.sort_by(|a, b| a.name.cmp(&b.name));
        print_formatted(&self.format, &rows)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_parsing() {
        let cmd = QueueListSubCommand::try_parse_from(["list", "-e", "http://broker:8161", "-w", "4", "-f", "json"]);
        assert!(cmd.is_ok());
        let cmd = cmd.unwrap();
        assert_eq!(cmd.common_args.workers, Some(4));
        assert_eq!(cmd.format, "json");
    }
}
