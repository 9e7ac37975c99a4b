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
use crate::commands::command_util::ConnectionRow;
use crate::commands::CommandExecute;
use crate::commands::CommonArgs;
use crate::core::ActiveMQResult;

#[derive(Debug, Clone, Parser)]
pub struct ConnectionListSubCommand {
    #[command(flatten)]
    common_args: CommonArgs,

    #[arg(long = "count", help = "Only print the number of connections")]
    count: bool,

    #[arg(
        short = 'f',
        long = "format",
        default_value = "table",
        help = "Output format: table, json, yaml"
    )]
    format: String,
}

impl CommandExecute for ConnectionListSubCommand {
    async fn execute(&self) -> ActiveMQResult<()> {
        let client = self.common_args.client()?;
        let broker = client.broker();
        if self.count {
            println!("{}", broker.connection_count().await?);
            return Ok(());
        }

        let mut connections = broker.connections().await?;
        let mut rows = Vec::new();
        while let Some(connection) = connections.next().await {
            rows.push(ConnectionRow::from(&connection?));
        }
        report_shortfall("connections", connections.summary());

        rows.sort_by(|a, b| (&a.connector, &a.name).cmp(&(&b.connector, &b.name)));
        print_formatted(&self.format, &rows)?;
        Ok(())
    }
}
