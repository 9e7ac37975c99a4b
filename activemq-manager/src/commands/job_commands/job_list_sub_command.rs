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

use crate::commands::command_util::parse_window;
use crate::commands::command_util::print_formatted;
use crate::commands::command_util::JobRow;
use crate::commands::job_commands::WindowArgs;
use crate::commands::CommandExecute;
use crate::commands::CommonArgs;
use crate::core::ActiveMQResult;

#[derive(Debug, Clone, Parser)]
pub struct JobListSubCommand {
    #[command(flatten)]
    common_args: CommonArgs,

    #[command(flatten)]
    window: WindowArgs,

    #[arg(
        short = 'f',
        long = "format",
        default_value = "table",
        help = "Output format: table, json, yaml"
    )]
    format: String,
}

impl CommandExecute for JobListSubCommand {
    async fn execute(&self) -> ActiveMQResult<()> {
        let start = parse_window(self.window.start.as_deref())?;
        let end = parse_window(self.window.end.as_deref())?;

        let client = self.common_args.client()?;
        let jobs = client.broker().jobs(start, end).await?;
        let rows: Vec<JobRow> = jobs.iter().map(JobRow::from).collect();
        print_formatted(&self.format, &rows)?;
        Ok(())
    }
}
