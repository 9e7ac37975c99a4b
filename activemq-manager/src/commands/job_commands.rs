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

mod job_count_sub_command;
mod job_delete_sub_command;
mod job_list_sub_command;

use clap::Args;
use clap::Subcommand;

use crate::commands::CommandExecute;
use crate::core::ActiveMQResult;

#[derive(Subcommand)]
pub enum JobCommands {
    #[command(
        name = "list",
        about = "List scheduled jobs",
        long_about = r#"List the jobs of the broker's scheduler due inside a window. The window defaults to
the next 52 weeks."#
    )]
    List(job_list_sub_command::JobListSubCommand),

    #[command(name = "count", about = "Count scheduled jobs", long_about = None)]
    Count(job_count_sub_command::JobCountSubCommand),

    #[command(name = "delete", about = "Delete scheduled job", long_about = None)]
    Delete(job_delete_sub_command::JobDeleteSubCommand),
}

impl CommandExecute for JobCommands {
    async fn execute(&self) -> ActiveMQResult<()> {
        match self {
            JobCommands::List(value) => value.execute().await,
            JobCommands::Count(value) => value.execute().await,
            JobCommands::Delete(value) => value.execute().await,
        }
    }
}

/// Scheduler query window, `%Y-%m-%d %H:%M:%S` local time
#[derive(Debug, Clone, Args)]
pub struct WindowArgs {
    #[arg(long = "start", required = false, help = "Window start, eg: '2024-01-02 03:04:05' (default: now)")]
    pub start: Option<String>,

    #[arg(long = "end", required = false, help = "Window end (default: start + 52 weeks)")]
    pub end: Option<String>,
}
