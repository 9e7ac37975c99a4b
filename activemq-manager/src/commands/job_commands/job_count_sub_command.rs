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
use crate::commands::job_commands::WindowArgs;
use crate::commands::CommandExecute;
use crate::commands::CommonArgs;
use crate::core::ActiveMQResult;

#[derive(Debug, Clone, Parser)]
pub struct JobCountSubCommand {
    #[command(flatten)]
    common_args: CommonArgs,

    #[command(flatten)]
    window: WindowArgs,
}

impl CommandExecute for JobCountSubCommand {
    async fn execute(&self) -> ActiveMQResult<()> {
        let start = parse_window(self.window.start.as_deref())?;
        let end = parse_window(self.window.end.as_deref())?;
        let client = self.common_args.client()?;
        println!("{}", client.broker().job_count(start, end).await?);
        Ok(())
    }
}
