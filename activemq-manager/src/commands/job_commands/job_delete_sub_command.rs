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

use crate::commands::CommandExecute;
use crate::commands::CommonArgs;
use crate::core::ActiveMQError;
use crate::core::ActiveMQResult;
use crate::ui::prompt;

#[derive(Debug, Clone, Parser)]
pub struct JobDeleteSubCommand {
    #[command(flatten)]
    common_args: CommonArgs,

    #[arg(short = 'j', long = "jobId", required = true, help = "Job id")]
    job_id: String,
}

impl CommandExecute for JobDeleteSubCommand {
    async fn execute(&self) -> ActiveMQResult<()> {
        let job_id = self.job_id.trim();
        if job_id.is_empty() {
            return Err(ActiveMQError::IllegalArgument("Job id cannot be empty".to_string()));
        }
        if !prompt::confirmed(self.common_args.skip_confirm, "delete", &format!("scheduled job '{job_id}'")) {
            println!("Operation cancelled");
            return Ok(());
        }

        let client = self.common_args.client()?;
        client.broker().job(job_id).await?.delete().await?;
        println!("delete scheduled job {job_id} success");
        Ok(())
    }
}
