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
use crate::commands::message_commands::MessageArgs;
use crate::commands::CommandExecute;
use crate::commands::CommonArgs;
use crate::core::ActiveMQResult;

#[derive(Debug, Clone, Parser)]
pub struct MoveMessageSubCommand {
    #[command(flatten)]
    common_args: CommonArgs,

    #[command(flatten)]
    message: MessageArgs,

    #[arg(short = 't', long = "target", required = true, help = "Destination queue")]
    target: String,
}

impl CommandExecute for MoveMessageSubCommand {
    async fn execute(&self) -> ActiveMQResult<()> {
        validators::validate_queue_name(&self.target)?;
        let message = self.message.resolve(&self.common_args).await?;
        message.move_to(self.target.trim()).await?;
        println!("move message {} to {} success", message.id(), self.target.trim());
        Ok(())
    }
}
