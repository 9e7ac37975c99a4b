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

mod broker_attribute_sub_command;

use clap::Subcommand;

use crate::commands::CommandExecute;
use crate::core::ActiveMQResult;

#[derive(Subcommand)]
pub enum BrokerCommands {
    #[command(
        name = "attribute",
        about = "Read broker attributes",
        long_about = r#"Read one attribute of the broker MBean, or all of them when no name is given."#
    )]
    Attribute(broker_attribute_sub_command::BrokerAttributeSubCommand),
}

impl CommandExecute for BrokerCommands {
    async fn execute(&self) -> ActiveMQResult<()> {
        match self {
            BrokerCommands::Attribute(value) => value.execute().await,
        }
    }
}
