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

mod connection_list_sub_command;

use clap::Subcommand;

use crate::commands::CommandExecute;
use crate::core::ActiveMQResult;

#[derive(Subcommand)]
pub enum ConnectionCommands {
    #[command(
        name = "list",
        about = "List client connections",
        long_about = r#"List the client connections of every transport connector (openwire, stomp, ...).
Connections are fetched concurrently."#
    )]
    List(connection_list_sub_command::ConnectionListSubCommand),
}

impl CommandExecute for ConnectionCommands {
    async fn execute(&self) -> ActiveMQResult<()> {
        match self {
            ConnectionCommands::List(value) => value.execute().await,
        }
    }
}
