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

use clap::CommandFactory;
use clap::Parser;
use clap_complete::generate;
use clap_complete::shells::Bash;
use clap_complete::shells::Fish;
use clap_complete::shells::Zsh;

use crate::commands::CommandExecute;
use crate::commands::Commands;

const BIN_NAME: &str = "activemq-admin-cli";

#[derive(Parser)]
#[command(name = "activemq-admin-cli")]
#[command(about = "ActiveMQ admin commands", long_about = None)]
pub struct ActiveMQCli {
    /// Generate shell completion script
    #[arg(
        long = "generate-completion",
        value_name = "SHELL",
        help = "Generate shell completion script (bash, zsh, fish)"
    )]
    completion: Option<String>,

    #[command(subcommand)]
    commands: Option<Commands>,
}

impl ActiveMQCli {
    pub async fn handle(&self) {
        if let Some(shell) = &self.completion {
            let mut cmd = ActiveMQCli::command();
            match shell.to_lowercase().as_str() {
                "bash" => generate(Bash, &mut cmd, BIN_NAME, &mut std::io::stdout()),
                "zsh" => generate(Zsh, &mut cmd, BIN_NAME, &mut std::io::stdout()),
                "fish" => generate(Fish, &mut cmd, BIN_NAME, &mut std::io::stdout()),
                _ => {
                    eprintln!("Unsupported shell: {shell}");
                    eprintln!("Supported shells: bash, zsh, fish");
                    std::process::exit(1);
                }
            }
            return;
        }

        match &self.commands {
            Some(commands) => {
                if let Err(e) = commands.execute().await {
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                }
            }
            None => eprintln!("No command specified. Use --help for usage information."),
        }
    }
}
