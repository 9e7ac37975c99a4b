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

//! Interactive prompts for user confirmation

use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;

/// Prompt for yes/no confirmation
pub fn confirm(message: &str) -> bool {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(message)
        .default(false)
        .interact()
        .unwrap_or(false)
}

pub fn dangerous_operation_message(operation: &str, target: &str) -> String {
    format!("[WARNING] This will {operation} {target}. This action cannot be undone. Continue?")
}

/// Confirm dangerous operation
pub fn confirm_dangerous_operation(operation: &str, target: &str) -> bool {
    confirm(&dangerous_operation_message(operation, target))
}

/// Skip the prompt when `skip_confirm` is set; otherwise ask.
pub fn confirmed(skip_confirm: bool, operation: &str, target: &str) -> bool {
    skip_confirm || confirm_dangerous_operation(operation, target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_formatting() {
        assert_eq!(
            dangerous_operation_message("purge", "queue 'orders'"),
            "[WARNING] This will purge queue 'orders'. This action cannot be undone. Continue?"
        );
    }

    #[test]
    fn test_skip_confirm_does_not_prompt() {
        assert!(confirmed(true, "delete", "queue 'orders'"));
    }
}
