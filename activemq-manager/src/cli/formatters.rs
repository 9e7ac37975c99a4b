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

//! Output rendering for the admin CLI
//!
//! Every listing is rendered from its serde form, so one record type serves all three
//! formats.

mod json_formatter;
mod table_formatter;
mod yaml_formatter;

use std::fmt;
use std::str::FromStr;

use activemq_error::ActiveMQError;
pub use json_formatter::JsonFormatter;
use serde::Serialize;
pub use table_formatter::TableFormatter;
pub use yaml_formatter::YamlFormatter;

pub trait Formatter {
    fn format<T: Serialize>(&self, data: &T) -> String;
}

/// Value of the `-f/--format` flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn render<T: Serialize>(self, data: &T) -> String {
        match self {
            OutputFormat::Table => TableFormatter.format(data),
            OutputFormat::Json => JsonFormatter.format(data),
            OutputFormat::Yaml => YamlFormatter.format(data),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ActiveMQError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            other => Err(ActiveMQError::IllegalArgument(format!(
                "unknown output format '{other}', expected table, json or yaml"
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_format_names() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(" yml ".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert!(matches!(
            "xml".parse::<OutputFormat>(),
            Err(ActiveMQError::IllegalArgument(_))
        ));
    }

    #[test]
    fn render_dispatches_on_format() {
        let data = serde_json::json!({"name": "orders"});
        assert!(OutputFormat::Json.render(&data).contains("\"orders\""));
        assert!(OutputFormat::Yaml.render(&data).contains("name: orders"));
        assert!(OutputFormat::Table.render(&data).contains("orders"));
        assert_eq!(OutputFormat::default().to_string(), "table");
    }
}
