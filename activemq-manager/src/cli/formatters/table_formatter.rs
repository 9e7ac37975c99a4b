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

//! Table formatter
//!
//! Records are flattened through their JSON form: a list of objects becomes one row per
//! object with the union of keys as columns, a single object becomes a key/value table.

use serde::Serialize;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;

use super::Formatter;

pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format<T: Serialize>(&self, data: &T) -> String {
        match serde_json::to_value(data) {
            Ok(Value::Array(rows)) => rows_table(&rows),
            Ok(Value::Object(object)) => {
                let mut builder = Builder::default();
                builder.push_record(["Key", "Value"]);
                for (key, value) in &object {
                    builder.push_record([key.clone(), cell(value)]);
                }
                styled(builder)
            }
            Ok(value) => cell(&value),
            Err(e) => format!("error: {e}"),
        }
    }
}

fn rows_table(rows: &[Value]) -> String {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        if let Value::Object(object) = row {
            for key in object.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }
    }

    let mut builder = Builder::default();
    if columns.is_empty() {
        builder.push_record(["Value"]);
        for row in rows {
            builder.push_record([cell(row)]);
        }
        return styled(builder);
    }

    builder.push_record(columns.clone());
    for row in rows {
        builder.push_record(columns.iter().map(|column| row.get(column).map(cell).unwrap_or_default()));
    }
    styled(builder)
}

fn styled(builder: Builder) -> String {
    let mut table = builder.build();
    table.with(Style::extended());
    table.to_string()
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_from_records() {
        let data = serde_json::json!([
            {"name": "orders", "size": 4},
            {"name": "audit", "size": 0, "consumers": 2}
        ]);
        let output = TableFormatter.format(&data);
        assert!(output.contains("name"));
        assert!(output.contains("consumers"));
        assert!(output.contains("orders"));
        assert!(output.contains("audit"));
    }

    #[test]
    fn test_table_from_object() {
        let output = TableFormatter.format(&serde_json::json!({"BrokerName": "localhost"}));
        assert!(output.contains("Key"));
        assert!(output.contains("localhost"));
    }

    #[test]
    fn test_table_from_scalars() {
        let output = TableFormatter.format(&vec!["q1", "q2"]);
        assert!(output.contains("q1"));
        assert!(output.contains("Value"));
    }
}
